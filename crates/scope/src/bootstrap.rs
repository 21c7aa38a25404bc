//! Snapshot assembly: one principal in, one multi-kind snapshot out.
//!
//! The aggregator resolves every entity kind up front, fans the allowed
//! fetches out over the store, and folds the results into a [`Snapshot`].
//! A kind that fails fetches is recorded and skipped; its siblings are
//! unaffected. The assembly itself never errors: the worst outcome for the
//! caller is a snapshot in which every fetched kind is marked failed.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use vetra_model::{eager_relations, EntityKind, Record, TenantId};

use crate::error::{ConfigError, StoreError};
use crate::principal::Principal;
use crate::resolver::ScopeDecision;
use crate::store::RecordStore;

/// Unique identifier for one assembled snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotId(Uuid);

impl SnapshotId {
    /// Generates a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SnapshotId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Serde adapter for optional human-readable durations ("30s", "2m").
mod humantime_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(duration) => {
                serializer.serialize_some(&humantime::format_duration(*duration).to_string())
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: Option<String> = Option::deserialize(deserializer)?;
        value
            .map(|text| {
                text.parse::<humantime::Duration>()
                    .map(Into::into)
                    .map_err(serde::de::Error::custom)
            })
            .transpose()
    }
}

fn default_fetch_timeout() -> Option<Duration> {
    Some(Duration::from_secs(30))
}

fn default_max_concurrency() -> usize {
    EntityKind::ALL.len()
}

/// Tuning for snapshot assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapOptions {
    /// Deadline applied to each per-kind fetch. A fetch that overruns is
    /// recorded as [`FetchFailure::TimedOut`]; `None` disables the
    /// deadline.
    #[serde(with = "humantime_serde", default = "default_fetch_timeout")]
    pub fetch_timeout: Option<Duration>,

    /// Upper bound on concurrently running fetches.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            fetch_timeout: default_fetch_timeout(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

impl BootstrapOptions {
    /// Checks the options for values that can never work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency { value: 0 });
        }
        if let Some(timeout) = self.fetch_timeout {
            if timeout.is_zero() {
                return Err(ConfigError::InvalidDuration {
                    field: "fetchTimeout".to_string(),
                    value: humantime::format_duration(timeout).to_string(),
                    message: "must be greater than zero".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Why one kind's fetch produced no rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum FetchFailure {
    /// The fetch overran the configured deadline.
    TimedOut,
    /// The backend was unreachable.
    Unavailable {
        /// Backend-supplied detail.
        message: String,
    },
    /// The backend failed while serving the fetch.
    Backend {
        /// Backend-supplied detail.
        message: String,
    },
    /// The fetch asked for a relation traversal the backend rejects.
    InvalidTraversal {
        /// The rejected traversal.
        message: String,
    },
    /// The backend handed back rows outside the principal's tenant. The
    /// whole section is dropped rather than filtered.
    ForeignRows {
        /// How many foreign rows were returned.
        count: usize,
    },
}

impl FetchFailure {
    /// Whether retrying the same fetch could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchFailure::TimedOut | FetchFailure::Unavailable { .. } | FetchFailure::Backend { .. } => {
                true
            }
            FetchFailure::InvalidTraversal { .. } | FetchFailure::ForeignRows { .. } => false,
        }
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::TimedOut => write!(f, "fetch timed out"),
            FetchFailure::Unavailable { message } => write!(f, "store unavailable: {}", message),
            FetchFailure::Backend { message } => write!(f, "backend error: {}", message),
            FetchFailure::InvalidTraversal { message } => {
                write!(f, "invalid relation traversal: {}", message)
            }
            FetchFailure::ForeignRows { count } => {
                write!(f, "{} rows outside the principal's tenant", count)
            }
        }
    }
}

impl From<StoreError> for FetchFailure {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable {
                backend_name,
                message,
            } => FetchFailure::Unavailable {
                message: format!("{}: {}", backend_name, message),
            },
            StoreError::InvalidTraversal { kind, path } => FetchFailure::InvalidTraversal {
                message: format!("{}: {}", kind, path),
            },
            StoreError::Serialization { message } => FetchFailure::Backend { message },
            StoreError::Internal {
                backend_name,
                message,
                ..
            } => FetchFailure::Backend {
                message: format!("{}: {}", backend_name, message),
            },
        }
    }
}

/// The per-kind outcome inside a snapshot.
///
/// Denied and empty are distinct states: a denied kind never appears in
/// the serialized snapshot, while an allowed kind with no rows appears as
/// an empty section.
#[derive(Debug, Clone, PartialEq)]
pub enum KindOutcome {
    /// Scope resolution denied the kind for this principal.
    Denied,
    /// The fetch succeeded; the rows may be empty.
    Rows(Vec<Record>),
    /// The fetch failed; siblings are unaffected.
    Failed(FetchFailure),
}

impl KindOutcome {
    /// Returns `true` for the denied state.
    pub fn is_denied(&self) -> bool {
        matches!(self, KindOutcome::Denied)
    }

    /// The fetched rows, when the fetch succeeded.
    pub fn rows(&self) -> Option<&[Record]> {
        match self {
            KindOutcome::Rows(rows) => Some(rows),
            _ => None,
        }
    }

    /// The failure, when the fetch failed.
    pub fn failure(&self) -> Option<&FetchFailure> {
        match self {
            KindOutcome::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// One assembled bootstrap snapshot.
///
/// Serializes as `{snapshotId, tenantId, createdAt, sections, failedKinds}`
/// where `sections` holds only successfully fetched kinds, keyed by kind
/// name in the fixed kind order, and `failedKinds` maps failed kinds to
/// their failure. Denied kinds are omitted entirely.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    snapshot_id: SnapshotId,
    tenant_id: TenantId,
    created_at: DateTime<Utc>,
    outcomes: BTreeMap<EntityKind, KindOutcome>,
}

impl Snapshot {
    /// This snapshot's id.
    pub fn snapshot_id(&self) -> &SnapshotId {
        &self.snapshot_id
    }

    /// The tenant every row in the snapshot belongs to.
    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    /// When assembly finished.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The outcome recorded for `kind`.
    pub fn outcome(&self, kind: EntityKind) -> Option<&KindOutcome> {
        self.outcomes.get(&kind)
    }

    /// The rows fetched for `kind`; empty when the kind was denied,
    /// failed, or genuinely empty. Use [`outcome`](Snapshot::outcome) to
    /// tell those apart.
    pub fn rows(&self, kind: EntityKind) -> &[Record] {
        match self.outcomes.get(&kind) {
            Some(KindOutcome::Rows(rows)) => rows,
            _ => &[],
        }
    }

    /// The failure recorded for `kind`, if any.
    pub fn failure(&self, kind: EntityKind) -> Option<&FetchFailure> {
        self.outcomes.get(&kind).and_then(KindOutcome::failure)
    }

    /// Kinds that fetched successfully, in fixed kind order.
    pub fn present_kinds(&self) -> Vec<EntityKind> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, KindOutcome::Rows(_)))
            .map(|(kind, _)| *kind)
            .collect()
    }

    /// Kinds denied to the principal, in fixed kind order.
    pub fn denied_kinds(&self) -> Vec<EntityKind> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| outcome.is_denied())
            .map(|(kind, _)| *kind)
            .collect()
    }

    /// Kinds whose fetch failed, in fixed kind order.
    pub fn failed_kinds(&self) -> Vec<EntityKind> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, KindOutcome::Failed(_)))
            .map(|(kind, _)| *kind)
            .collect()
    }

    /// Total rows across all fetched sections.
    pub fn row_count(&self) -> usize {
        self.outcomes
            .values()
            .filter_map(|outcome| outcome.rows().map(<[Record]>::len))
            .sum()
    }

    /// Returns `true` when no fetch failed.
    pub fn is_complete(&self) -> bool {
        self.failed_kinds().is_empty()
    }
}

struct Sections<'a>(&'a BTreeMap<EntityKind, KindOutcome>);

impl Serialize for Sections<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        for (kind, outcome) in self.0 {
            if let KindOutcome::Rows(rows) = outcome {
                map.serialize_entry(kind.as_str(), rows)?;
            }
        }
        map.end()
    }
}

struct FailedKinds<'a>(&'a BTreeMap<EntityKind, KindOutcome>);

impl Serialize for FailedKinds<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        for (kind, outcome) in self.0 {
            if let KindOutcome::Failed(failure) = outcome {
                map.serialize_entry(kind.as_str(), failure)?;
            }
        }
        map.end()
    }
}

impl Serialize for Snapshot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Snapshot", 5)?;
        state.serialize_field("snapshotId", &self.snapshot_id)?;
        state.serialize_field("tenantId", &self.tenant_id)?;
        state.serialize_field("createdAt", &self.created_at)?;
        state.serialize_field("sections", &Sections(&self.outcomes))?;
        state.serialize_field("failedKinds", &FailedKinds(&self.outcomes))?;
        state.end()
    }
}

/// Assembles bootstrap snapshots from a record store.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
///
/// use vetra_model::{EntityKind, Role, TenantId};
/// use vetra_scope::{BootstrapAggregator, MemoryStore, Principal};
///
/// # async fn example() {
/// let store = Arc::new(MemoryStore::new());
/// let aggregator = BootstrapAggregator::new(store);
///
/// let vet = Principal::new(TenantId::new("clinic-a"), Role::Vet);
/// let snapshot = aggregator.bootstrap(&vet).await;
///
/// assert!(snapshot.failure(EntityKind::Patient).is_none());
/// # }
/// ```
pub struct BootstrapAggregator {
    store: Arc<dyn RecordStore>,
    options: BootstrapOptions,
}

impl BootstrapAggregator {
    /// Creates an aggregator with default options.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            options: BootstrapOptions::default(),
        }
    }

    /// Creates an aggregator with explicit options.
    pub fn with_options(
        store: Arc<dyn RecordStore>,
        options: BootstrapOptions,
    ) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self { store, options })
    }

    /// The options this aggregator runs with.
    pub fn options(&self) -> &BootstrapOptions {
        &self.options
    }

    /// Assembles a snapshot for `principal`.
    ///
    /// Every entity kind is resolved first; allowed kinds are then fetched
    /// concurrently, each with its eager relations and an optional
    /// deadline. Fetch failures are recorded per kind and never abort the
    /// assembly. Dropping the returned future aborts the in-flight fetches.
    pub async fn bootstrap(&self, principal: &Principal) -> Snapshot {
        let snapshot_id = SnapshotId::new();
        let started = std::time::Instant::now();

        let mut outcomes: BTreeMap<EntityKind, KindOutcome> = BTreeMap::new();
        let mut allowed = Vec::new();
        for kind in EntityKind::ALL {
            match principal.scope_for(kind) {
                ScopeDecision::Denied => {
                    outcomes.insert(kind, KindOutcome::Denied);
                }
                ScopeDecision::Allowed(filter) => allowed.push(filter),
            }
        }

        debug!(
            snapshot_id = %snapshot_id,
            tenant_id = %principal.tenant_id(),
            correlation_id = ?principal.correlation_id(),
            allowed = allowed.len(),
            denied = outcomes.len(),
            "assembling bootstrap snapshot"
        );

        // A validated aggregator never carries a zero bound; the guard
        // keeps a hand-mutated options struct from deadlocking the fan-out.
        let semaphore = Arc::new(Semaphore::new(self.options.max_concurrency.max(1)));
        let mut tasks: JoinSet<(EntityKind, Result<Vec<Record>, FetchFailure>)> = JoinSet::new();

        for filter in allowed {
            let store = Arc::clone(&self.store);
            let semaphore = Arc::clone(&semaphore);
            let fetch_timeout = self.options.fetch_timeout;
            tasks.spawn(async move {
                let kind = filter.kind();
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return (
                            kind,
                            Err(FetchFailure::Backend {
                                message: "fetch semaphore closed".to_string(),
                            }),
                        );
                    }
                };
                let load = eager_relations(kind);
                let fetched = match fetch_timeout {
                    Some(limit) => match tokio::time::timeout(limit, store.find(&filter, load)).await
                    {
                        Ok(result) => result.map_err(FetchFailure::from),
                        Err(_) => Err(FetchFailure::TimedOut),
                    },
                    None => store.find(&filter, load).await.map_err(FetchFailure::from),
                };
                (kind, fetched)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((kind, Ok(rows))) => {
                    let outcome = match verify_tenancy(principal.tenant_id(), kind, rows) {
                        Ok(rows) => KindOutcome::Rows(rows),
                        Err(failure) => KindOutcome::Failed(failure),
                    };
                    outcomes.insert(kind, outcome);
                }
                Ok((kind, Err(failure))) => {
                    warn!(
                        snapshot_id = %snapshot_id,
                        kind = %kind,
                        failure = %failure,
                        "bootstrap fetch failed; continuing with remaining kinds"
                    );
                    outcomes.insert(kind, KindOutcome::Failed(failure));
                }
                Err(join_error) => {
                    // The task identity is lost here; the sweep below marks
                    // whichever kind is missing as failed.
                    warn!(
                        snapshot_id = %snapshot_id,
                        error = %join_error,
                        "bootstrap fetch task failed to join"
                    );
                }
            }
        }

        for kind in EntityKind::ALL {
            outcomes.entry(kind).or_insert_with(|| {
                KindOutcome::Failed(FetchFailure::Backend {
                    message: "fetch task aborted before completion".to_string(),
                })
            });
        }

        let snapshot = Snapshot {
            snapshot_id,
            tenant_id: principal.tenant_id().clone(),
            created_at: Utc::now(),
            outcomes,
        };

        info!(
            snapshot_id = %snapshot.snapshot_id,
            tenant_id = %snapshot.tenant_id,
            rows = snapshot.row_count(),
            failed = snapshot.failed_kinds().len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "bootstrap snapshot assembled"
        );

        snapshot
    }
}

/// Re-checks that every fetched row belongs to the expected tenant.
///
/// The filters make foreign rows impossible for a correct backend; a
/// backend that returns one anyway loses the whole section.
fn verify_tenancy(
    expected: &TenantId,
    kind: EntityKind,
    rows: Vec<Record>,
) -> Result<Vec<Record>, FetchFailure> {
    let foreign = rows
        .iter()
        .filter(|record| record.tenant_id() != expected)
        .count();
    if foreign > 0 {
        error!(
            kind = %kind,
            foreign,
            "backend returned rows outside the principal's tenant; dropping section"
        );
        return Err(FetchFailure::ForeignRows { count: foreign });
    }
    Ok(rows)
}
