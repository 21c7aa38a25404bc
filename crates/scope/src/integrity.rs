//! Stock integrity auditing.
//!
//! Inventory items cache a stock total on the row while the truth lives in
//! the batch ledger. The audit walks the items and reports every place the
//! two disagree. It is advisory and read-only: findings describe drift,
//! they do not repair it, and running the audit twice over unchanged data
//! yields the same findings.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use vetra_model::{EntityKind, Record, RecordId, Relation, StockLedger, TenantId};

use crate::error::StoreResult;
use crate::store::RecordStore;

/// How bad a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    /// The cached total disagrees with the ledger.
    Warning,
    /// The cached total is negative, which no ledger can explain.
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Critical => f.write_str("critical"),
        }
    }
}

/// One inconsistency found on one inventory item.
///
/// An item can raise both findings at once: a negative total that also
/// disagrees with its batch sum yields a mismatch and a negative-stock
/// finding, in that order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum IntegrityFinding {
    /// The cached total differs from the batch sum.
    Mismatch {
        /// The inventory item row id.
        item_id: RecordId,
        /// The tenant owning the item.
        tenant_id: TenantId,
        /// The cached total on the row.
        total_stock: i64,
        /// What the batches actually add up to.
        batch_sum: i64,
    },
    /// The cached total is below zero.
    NegativeStock {
        /// The inventory item row id.
        item_id: RecordId,
        /// The tenant owning the item.
        tenant_id: TenantId,
        /// The cached total on the row.
        total_stock: i64,
    },
}

impl IntegrityFinding {
    /// The severity of this finding.
    pub fn severity(&self) -> Severity {
        match self {
            IntegrityFinding::Mismatch { .. } => Severity::Warning,
            IntegrityFinding::NegativeStock { .. } => Severity::Critical,
        }
    }

    /// The item the finding is about.
    pub fn item_id(&self) -> &RecordId {
        match self {
            IntegrityFinding::Mismatch { item_id, .. }
            | IntegrityFinding::NegativeStock { item_id, .. } => item_id,
        }
    }

    /// The tenant the item belongs to.
    pub fn tenant_id(&self) -> &TenantId {
        match self {
            IntegrityFinding::Mismatch { tenant_id, .. }
            | IntegrityFinding::NegativeStock { tenant_id, .. } => tenant_id,
        }
    }
}

impl fmt::Display for IntegrityFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityFinding::Mismatch {
                item_id,
                total_stock,
                batch_sum,
                ..
            } => write!(
                f,
                "stock mismatch for {}: total {} but batches sum to {}",
                item_id, total_stock, batch_sum
            ),
            IntegrityFinding::NegativeStock {
                item_id,
                total_stock,
                ..
            } => write!(f, "negative stock for {}: total {}", item_id, total_stock),
        }
    }
}

/// Audits a slice of inventory item records lazily.
///
/// The returned iterator yields findings as it advances; nothing is
/// examined past the point the caller consumes. Items whose content cannot
/// be read as a stock ledger are logged and skipped rather than failing
/// the audit.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use vetra_model::{EntityKind, Record, TenantId};
/// use vetra_scope::audit;
///
/// let item = Record::builder(EntityKind::InventoryItem, "itm-1", TenantId::new("clinic-a"))
///     .field("totalStock", 10)
///     .field("batches", json!([{"quantity": 4}, {"quantity": 5}]))
///     .build();
///
/// let findings: Vec<_> = audit(std::slice::from_ref(&item)).collect();
/// assert_eq!(findings.len(), 1);
/// ```
pub fn audit(items: &[Record]) -> impl Iterator<Item = IntegrityFinding> + '_ {
    items.iter().flat_map(|record| {
        let mut findings = Vec::with_capacity(2);
        match StockLedger::from_record(record) {
            Ok(ledger) => {
                let batch_sum = ledger.batch_sum();
                if ledger.total_stock != batch_sum {
                    findings.push(IntegrityFinding::Mismatch {
                        item_id: ledger.item_id.clone(),
                        tenant_id: ledger.tenant_id.clone(),
                        total_stock: ledger.total_stock,
                        batch_sum,
                    });
                }
                if ledger.total_stock < 0 {
                    findings.push(IntegrityFinding::NegativeStock {
                        item_id: ledger.item_id,
                        tenant_id: ledger.tenant_id,
                        total_stock: ledger.total_stock,
                    });
                }
            }
            Err(reason) => {
                warn!(record_id = %record.id(), %reason, "skipping unreadable inventory item");
            }
        }
        findings.into_iter()
    })
}

/// The outcome of one full integrity sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityReport {
    /// When the sweep ran.
    pub checked_at: DateTime<Utc>,
    /// How many inventory items were examined.
    pub items_scanned: usize,
    /// Every inconsistency found, in item order.
    pub findings: Vec<IntegrityFinding>,
}

impl IntegrityReport {
    /// Returns `true` when no findings were raised.
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// How many findings are critical.
    pub fn critical_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|finding| finding.severity() == Severity::Critical)
            .count()
    }
}

/// Runs integrity sweeps over a record store.
///
/// The sweep reads every tenant's inventory through the store's scan path,
/// takes no locks, and writes nothing back. Operators run it on a schedule
/// or on demand; two sweeps over unchanged data produce identical reports
/// apart from their timestamps.
pub struct StockIntegrityChecker {
    store: Arc<dyn RecordStore>,
}

impl StockIntegrityChecker {
    /// Creates a checker over `store`.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Sweeps every inventory item and reports the findings.
    pub async fn check(&self) -> StoreResult<IntegrityReport> {
        let items = self
            .store
            .scan(EntityKind::InventoryItem, &[Relation::Batches])
            .await?;
        let findings: Vec<IntegrityFinding> = audit(&items).collect();
        info!(
            items_scanned = items.len(),
            findings = findings.len(),
            "stock integrity sweep finished"
        );
        Ok(IntegrityReport {
            checked_at: Utc::now(),
            items_scanned: items.len(),
            findings,
        })
    }
}
