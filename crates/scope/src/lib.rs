//! Tenant scoping and bootstrap assembly for the Vetra platform.
//!
//! Every read in Vetra happens on behalf of a [`Principal`]: a tenant, a
//! role and, for portal users, a client binding. This crate turns that
//! principal into concrete access decisions and uses them to assemble the
//! multi-kind [`Snapshot`] a client application boots from.
//!
//! # Architecture
//!
//! - [`principal`]: who is asking. Construction validates the
//!   role/binding contract; deserialized principals degrade safely.
//! - [`visibility`]: the static classification of every entity kind.
//! - [`resolver`]: the pure decision function. Principal and kind in,
//!   [`ScopeDecision`] out; no I/O, no errors.
//! - [`filter`]: the decision's payload. A [`Filter`] always carries a
//!   tenant conjunct; backends interpret it.
//! - [`store`]: the [`RecordStore`] trait backends implement.
//! - [`bootstrap`]: fans scoped fetches out over the store and folds the
//!   results into a snapshot, isolating per-kind failures.
//! - [`integrity`]: the advisory stock audit that runs over the store's
//!   scan path.
//!
//! # Quick start
//!
//! ```
//! use vetra_model::EntityKind;
//! use vetra_model::{Role, TenantId};
//! use vetra_scope::{Principal, ScopeDecision};
//!
//! let client = Principal::builder(TenantId::new("clinic-a"), Role::Client)
//!     .client_id("cli-7")
//!     .build()
//!     .unwrap();
//!
//! // Staff-only kinds are denied outright, not shown as empty.
//! assert!(client.scope_for(EntityKind::Expense).is_denied());
//!
//! // Owner-scoped kinds narrow to the client's own rows.
//! let decision = client.scope_for(EntityKind::Patient);
//! let filter = decision.filter().unwrap();
//! assert_eq!(filter.tenant_id().as_str(), "clinic-a");
//! ```
//!
//! Snapshot assembly runs against any [`RecordStore`]:
//!
//! ```
//! use std::sync::Arc;
//!
//! use serde_json::json;
//! use vetra_model::{EntityKind, Record, Role, TenantId};
//! use vetra_scope::{BootstrapAggregator, MemoryStore, Principal};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = Arc::new(MemoryStore::new());
//! store.insert(Record::new(
//!     EntityKind::Branch,
//!     "br-1",
//!     TenantId::new("clinic-a"),
//!     json!({"name": "north"}),
//! ));
//!
//! let vet = Principal::new(TenantId::new("clinic-a"), Role::Vet);
//! let snapshot = BootstrapAggregator::new(store).bootstrap(&vet).await;
//!
//! assert_eq!(snapshot.rows(EntityKind::Branch).len(), 1);
//! assert!(snapshot.is_complete());
//! # }
//! ```
//!
//! # Feature flags
//!
//! - `memory` (default): the in-memory [`MemoryStore`] backend, also used
//!   by the test suite.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod bootstrap;
pub mod error;
pub mod filter;
pub mod integrity;
pub mod principal;
pub mod resolver;
pub mod store;
pub mod visibility;

pub use error::{ConfigError, PrincipalError, ScopeError, ScopeResult, StoreError, StoreResult};
pub use filter::{Filter, Predicate, TenantClause};
pub use principal::{Principal, PrincipalBuilder};
pub use resolver::{resolve_scope, ScopeDecision};
pub use visibility::{visibility, OwnerRule, VisibilityClass};

pub use bootstrap::{
    BootstrapAggregator, BootstrapOptions, FetchFailure, KindOutcome, Snapshot, SnapshotId,
};
pub use integrity::{audit, IntegrityFinding, IntegrityReport, Severity, StockIntegrityChecker};
pub use store::RecordStore;

#[cfg(feature = "memory")]
pub use backends::memory::MemoryStore;

/// The version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of this crate.
pub const NAME: &str = env!("CARGO_PKG_NAME");
