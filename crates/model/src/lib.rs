//! Vetra Core Entity Model
//!
//! This crate defines the data model shared across the Vetra veterinary clinic
//! platform: the closed set of entity kinds, the role taxonomy, opaque
//! identifier types, the stored-record row representation, eager-loadable
//! relation descriptors, and the typed inventory ledger view used by stock
//! diagnostics.
//!
//! Everything in this crate is plain data. Access rules, fetch orchestration,
//! and integrity checking live in `vetra-scope`; storage engines live behind
//! that crate's store trait.
//!
//! # Entity kinds
//!
//! [`EntityKind`] is a closed enum whose declaration order is load-bearing:
//! snapshots are assembled and reported in exactly this order.
//!
//! ```
//! use vetra_model::EntityKind;
//!
//! assert_eq!(EntityKind::ALL.len(), 16);
//! assert_eq!(EntityKind::ALL[0], EntityKind::User);
//! assert_eq!(EntityKind::InventoryItem.as_str(), "inventoryItem");
//! ```
//!
//! # Records
//!
//! A [`Record`] is one stored row: kind, id, owning tenant, a JSON content
//! document with camelCase domain fields, and timestamps.
//!
//! ```
//! use vetra_model::{EntityKind, Record, TenantId};
//!
//! let patient = Record::builder(EntityKind::Patient, "pat-1", TenantId::new("clinic-a"))
//!     .field("name", "Maya")
//!     .field("ownerId", "cli-7")
//!     .build();
//!
//! assert_eq!(patient.field_str("ownerId"), Some("cli-7"));
//! assert_eq!(patient.tenant_id().as_str(), "clinic-a");
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod id;
pub mod inventory;
pub mod kind;
pub mod record;
pub mod relation;
pub mod role;

pub use id::{ClientId, RecordId, TenantId, SYSTEM_TENANT};
pub use inventory::{Batch, StockLedger};
pub use kind::EntityKind;
pub use record::{Record, RecordBuilder};
pub use relation::{eager_relations, ParentLink, Relation};
pub use role::Role;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
