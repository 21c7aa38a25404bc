//! Per-kind visibility classification.
//!
//! Every entity kind has exactly one visibility class, assigned here in a
//! single exhaustive match. The match has no wildcard arm on purpose: adding
//! a kind to the model without classifying it is a compile error, so nothing
//! can ever default to visible.

use vetra_model::{EntityKind, ParentLink};

/// How a kind's rows are tied to an owning client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerRule {
    /// A content field on the row carries the owning client id.
    Field(&'static str),
    /// The row id itself is the client id; a client owns only their own
    /// record.
    OwnRecord,
    /// Ownership passes through a to-one parent row: the linked parent's
    /// field carries the owning client id.
    Parent {
        /// The traversal to the parent row.
        link: ParentLink,
        /// The ownership field on the parent.
        field: &'static str,
    },
}

/// The visibility class of one entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityClass {
    /// Visible to every principal in the tenant.
    TenantWide,
    /// Tenant-wide for staff; restricted to owned rows for clients.
    OwnerScoped(OwnerRule),
    /// Hidden from client principals entirely (denied, not empty).
    StaffOnly,
    /// Tenant-wide, except other clients' rows are hidden from a client.
    SelfAndOthers,
    /// The principal's own tenant row, matched by identity.
    Identity,
}

/// Classifies one entity kind.
///
/// # Examples
///
/// ```
/// use vetra_model::EntityKind;
/// use vetra_scope::{visibility, VisibilityClass};
///
/// assert_eq!(visibility(EntityKind::Branch), VisibilityClass::TenantWide);
/// assert_eq!(visibility(EntityKind::Expense), VisibilityClass::StaffOnly);
/// ```
pub fn visibility(kind: EntityKind) -> VisibilityClass {
    match kind {
        EntityKind::User => VisibilityClass::SelfAndOthers,
        EntityKind::Tenant => VisibilityClass::Identity,
        EntityKind::Branch => VisibilityClass::TenantWide,
        EntityKind::Client => VisibilityClass::OwnerScoped(OwnerRule::OwnRecord),
        EntityKind::Patient => VisibilityClass::OwnerScoped(OwnerRule::Field("ownerId")),
        EntityKind::Invoice => VisibilityClass::OwnerScoped(OwnerRule::Field("clientId")),
        EntityKind::InventoryItem => VisibilityClass::StaffOnly,
        EntityKind::Sale => VisibilityClass::StaffOnly,
        EntityKind::Service => VisibilityClass::TenantWide,
        EntityKind::Appointment => VisibilityClass::OwnerScoped(OwnerRule::Field("clientId")),
        EntityKind::Expense => VisibilityClass::StaffOnly,
        EntityKind::AuditLog => VisibilityClass::StaffOnly,
        EntityKind::ChatMessage => VisibilityClass::OwnerScoped(OwnerRule::Field("clientId")),
        EntityKind::Consultation => VisibilityClass::StaffOnly,
        EntityKind::LabRequest => VisibilityClass::OwnerScoped(OwnerRule::Parent {
            link: ParentLink::LAB_REQUEST,
            field: "ownerId",
        }),
        EntityKind::Budget => VisibilityClass::StaffOnly,
    }
}
