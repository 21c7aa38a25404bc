//! The closed set of entity kinds.
//!
//! [`EntityKind`] enumerates every row kind the platform stores. The set is
//! closed on purpose: scoping rules are keyed by kind with an exhaustive
//! match, so a new kind cannot ship until it has been classified.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One kind of stored entity.
///
/// Declaration order is fixed and load-bearing: bootstrap snapshots resolve,
/// fetch, and report kinds in exactly this order, and the derived [`Ord`]
/// follows it. Do not reorder variants.
///
/// # Examples
///
/// ```
/// use vetra_model::EntityKind;
///
/// assert_eq!(EntityKind::LabRequest.as_str(), "labRequest");
/// assert_eq!("labRequest".parse::<EntityKind>(), Ok(EntityKind::LabRequest));
/// assert!(EntityKind::User < EntityKind::Budget);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    /// A login account (staff or client) within a tenant.
    User,
    /// The clinic account itself; principals only ever see their own row.
    Tenant,
    /// A physical clinic location.
    Branch,
    /// A pet owner registered with the clinic.
    Client,
    /// An animal under care, owned by a client.
    Patient,
    /// A billing document issued to a client.
    Invoice,
    /// A stocked product with a cached total and a batch ledger.
    InventoryItem,
    /// A point-of-sale transaction.
    Sale,
    /// A service offered by the clinic (consult, vaccination, grooming).
    Service,
    /// A scheduled visit for a patient.
    Appointment,
    /// An operating expense entry.
    Expense,
    /// An audit trail entry.
    AuditLog,
    /// A portal chat message.
    ChatMessage,
    /// A clinical consultation note.
    Consultation,
    /// A laboratory work request attached to a patient.
    LabRequest,
    /// A budget plan for a period.
    Budget,
}

impl EntityKind {
    /// Every kind, in the fixed snapshot order.
    pub const ALL: [EntityKind; 16] = [
        EntityKind::User,
        EntityKind::Tenant,
        EntityKind::Branch,
        EntityKind::Client,
        EntityKind::Patient,
        EntityKind::Invoice,
        EntityKind::InventoryItem,
        EntityKind::Sale,
        EntityKind::Service,
        EntityKind::Appointment,
        EntityKind::Expense,
        EntityKind::AuditLog,
        EntityKind::ChatMessage,
        EntityKind::Consultation,
        EntityKind::LabRequest,
        EntityKind::Budget,
    ];

    /// Returns the stable camelCase wire name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Tenant => "tenant",
            EntityKind::Branch => "branch",
            EntityKind::Client => "client",
            EntityKind::Patient => "patient",
            EntityKind::Invoice => "invoice",
            EntityKind::InventoryItem => "inventoryItem",
            EntityKind::Sale => "sale",
            EntityKind::Service => "service",
            EntityKind::Appointment => "appointment",
            EntityKind::Expense => "expense",
            EntityKind::AuditLog => "auditLog",
            EntityKind::ChatMessage => "chatMessage",
            EntityKind::Consultation => "consultation",
            EntityKind::LabRequest => "labRequest",
            EntityKind::Budget => "budget",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(EntityKind::User),
            "tenant" => Ok(EntityKind::Tenant),
            "branch" => Ok(EntityKind::Branch),
            "client" => Ok(EntityKind::Client),
            "patient" => Ok(EntityKind::Patient),
            "invoice" => Ok(EntityKind::Invoice),
            "inventoryItem" | "inventory_item" => Ok(EntityKind::InventoryItem),
            "sale" => Ok(EntityKind::Sale),
            "service" => Ok(EntityKind::Service),
            "appointment" => Ok(EntityKind::Appointment),
            "expense" => Ok(EntityKind::Expense),
            "auditLog" | "audit_log" => Ok(EntityKind::AuditLog),
            "chatMessage" | "chat_message" => Ok(EntityKind::ChatMessage),
            "consultation" => Ok(EntityKind::Consultation),
            "labRequest" | "lab_request" => Ok(EntityKind::LabRequest),
            "budget" => Ok(EntityKind::Budget),
            _ => Err(format!("unknown entity kind: {}", s)),
        }
    }
}
