//! Relation descriptors: eager-loadable child collections and the one
//! to-one parent traversal the scoping rules need.
//!
//! A [`Relation`] names a child collection a store can materialize into a
//! returned record's content (`patient.notes`, `inventoryItem.batches`).
//! A [`ParentLink`] names a to-one hop from a child row to the parent row
//! that carries its ownership column; lab requests have no client column of
//! their own, so their ownership is resolved through the parent patient.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::kind::EntityKind;

/// An eager-loadable child collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Relation {
    /// Clinical notes attached to a patient.
    Notes,
    /// File attachments on a patient.
    Attachments,
    /// Care reminders scheduled for a patient.
    Reminders,
    /// Stock batches backing an inventory item's cached total.
    Batches,
}

impl Relation {
    /// The kind whose rows carry this collection.
    pub fn parent_kind(&self) -> EntityKind {
        match self {
            Relation::Notes | Relation::Attachments | Relation::Reminders => EntityKind::Patient,
            Relation::Batches => EntityKind::InventoryItem,
        }
    }

    /// The content field the collection is materialized under.
    pub fn field(&self) -> &'static str {
        match self {
            Relation::Notes => "notes",
            Relation::Attachments => "attachments",
            Relation::Reminders => "reminders",
            Relation::Batches => "batches",
        }
    }

    /// The foreign-key field child rows use to reference their parent.
    pub fn parent_key(&self) -> &'static str {
        match self {
            Relation::Notes | Relation::Attachments | Relation::Reminders => "patientId",
            Relation::Batches => "itemId",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.field())
    }
}

/// The relations a bootstrap fetch eagerly loads for a kind.
///
/// Patients come back with notes, attachments, and reminders; inventory
/// items come back with their batch ledger. Every other kind loads nothing.
pub fn eager_relations(kind: EntityKind) -> &'static [Relation] {
    match kind {
        EntityKind::Patient => &[Relation::Notes, Relation::Attachments, Relation::Reminders],
        EntityKind::InventoryItem => &[Relation::Batches],
        _ => &[],
    }
}

/// A to-one link from a child kind to the parent row carrying its
/// ownership column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentLink {
    /// The parent kind the link resolves to.
    pub kind: EntityKind,
    /// The content field on the child holding the parent's row id.
    pub key: &'static str,
}

impl ParentLink {
    /// The link lab requests resolve ownership through: their parent
    /// patient carries the owning client id.
    pub const LAB_REQUEST: ParentLink = ParentLink {
        kind: EntityKind::Patient,
        key: "patientId",
    };

    /// The parent link for a kind, if its ownership is transitive.
    ///
    /// Only lab requests resolve ownership through a parent today.
    pub fn of(kind: EntityKind) -> Option<ParentLink> {
        match kind {
            EntityKind::LabRequest => Some(Self::LAB_REQUEST),
            _ => None,
        }
    }
}

impl fmt::Display for ParentLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.key, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_parent_kinds() {
        assert_eq!(Relation::Notes.parent_kind(), EntityKind::Patient);
        assert_eq!(Relation::Attachments.parent_kind(), EntityKind::Patient);
        assert_eq!(Relation::Reminders.parent_kind(), EntityKind::Patient);
        assert_eq!(Relation::Batches.parent_kind(), EntityKind::InventoryItem);
    }

    #[test]
    fn test_relation_keys() {
        assert_eq!(Relation::Notes.parent_key(), "patientId");
        assert_eq!(Relation::Batches.parent_key(), "itemId");
        assert_eq!(Relation::Batches.field(), "batches");
    }

    #[test]
    fn test_eager_relations_map() {
        assert_eq!(
            eager_relations(EntityKind::Patient),
            &[Relation::Notes, Relation::Attachments, Relation::Reminders]
        );
        assert_eq!(eager_relations(EntityKind::InventoryItem), &[Relation::Batches]);
        assert!(eager_relations(EntityKind::Invoice).is_empty());
        assert!(eager_relations(EntityKind::User).is_empty());
    }

    #[test]
    fn test_parent_link_only_for_lab_requests() {
        let link = ParentLink::of(EntityKind::LabRequest).unwrap();
        assert_eq!(link, ParentLink::LAB_REQUEST);
        assert_eq!(link.kind, EntityKind::Patient);
        assert_eq!(link.key, "patientId");

        for kind in EntityKind::ALL {
            if kind != EntityKind::LabRequest {
                assert!(ParentLink::of(kind).is_none(), "unexpected link for {}", kind);
            }
        }
    }
}
