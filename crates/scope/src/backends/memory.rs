//! In-memory record store.
//!
//! Rows live in ordered maps keyed by `(kind, tenant, id)`, so every read
//! comes back in a stable order. Child rows for eager relations are kept
//! in a sibling map keyed by `(relation, tenant, parent id)` and are
//! spliced into the parent's content on read, the same shape a relational
//! backend would produce with a join.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use vetra_model::{EntityKind, Record, Relation, TenantId};

use crate::error::{StoreError, StoreResult};
use crate::filter::{Filter, Predicate, TenantClause};
use crate::store::RecordStore;

type RecordKey = (EntityKind, String, String);
type ChildKey = (Relation, String, String);

/// A thread-safe in-memory [`RecordStore`].
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use vetra_model::{EntityKind, Record, TenantId};
/// use vetra_scope::MemoryStore;
///
/// let store = MemoryStore::new();
/// store.insert(Record::new(
///     EntityKind::Branch,
///     "br-1",
///     TenantId::new("clinic-a"),
///     json!({"name": "north"}),
/// ));
/// assert_eq!(store.record_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<RecordKey, Record>>,
    children: RwLock<BTreeMap<ChildKey, Vec<Value>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a record, keyed by kind, tenant and id.
    pub fn insert(&self, record: Record) {
        let key = (
            record.kind(),
            record.tenant_id().as_str().to_string(),
            record.id().as_str().to_string(),
        );
        self.records.write().insert(key, record);
    }

    /// Attaches a child row under a parent for eager loading.
    pub fn attach(&self, relation: Relation, tenant_id: &TenantId, parent_id: &str, child: Value) {
        let key = (
            relation,
            tenant_id.as_str().to_string(),
            parent_id.to_string(),
        );
        self.children.write().entry(key).or_default().push(child);
    }

    /// Removes every record and child row.
    pub fn clear(&self) {
        self.records.write().clear();
        self.children.write().clear();
    }

    /// Total records across all kinds and tenants.
    pub fn record_count(&self) -> usize {
        self.records.read().len()
    }

    fn check_traversals(kind: EntityKind, load: &[Relation]) -> StoreResult<()> {
        for relation in load {
            if relation.parent_kind() != kind {
                return Err(StoreError::InvalidTraversal {
                    kind,
                    path: relation.field().to_string(),
                });
            }
        }
        Ok(())
    }

    fn find_sync(&self, filter: &Filter, load: &[Relation]) -> StoreResult<Vec<Record>> {
        Self::check_traversals(filter.kind(), load)?;

        let records = self.records.read();
        let kind = filter.kind();
        let tenant = filter.tenant_id().as_str();

        let mut out = Vec::new();
        let from = (kind, tenant.to_string(), String::new());
        for ((row_kind, row_tenant, row_id), record) in records.range(from..) {
            if *row_kind != kind || row_tenant != tenant {
                break;
            }
            if let TenantClause::Identity(tenant_id) = filter.tenant_clause() {
                if row_id != tenant_id.as_str() {
                    continue;
                }
            }
            if !Self::matches(&records, record, tenant, filter.refinement()) {
                continue;
            }
            out.push(self.load_relations(record, tenant, load));
        }
        Ok(out)
    }

    fn scan_sync(&self, kind: EntityKind, load: &[Relation]) -> StoreResult<Vec<Record>> {
        Self::check_traversals(kind, load)?;

        let records = self.records.read();
        let mut out = Vec::new();
        let from = (kind, String::new(), String::new());
        for ((row_kind, row_tenant, _), record) in records.range(from..) {
            if *row_kind != kind {
                break;
            }
            out.push(self.load_relations(record, row_tenant, load));
        }
        Ok(out)
    }

    fn matches(
        records: &BTreeMap<RecordKey, Record>,
        record: &Record,
        tenant: &str,
        predicate: &Predicate,
    ) -> bool {
        match predicate {
            Predicate::All => true,
            Predicate::None => false,
            Predicate::Eq(field, value) => record.field(field) == Some(value),
            Predicate::Ne(field, value) => record.field(field) != Some(value),
            Predicate::IdIs(id) => record.id() == id,
            Predicate::AnyOf(branches) => branches
                .iter()
                .any(|branch| Self::matches(records, record, tenant, branch)),
            Predicate::Parent(link, inner) => {
                // Parents resolve within the same tenant only; a dangling
                // or foreign link matches nothing.
                let Some(parent_id) = record.field_str(link.key) else {
                    return false;
                };
                let key = (link.kind, tenant.to_string(), parent_id.to_string());
                match records.get(&key) {
                    Some(parent) => Self::matches(records, parent, tenant, inner),
                    None => false,
                }
            }
        }
    }

    fn load_relations(&self, record: &Record, tenant: &str, load: &[Relation]) -> Record {
        if load.is_empty() {
            return record.clone();
        }
        let children = self.children.read();
        let mut content = record.content().clone();
        if let Value::Object(map) = &mut content {
            for relation in load {
                let key = (
                    *relation,
                    tenant.to_string(),
                    record.id().as_str().to_string(),
                );
                let rows = children.get(&key).cloned().unwrap_or_default();
                map.insert(relation.field().to_string(), Value::Array(rows));
            }
        }
        record.clone().with_content(content)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn find(&self, filter: &Filter, load: &[Relation]) -> StoreResult<Vec<Record>> {
        self.find_sync(filter, load)
    }

    async fn scan(&self, kind: EntityKind, load: &[Relation]) -> StoreResult<Vec<Record>> {
        self.scan_sync(kind, load)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        let a = TenantId::new("clinic-a");
        let b = TenantId::new("clinic-b");

        store.insert(Record::new(
            EntityKind::Tenant,
            "clinic-a",
            a.clone(),
            json!({"name": "Clinic A"}),
        ));
        store.insert(Record::new(
            EntityKind::Patient,
            "pat-1",
            a.clone(),
            json!({"name": "Rex", "ownerId": "cli-7"}),
        ));
        store.insert(Record::new(
            EntityKind::Patient,
            "pat-2",
            a.clone(),
            json!({"name": "Mia", "ownerId": "cli-9"}),
        ));
        store.insert(Record::new(
            EntityKind::Patient,
            "pat-3",
            b.clone(),
            json!({"name": "Ivy", "ownerId": "cli-7"}),
        ));
        store.insert(Record::new(
            EntityKind::LabRequest,
            "lab-1",
            a.clone(),
            json!({"patientId": "pat-1", "test": "cbc"}),
        ));
        store.insert(Record::new(
            EntityKind::LabRequest,
            "lab-2",
            a.clone(),
            json!({"patientId": "pat-2", "test": "chem"}),
        ));
        store
    }

    #[test]
    fn test_tenant_wide_find_is_tenant_bounded() {
        let store = seeded();
        let filter = Filter::tenant_wide(EntityKind::Patient, TenantId::new("clinic-a"));
        let rows = tokio_test::block_on(store.find(&filter, &[])).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.tenant_id().as_str() == "clinic-a"));
        // Ordered map keys give a stable id order.
        assert_eq!(rows[0].id().as_str(), "pat-1");
        assert_eq!(rows[1].id().as_str(), "pat-2");
    }

    #[test]
    fn test_eq_predicate_narrows_to_owner() {
        let store = seeded();
        let filter = Filter::refined(
            EntityKind::Patient,
            TenantId::new("clinic-a"),
            Predicate::eq("ownerId", "cli-7"),
        );
        let rows = tokio_test::block_on(store.find(&filter, &[])).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id().as_str(), "pat-1");
    }

    #[test]
    fn test_parent_predicate_follows_patient_owner() {
        let store = seeded();
        let link = vetra_model::ParentLink::of(EntityKind::LabRequest).unwrap();
        let filter = Filter::refined(
            EntityKind::LabRequest,
            TenantId::new("clinic-a"),
            Predicate::parent(link, Predicate::eq("ownerId", "cli-7")),
        );
        let rows = tokio_test::block_on(store.find(&filter, &[])).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id().as_str(), "lab-1");
    }

    #[test]
    fn test_parent_predicate_ignores_dangling_links() {
        let store = seeded();
        store.insert(Record::new(
            EntityKind::LabRequest,
            "lab-3",
            TenantId::new("clinic-a"),
            json!({"test": "urinalysis"}),
        ));
        let link = vetra_model::ParentLink::of(EntityKind::LabRequest).unwrap();
        let filter = Filter::refined(
            EntityKind::LabRequest,
            TenantId::new("clinic-a"),
            Predicate::parent(link, Predicate::All),
        );
        let rows = tokio_test::block_on(store.find(&filter, &[])).unwrap();
        assert!(rows.iter().all(|r| r.id().as_str() != "lab-3"));
    }

    #[test]
    fn test_identity_clause_returns_own_tenant_row() {
        let store = seeded();
        let filter = Filter::tenant_identity(TenantId::new("clinic-a"));
        let rows = tokio_test::block_on(store.find(&filter, &[])).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id().as_str(), "clinic-a");
    }

    #[test]
    fn test_zero_match_filter_finds_nothing() {
        let store = seeded();
        let filter = Filter::zero_match(EntityKind::Patient, TenantId::new("clinic-a"));
        let rows = tokio_test::block_on(store.find(&filter, &[])).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_requested_relation_always_materializes() {
        let store = seeded();
        store.attach(
            Relation::Notes,
            &TenantId::new("clinic-a"),
            "pat-1",
            json!({"text": "annual checkup"}),
        );
        let filter = Filter::tenant_wide(EntityKind::Patient, TenantId::new("clinic-a"));
        let rows = tokio_test::block_on(
            store.find(&filter, &[Relation::Notes, Relation::Reminders]),
        )
        .unwrap();

        let rex = rows.iter().find(|r| r.id().as_str() == "pat-1").unwrap();
        assert_eq!(rex.field("notes").unwrap().as_array().unwrap().len(), 1);
        // No reminders attached, but the array is still present.
        assert_eq!(rex.field("reminders").unwrap(), &json!([]));
    }

    #[test]
    fn test_children_do_not_leak_across_tenants() {
        let store = seeded();
        store.attach(
            Relation::Notes,
            &TenantId::new("clinic-b"),
            "pat-1",
            json!({"text": "from the other clinic"}),
        );
        let filter = Filter::tenant_wide(EntityKind::Patient, TenantId::new("clinic-a"));
        let rows = tokio_test::block_on(store.find(&filter, &[Relation::Notes])).unwrap();
        let rex = rows.iter().find(|r| r.id().as_str() == "pat-1").unwrap();
        assert_eq!(rex.field("notes").unwrap(), &json!([]));
    }

    #[test]
    fn test_scan_crosses_tenants() {
        let store = seeded();
        let rows = tokio_test::block_on(store.scan(EntityKind::Patient, &[])).unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_foreign_relation_is_invalid_traversal() {
        let store = seeded();
        let filter = Filter::tenant_wide(EntityKind::Patient, TenantId::new("clinic-a"));
        let err = tokio_test::block_on(store.find(&filter, &[Relation::Batches])).unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidTraversal {
                kind: EntityKind::Patient,
                ..
            }
        ));
    }
}
