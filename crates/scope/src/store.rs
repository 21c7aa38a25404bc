//! The storage abstraction scoped reads go through.

use async_trait::async_trait;

use vetra_model::{EntityKind, Record, Relation};

use crate::error::StoreResult;
use crate::filter::Filter;

/// A backend that can serve records under an access filter.
///
/// Implementations interpret the [`Filter`] themselves — a SQL backend
/// compiles it to a WHERE clause, the in-memory backend walks its maps. The
/// contract either way: every returned record satisfies the filter,
/// including its tenant conjunct, and requested relations are materialized
/// into each record's content before it is returned.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// A short static name for logs and error messages.
    fn backend_name(&self) -> &'static str;

    /// Fetches the records matching `filter`, with the named child
    /// relations loaded into each record's content. A relation that is
    /// requested but has no children still materializes as an empty array.
    async fn find(&self, filter: &Filter, load: &[Relation]) -> StoreResult<Vec<Record>>;

    /// Fetches every record of `kind` across all tenants.
    ///
    /// This bypasses scoping and exists for operational jobs that run over
    /// the whole dataset, such as integrity sweeps. Principal-driven reads
    /// must go through [`find`](RecordStore::find).
    async fn scan(&self, kind: EntityKind, load: &[Relation]) -> StoreResult<Vec<Record>>;

    /// Counts the records matching `filter`.
    async fn count(&self, filter: &Filter) -> StoreResult<u64> {
        Ok(self.find(filter, &[]).await?.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vetra_model::TenantId;

    struct TwoRowStore;

    #[async_trait]
    impl RecordStore for TwoRowStore {
        fn backend_name(&self) -> &'static str {
            "two-row"
        }

        async fn find(&self, filter: &Filter, _load: &[Relation]) -> StoreResult<Vec<Record>> {
            Ok(vec![
                Record::new(
                    filter.kind(),
                    "b-1",
                    filter.tenant_id().clone(),
                    json!({"name": "north"}),
                ),
                Record::new(
                    filter.kind(),
                    "b-2",
                    filter.tenant_id().clone(),
                    json!({"name": "south"}),
                ),
            ])
        }

        async fn scan(&self, _kind: EntityKind, _load: &[Relation]) -> StoreResult<Vec<Record>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_default_count_delegates_to_find() {
        let store = TwoRowStore;
        let filter = Filter::tenant_wide(EntityKind::Branch, TenantId::new("clinic-a"));
        let count = tokio_test::block_on(store.count(&filter)).unwrap();
        assert_eq!(count, 2);
    }
}
