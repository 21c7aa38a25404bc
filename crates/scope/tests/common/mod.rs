//! Shared fixtures for the scoping and bootstrap suites.
//!
//! Seeds two clinics with the same row ids so any cross-tenant leak shows
//! up as a count mismatch, and provides store decorators that inject
//! outages, latency, and tenancy violations.

// Not every suite uses every helper.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use vetra_model::{EntityKind, Record, Relation, TenantId};
use vetra_scope::{Filter, MemoryStore, RecordStore, StoreError, StoreResult};

pub const CLINIC_A: &str = "clinic-a";
pub const CLINIC_B: &str = "clinic-b";

pub fn tenant_a() -> TenantId {
    TenantId::new(CLINIC_A)
}

pub fn tenant_b() -> TenantId {
    TenantId::new(CLINIC_B)
}

/// Both clinics seeded with identical row ids.
pub fn seeded_store() -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    seed_clinic(&store, CLINIC_A);
    seed_clinic(&store, CLINIC_B);
    Arc::new(store)
}

/// Seeds one clinic. Every entity kind gets at least one row; client
/// "cli-7" owns patient "pat-1" and its paper trail, client "cli-9" owns
/// "pat-2".
pub fn seed_clinic(store: &MemoryStore, tenant: &str) {
    let t = TenantId::new(tenant);

    store.insert(Record::new(
        EntityKind::Tenant,
        tenant,
        t.clone(),
        json!({"name": tenant, "plan": "pro"}),
    ));
    store.insert(Record::new(
        EntityKind::Branch,
        "br-1",
        t.clone(),
        json!({"name": "main", "address": "1 Harbor St"}),
    ));
    store.insert(Record::new(
        EntityKind::Service,
        "svc-1",
        t.clone(),
        json!({"name": "consultation", "price": 350}),
    ));

    store.insert(Record::new(
        EntityKind::User,
        "usr-vet",
        t.clone(),
        json!({"name": "Sam", "role": "vet"}),
    ));
    store.insert(Record::new(
        EntityKind::User,
        "usr-admin",
        t.clone(),
        json!({"name": "Alex", "role": "admin"}),
    ));
    store.insert(Record::new(
        EntityKind::User,
        "usr-cli-7",
        t.clone(),
        json!({"name": "Dana", "role": "client", "clientId": "cli-7"}),
    ));
    store.insert(Record::new(
        EntityKind::User,
        "usr-cli-9",
        t.clone(),
        json!({"name": "Noa", "role": "client", "clientId": "cli-9"}),
    ));

    store.insert(Record::new(
        EntityKind::Client,
        "cli-7",
        t.clone(),
        json!({"name": "Dana", "email": "dana@example.com"}),
    ));
    store.insert(Record::new(
        EntityKind::Client,
        "cli-9",
        t.clone(),
        json!({"name": "Noa", "email": "noa@example.com"}),
    ));

    store.insert(Record::new(
        EntityKind::Patient,
        "pat-1",
        t.clone(),
        json!({"name": "Rex", "species": "dog", "ownerId": "cli-7"}),
    ));
    store.insert(Record::new(
        EntityKind::Patient,
        "pat-2",
        t.clone(),
        json!({"name": "Mia", "species": "cat", "ownerId": "cli-9"}),
    ));
    store.attach(Relation::Notes, &t, "pat-1", json!({"text": "annual checkup"}));
    store.attach(Relation::Attachments, &t, "pat-1", json!({"file": "xray.png"}));
    store.attach(
        Relation::Reminders,
        &t,
        "pat-1",
        json!({"note": "rabies booster", "due": "2026-09-01"}),
    );

    store.insert(Record::new(
        EntityKind::Invoice,
        "inv-1",
        t.clone(),
        json!({"clientId": "cli-7", "total": 420}),
    ));
    store.insert(Record::new(
        EntityKind::Invoice,
        "inv-2",
        t.clone(),
        json!({"clientId": "cli-9", "total": 180}),
    ));
    store.insert(Record::new(
        EntityKind::Appointment,
        "apt-1",
        t.clone(),
        json!({"clientId": "cli-7", "patientId": "pat-1", "reason": "vaccination"}),
    ));
    store.insert(Record::new(
        EntityKind::ChatMessage,
        "msg-1",
        t.clone(),
        json!({"clientId": "cli-7", "text": "is Rex ready for pickup?"}),
    ));
    store.insert(Record::new(
        EntityKind::ChatMessage,
        "msg-2",
        t.clone(),
        json!({"clientId": "cli-9", "text": "rescheduling to Friday"}),
    ));
    store.insert(Record::new(
        EntityKind::LabRequest,
        "lab-1",
        t.clone(),
        json!({"patientId": "pat-1", "test": "cbc"}),
    ));
    store.insert(Record::new(
        EntityKind::LabRequest,
        "lab-2",
        t.clone(),
        json!({"patientId": "pat-2", "test": "chem panel"}),
    ));

    seed_inventory(store, &t, "itm-ok", 10, &[4, 6]);
    seed_inventory(store, &t, "itm-drift", 10, &[4, 5]);
    seed_inventory(store, &t, "itm-neg", -3, &[-3]);

    store.insert(Record::new(
        EntityKind::Sale,
        "sal-1",
        t.clone(),
        json!({"clientId": "cli-7", "total": 89}),
    ));
    store.insert(Record::new(
        EntityKind::Expense,
        "exp-1",
        t.clone(),
        json!({"category": "utilities", "amount": 120}),
    ));
    store.insert(Record::new(
        EntityKind::AuditLog,
        "aud-1",
        t.clone(),
        json!({"action": "login", "userId": "usr-vet"}),
    ));
    store.insert(Record::new(
        EntityKind::Consultation,
        "con-1",
        t.clone(),
        json!({"patientId": "pat-1", "diagnosis": "otitis externa"}),
    ));
    store.insert(Record::new(
        EntityKind::Budget,
        "bud-1",
        t,
        json!({"year": 2026, "amount": 50000}),
    ));
}

/// Inserts one inventory item with its batch ledger attached as child rows.
pub fn seed_inventory(
    store: &MemoryStore,
    tenant: &TenantId,
    id: &str,
    total: i64,
    quantities: &[i64],
) {
    store.insert(Record::new(
        EntityKind::InventoryItem,
        id,
        tenant.clone(),
        json!({"name": id, "totalStock": total}),
    ));
    for (index, quantity) in quantities.iter().enumerate() {
        store.attach(
            Relation::Batches,
            tenant,
            id,
            json!({"id": format!("{}-b{}", id, index), "quantity": quantity}),
        );
    }
}

/// Delegates to an inner store but refuses the configured kinds.
pub struct FailingStore {
    inner: Arc<MemoryStore>,
    broken: Vec<EntityKind>,
}

impl FailingStore {
    pub fn new(inner: Arc<MemoryStore>, broken: Vec<EntityKind>) -> Self {
        Self { inner, broken }
    }

    fn outage(&self) -> StoreError {
        StoreError::Unavailable {
            backend_name: "failing".to_string(),
            message: "injected outage".to_string(),
        }
    }
}

#[async_trait]
impl RecordStore for FailingStore {
    fn backend_name(&self) -> &'static str {
        "failing"
    }

    async fn find(&self, filter: &Filter, load: &[Relation]) -> StoreResult<Vec<Record>> {
        if self.broken.contains(&filter.kind()) {
            return Err(self.outage());
        }
        self.inner.find(filter, load).await
    }

    async fn scan(&self, kind: EntityKind, load: &[Relation]) -> StoreResult<Vec<Record>> {
        if self.broken.contains(&kind) {
            return Err(self.outage());
        }
        self.inner.scan(kind, load).await
    }
}

/// Delegates to an inner store but sleeps before serving the configured
/// kinds.
pub struct SlowStore {
    inner: Arc<MemoryStore>,
    slow: Vec<EntityKind>,
    delay: Duration,
}

impl SlowStore {
    pub fn new(inner: Arc<MemoryStore>, slow: Vec<EntityKind>, delay: Duration) -> Self {
        Self { inner, slow, delay }
    }
}

#[async_trait]
impl RecordStore for SlowStore {
    fn backend_name(&self) -> &'static str {
        "slow"
    }

    async fn find(&self, filter: &Filter, load: &[Relation]) -> StoreResult<Vec<Record>> {
        if self.slow.contains(&filter.kind()) {
            tokio::time::sleep(self.delay).await;
        }
        self.inner.find(filter, load).await
    }

    async fn scan(&self, kind: EntityKind, load: &[Relation]) -> StoreResult<Vec<Record>> {
        self.inner.scan(kind, load).await
    }
}

/// Delegates to an inner store but appends one foreign-tenant row to the
/// configured kind, simulating a backend that ignores the tenant clause.
pub struct LeakyStore {
    inner: Arc<MemoryStore>,
    leak_kind: EntityKind,
}

impl LeakyStore {
    pub fn new(inner: Arc<MemoryStore>, leak_kind: EntityKind) -> Self {
        Self { inner, leak_kind }
    }
}

#[async_trait]
impl RecordStore for LeakyStore {
    fn backend_name(&self) -> &'static str {
        "leaky"
    }

    async fn find(&self, filter: &Filter, load: &[Relation]) -> StoreResult<Vec<Record>> {
        let mut rows = self.inner.find(filter, load).await?;
        if filter.kind() == self.leak_kind {
            rows.push(Record::new(
                self.leak_kind,
                "foreign-1",
                TenantId::new("clinic-other"),
                json!({"name": "should never appear"}),
            ));
        }
        Ok(rows)
    }

    async fn scan(&self, kind: EntityKind, load: &[Relation]) -> StoreResult<Vec<Record>> {
        self.inner.scan(kind, load).await
    }
}
