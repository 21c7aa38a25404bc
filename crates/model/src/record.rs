//! The stored-row representation.
//!
//! A [`Record`] is one row as the scoping engine sees it: its kind, id,
//! owning tenant, a JSON content document carrying the camelCase domain
//! fields, and storage timestamps. Stores return records; nothing in this
//! crate writes them back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::id::{RecordId, TenantId};
use crate::kind::EntityKind;

/// One stored row.
///
/// Domain fields (`ownerId`, `clientId`, `role`, `totalStock`, ...) live in
/// [`content`](Record::content) under camelCase keys; the owning tenant is a
/// dedicated column, never read out of the content document.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use vetra_model::{EntityKind, Record, TenantId};
///
/// let invoice = Record::new(
///     EntityKind::Invoice,
///     "inv-9",
///     TenantId::new("clinic-a"),
///     json!({ "clientId": "cli-7", "total": 1450 }),
/// );
///
/// assert_eq!(invoice.field_str("clientId"), Some("cli-7"));
/// assert_eq!(invoice.field_i64("total"), Some(1450));
/// assert_eq!(invoice.field("missing"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    kind: EntityKind,
    id: RecordId,
    tenant_id: TenantId,
    content: Value,
    created_at: DateTime<Utc>,
    last_modified: DateTime<Utc>,
}

impl Record {
    /// Creates a record with both timestamps set to now.
    pub fn new(
        kind: EntityKind,
        id: impl Into<RecordId>,
        tenant_id: TenantId,
        content: Value,
    ) -> Self {
        let now = Utc::now();
        Self {
            kind,
            id: id.into(),
            tenant_id,
            content,
            created_at: now,
            last_modified: now,
        }
    }

    /// Starts a builder for fixture and embedding use.
    pub fn builder(kind: EntityKind, id: impl Into<RecordId>, tenant_id: TenantId) -> RecordBuilder {
        RecordBuilder {
            kind,
            id: id.into(),
            tenant_id,
            content: Map::new(),
            created_at: None,
        }
    }

    /// The entity kind of this row.
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// The row id, unique within its tenant and kind.
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// The owning tenant.
    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    /// The JSON content document.
    pub fn content(&self) -> &Value {
        &self.content
    }

    /// When the row was first stored.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the row was last written.
    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    /// Looks up a top-level content field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.content.get(name)
    }

    /// Looks up a top-level content field as a string.
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }

    /// Looks up a top-level content field as an integer.
    pub fn field_i64(&self, name: &str) -> Option<i64> {
        self.field(name).and_then(Value::as_i64)
    }

    /// Returns this record with its content document replaced.
    ///
    /// Stores use this when materializing eager-loaded relations into a
    /// returned copy; the stored row itself is never mutated.
    pub fn with_content(mut self, content: Value) -> Self {
        self.content = content;
        self
    }
}

/// Builder for [`Record`], used by fixtures and embedding code.
///
/// # Examples
///
/// ```
/// use vetra_model::{EntityKind, Record, Role, TenantId};
///
/// let user = Record::builder(EntityKind::User, "usr-3", TenantId::new("clinic-a"))
///     .field("role", Role::Vet.as_str())
///     .field("email", "vet@clinic-a.example")
///     .build();
///
/// assert_eq!(user.field_str("role"), Some("vet"));
/// ```
#[derive(Debug)]
pub struct RecordBuilder {
    kind: EntityKind,
    id: RecordId,
    tenant_id: TenantId,
    content: Map<String, Value>,
    created_at: Option<DateTime<Utc>>,
}

impl RecordBuilder {
    /// Sets one content field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.content.insert(name.into(), value.into());
        self
    }

    /// Overrides the creation timestamp (also used as last-modified).
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Builds the record.
    pub fn build(self) -> Record {
        let ts = self.created_at.unwrap_or_else(Utc::now);
        Record {
            kind: self.kind,
            id: self.id,
            tenant_id: self.tenant_id,
            content: Value::Object(self.content),
            created_at: ts,
            last_modified: ts,
        }
    }
}
