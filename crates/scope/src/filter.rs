//! Access filters: the predicate objects scope resolution produces.
//!
//! A [`Filter`] is data, not behavior — stores interpret it. Its shape keeps
//! the isolation guarantee structural: every filter carries exactly one
//! mandatory [`TenantClause`], and the refining [`Predicate`] can only narrow
//! within that tenant. There is no constructor that yields a filter without
//! a tenant conjunct.

use serde_json::Value;

use vetra_model::{EntityKind, ParentLink, RecordId, TenantId};

/// The mandatory tenant conjunct every filter carries.
#[derive(Debug, Clone, PartialEq)]
pub enum TenantClause {
    /// `tenantId = ?` on the row — the normal case.
    Rows(TenantId),
    /// `id = ?` — the principal's own tenant row; used only for the Tenant
    /// kind, which is never listed cross-tenant.
    Identity(TenantId),
}

impl TenantClause {
    /// The tenant the clause pins the filter to.
    pub fn tenant_id(&self) -> &TenantId {
        match self {
            TenantClause::Rows(tenant_id) | TenantClause::Identity(tenant_id) => tenant_id,
        }
    }
}

/// A refining predicate over one kind's content fields.
///
/// The grammar is exactly what scope rules produce: equality tests on
/// content fields, a disjunction, and one to-one parent traversal for kinds
/// whose ownership column lives on a parent row.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Matches every row (the tenant clause still applies).
    All,
    /// Matches no rows at all. Produced when a principal violates the
    /// client-binding contract: fail closed, never open.
    None,
    /// Equality on a top-level content field.
    Eq(&'static str, Value),
    /// Negated equality on a top-level content field. A row missing the
    /// field counts as not-equal.
    Ne(&'static str, Value),
    /// Equality on the row id itself, for kinds where the id doubles as the
    /// ownership key.
    IdIs(RecordId),
    /// True when any branch matches.
    AnyOf(Vec<Predicate>),
    /// True when the row's parent (resolved within the same tenant)
    /// matches the inner predicate. A row without a resolvable parent
    /// matches nothing.
    Parent(ParentLink, Box<Predicate>),
}

impl Predicate {
    /// Equality on a content field.
    pub fn eq(field: &'static str, value: impl Into<Value>) -> Self {
        Predicate::Eq(field, value.into())
    }

    /// Negated equality on a content field.
    pub fn ne(field: &'static str, value: impl Into<Value>) -> Self {
        Predicate::Ne(field, value.into())
    }

    /// Equality on the row id.
    pub fn id_is(id: impl Into<RecordId>) -> Self {
        Predicate::IdIs(id.into())
    }

    /// Disjunction of branches.
    pub fn any_of(branches: Vec<Predicate>) -> Self {
        Predicate::AnyOf(branches)
    }

    /// Parent traversal: the row's linked parent must match `inner`.
    pub fn parent(link: ParentLink, inner: Predicate) -> Self {
        Predicate::Parent(link, Box::new(inner))
    }
}

/// An access filter for one entity kind.
///
/// # Examples
///
/// ```
/// use vetra_model::{EntityKind, TenantId};
/// use vetra_scope::{Filter, Predicate, TenantClause};
///
/// let filter = Filter::refined(
///     EntityKind::Patient,
///     TenantId::new("clinic-a"),
///     Predicate::eq("ownerId", "cli-7"),
/// );
///
/// assert_eq!(filter.kind(), EntityKind::Patient);
/// assert_eq!(filter.tenant_id().as_str(), "clinic-a");
/// assert!(matches!(filter.tenant_clause(), TenantClause::Rows(_)));
/// assert!(!filter.is_zero_match());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    kind: EntityKind,
    clause: TenantClause,
    refine: Predicate,
}

impl Filter {
    /// Every row of the kind within the tenant.
    pub fn tenant_wide(kind: EntityKind, tenant_id: TenantId) -> Self {
        Self {
            kind,
            clause: TenantClause::Rows(tenant_id),
            refine: Predicate::All,
        }
    }

    /// The principal's own tenant row, by identity.
    pub fn tenant_identity(tenant_id: TenantId) -> Self {
        Self {
            kind: EntityKind::Tenant,
            clause: TenantClause::Identity(tenant_id),
            refine: Predicate::All,
        }
    }

    /// Rows of the kind within the tenant, narrowed by a predicate.
    pub fn refined(kind: EntityKind, tenant_id: TenantId, refine: Predicate) -> Self {
        Self {
            kind,
            clause: TenantClause::Rows(tenant_id),
            refine,
        }
    }

    /// A filter matching zero rows, still pinned to the tenant.
    pub fn zero_match(kind: EntityKind, tenant_id: TenantId) -> Self {
        Self::refined(kind, tenant_id, Predicate::None)
    }

    /// The kind this filter applies to.
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// The mandatory tenant conjunct.
    pub fn tenant_clause(&self) -> &TenantClause {
        &self.clause
    }

    /// The tenant the filter is pinned to.
    pub fn tenant_id(&self) -> &TenantId {
        self.clause.tenant_id()
    }

    /// The refining predicate.
    pub fn refinement(&self) -> &Predicate {
        &self.refine
    }

    /// Returns `true` when the filter can never match a row.
    pub fn is_zero_match(&self) -> bool {
        matches!(self.refine, Predicate::None)
    }
}
