//! Scope resolution: principal + kind in, decision out.
//!
//! [`resolve_scope`] is a total function. It never touches a store, never
//! errors, and returns the same decision for the same inputs. Ill-formed
//! principals degrade to a zero-match filter rather than an error so that a
//! bad token can never widen access or take a request down.

use tracing::warn;

use vetra_model::{ClientId, EntityKind, Role};

use crate::filter::{Filter, Predicate};
use crate::principal::Principal;
use crate::visibility::{visibility, OwnerRule, VisibilityClass};

/// The outcome of resolving one principal against one kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ScopeDecision {
    /// The kind is hidden from this principal. Distinct from an empty
    /// result: a denied kind is omitted, not shown as empty.
    Denied,
    /// The kind is visible through the carried filter.
    Allowed(Filter),
}

impl ScopeDecision {
    /// Returns `true` when the kind is hidden from the principal.
    pub fn is_denied(&self) -> bool {
        matches!(self, ScopeDecision::Denied)
    }

    /// Returns `true` when the kind is visible.
    pub fn is_allowed(&self) -> bool {
        !self.is_denied()
    }

    /// The carried filter, when allowed.
    pub fn filter(&self) -> Option<&Filter> {
        match self {
            ScopeDecision::Denied => None,
            ScopeDecision::Allowed(filter) => Some(filter),
        }
    }
}

/// Resolves the access scope of `principal` for `kind`.
///
/// Staff principals see every visible kind tenant-wide. Client principals
/// are denied staff-only kinds outright and narrowed to owned rows
/// elsewhere. A client principal without a usable client binding resolves
/// to a filter that matches nothing.
///
/// # Examples
///
/// ```
/// use vetra_model::{EntityKind, Role, TenantId};
/// use vetra_scope::{resolve_scope, Principal, ScopeDecision};
///
/// let vet = Principal::new(TenantId::new("clinic-a"), Role::Vet);
/// let decision = resolve_scope(&vet, EntityKind::Expense);
/// assert!(decision.is_allowed());
///
/// let client = Principal::client(TenantId::new("clinic-a"), "cli-7".into());
/// assert!(resolve_scope(&client, EntityKind::Expense).is_denied());
/// ```
pub fn resolve_scope(principal: &Principal, kind: EntityKind) -> ScopeDecision {
    let tenant_id = principal.tenant_id().clone();

    match visibility(kind) {
        VisibilityClass::Identity => ScopeDecision::Allowed(Filter::tenant_identity(tenant_id)),
        VisibilityClass::TenantWide => {
            ScopeDecision::Allowed(Filter::tenant_wide(kind, tenant_id))
        }
        VisibilityClass::StaffOnly => {
            if principal.is_client() {
                ScopeDecision::Denied
            } else {
                ScopeDecision::Allowed(Filter::tenant_wide(kind, tenant_id))
            }
        }
        VisibilityClass::SelfAndOthers => {
            if !principal.is_client() {
                return ScopeDecision::Allowed(Filter::tenant_wide(kind, tenant_id));
            }
            let Some(client_id) = usable_binding(principal, kind) else {
                return ScopeDecision::Allowed(Filter::zero_match(kind, tenant_id));
            };
            // Staff users stay visible; the only rows hidden from a client
            // are other clients' user accounts.
            let refine = Predicate::any_of(vec![
                Predicate::ne("role", Role::Client.as_str()),
                Predicate::eq("clientId", client_id.as_str()),
            ]);
            ScopeDecision::Allowed(Filter::refined(kind, tenant_id, refine))
        }
        VisibilityClass::OwnerScoped(rule) => {
            if !principal.is_client() {
                return ScopeDecision::Allowed(Filter::tenant_wide(kind, tenant_id));
            }
            let Some(client_id) = usable_binding(principal, kind) else {
                return ScopeDecision::Allowed(Filter::zero_match(kind, tenant_id));
            };
            let refine = match rule {
                OwnerRule::Field(field) => Predicate::eq(field, client_id.as_str()),
                OwnerRule::OwnRecord => Predicate::id_is(client_id.as_str()),
                OwnerRule::Parent { link, field } => {
                    Predicate::parent(link, Predicate::eq(field, client_id.as_str()))
                }
            };
            ScopeDecision::Allowed(Filter::refined(kind, tenant_id, refine))
        }
    }
}

/// The principal's client binding, when it is actually usable for
/// ownership tests. Absent or empty bindings yield `None`.
fn usable_binding<'a>(principal: &'a Principal, kind: EntityKind) -> Option<&'a ClientId> {
    match principal.client_id() {
        Some(client_id) if !client_id.as_str().is_empty() => Some(client_id),
        _ => {
            warn!(
                tenant_id = %principal.tenant_id(),
                kind = %kind,
                "client principal has no usable client binding; scoping to zero rows"
            );
            None
        }
    }
}
