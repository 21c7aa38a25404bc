//! The resolved identity a request acts as.
//!
//! A [`Principal`] arrives from the authentication collaborator already
//! verified; this crate never checks credentials. The contract is that a
//! client-role principal carries its client binding. [`PrincipalBuilder`]
//! enforces the contract eagerly for hand-built principals; values that
//! sidestep it (for example, deserialized token claims) are still accepted
//! by the resolver, which fails closed on them instead of erroring.

use serde::{Deserialize, Serialize};

use vetra_model::{ClientId, EntityKind, Role, TenantId};

use crate::error::PrincipalError;
use crate::resolver::{resolve_scope, ScopeDecision};

/// The resolved identity context: tenant, role, optional client binding.
///
/// # Examples
///
/// ```
/// use vetra_model::{Role, TenantId};
/// use vetra_scope::Principal;
///
/// let vet = Principal::new(TenantId::new("clinic-a"), Role::Vet);
/// assert!(vet.role().is_staff());
/// assert!(vet.client_id().is_none());
///
/// let owner = Principal::client(TenantId::new("clinic-a"), "cli-7".into());
/// assert!(owner.role().is_client());
/// assert_eq!(owner.client_id().unwrap().as_str(), "cli-7");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    tenant_id: TenantId,
    role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    client_id: Option<ClientId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,
}

impl Principal {
    /// Creates a staff-class principal without a client binding.
    ///
    /// For the client role use [`Principal::client`], which carries the
    /// binding the scoping contract requires.
    pub fn new(tenant_id: TenantId, role: Role) -> Self {
        Self {
            tenant_id,
            role,
            client_id: None,
            correlation_id: None,
        }
    }

    /// Creates a client-role principal with its client binding.
    pub fn client(tenant_id: TenantId, client_id: ClientId) -> Self {
        Self {
            tenant_id,
            role: Role::Client,
            client_id: Some(client_id),
            correlation_id: None,
        }
    }

    /// Creates the platform-operator principal.
    ///
    /// Bound to the reserved system tenant, never to a null tenant, so its
    /// filters stay tenant-conjunctive like everyone else's. Operator
    /// tooling that needs to look inside a clinic constructs a principal
    /// for that clinic's tenant instead.
    pub fn system() -> Self {
        Self::new(TenantId::system(), Role::SuperAdmin)
    }

    /// Starts a validating builder.
    pub fn builder(tenant_id: impl Into<TenantId>, role: Role) -> PrincipalBuilder {
        PrincipalBuilder {
            tenant_id: tenant_id.into(),
            role,
            client_id: None,
            correlation_id: None,
        }
    }

    /// Attaches a correlation id carried into bootstrap log spans.
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// The tenant this principal acts within.
    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    /// The role this principal acts as.
    pub fn role(&self) -> Role {
        self.role
    }

    /// The client binding, present on well-formed client principals.
    pub fn client_id(&self) -> Option<&ClientId> {
        self.client_id.as_ref()
    }

    /// The correlation id, when one was attached.
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    /// Returns `true` for the portal client role.
    pub fn is_client(&self) -> bool {
        self.role.is_client()
    }

    /// Returns `true` when bound to the reserved system tenant.
    pub fn is_system(&self) -> bool {
        self.tenant_id.is_system()
    }

    /// Returns `true` when the client-binding contract holds.
    ///
    /// A non-client principal is always well formed; a client principal is
    /// well formed only with a non-empty binding. The resolver fails closed
    /// on ill-formed principals rather than erroring.
    pub fn is_well_formed(&self) -> bool {
        match self.role {
            Role::Client => self
                .client_id
                .as_ref()
                .is_some_and(|id| !id.as_str().is_empty()),
            _ => true,
        }
    }

    /// Resolves this principal's scope for one entity kind.
    ///
    /// Shorthand for [`resolve_scope`](crate::resolver::resolve_scope).
    pub fn scope_for(&self, kind: EntityKind) -> ScopeDecision {
        resolve_scope(self, kind)
    }
}

/// Validating builder for [`Principal`].
///
/// # Examples
///
/// ```
/// use vetra_model::Role;
/// use vetra_scope::Principal;
///
/// let owner = Principal::builder("clinic-a", Role::Client)
///     .client_id("cli-7")
///     .correlation_id("req-91f2")
///     .build()
///     .unwrap();
/// assert_eq!(owner.correlation_id(), Some("req-91f2"));
///
/// // A client principal without its binding does not build.
/// assert!(Principal::builder("clinic-a", Role::Client).build().is_err());
/// ```
#[derive(Debug)]
pub struct PrincipalBuilder {
    tenant_id: TenantId,
    role: Role,
    client_id: Option<ClientId>,
    correlation_id: Option<String>,
}

impl PrincipalBuilder {
    /// Sets the client binding.
    pub fn client_id(mut self, client_id: impl Into<ClientId>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Sets the correlation id.
    pub fn correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// Validates the scoping contract and builds the principal.
    pub fn build(self) -> Result<Principal, PrincipalError> {
        if self.tenant_id.as_str().is_empty() {
            return Err(PrincipalError::EmptyTenant);
        }
        if let Some(client_id) = &self.client_id {
            if client_id.as_str().is_empty() {
                return Err(PrincipalError::EmptyClientBinding {
                    tenant_id: self.tenant_id,
                });
            }
        }
        if self.role.is_client() && self.client_id.is_none() {
            return Err(PrincipalError::MissingClientBinding {
                tenant_id: self.tenant_id,
            });
        }
        Ok(Principal {
            tenant_id: self.tenant_id,
            role: self.role,
            client_id: self.client_id,
            correlation_id: self.correlation_id,
        })
    }
}
