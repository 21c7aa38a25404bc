//! Opaque identifier newtypes.
//!
//! Tenant, client, and record identifiers are opaque strings minted by the
//! platform's provisioning layer. Wrapping them keeps the three id spaces
//! from being confused for one another at compile time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The reserved tenant identifier for platform-operator sessions.
///
/// A global operator principal is bound to this tenant rather than carrying
/// no tenant at all; every filter stays tenant-conjunctive and nothing can
/// accidentally match all rows.
pub const SYSTEM_TENANT: &str = "__system__";

/// An opaque tenant (clinic account) identifier.
///
/// # Examples
///
/// ```
/// use vetra_model::TenantId;
///
/// let tenant = TenantId::new("clinic-a");
/// assert_eq!(tenant.as_str(), "clinic-a");
/// assert!(!tenant.is_system());
/// assert!(TenantId::system().is_system());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    /// Creates a tenant id from the given string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the reserved system tenant id.
    pub fn system() -> Self {
        Self(SYSTEM_TENANT.to_string())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if this is the reserved system tenant.
    pub fn is_system(&self) -> bool {
        self.0 == SYSTEM_TENANT
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TenantId({})", self.0)
    }
}

impl FromStr for TenantId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TenantId::new(s))
    }
}

impl From<&str> for TenantId {
    fn from(s: &str) -> Self {
        TenantId::new(s)
    }
}

impl From<String> for TenantId {
    fn from(s: String) -> Self {
        TenantId::new(s)
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An opaque client (pet owner) identifier.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    /// Creates a client id from the given string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClientId({})", self.0)
    }
}

impl From<&str> for ClientId {
    fn from(s: &str) -> Self {
        ClientId::new(s)
    }
}

impl From<String> for ClientId {
    fn from(s: String) -> Self {
        ClientId::new(s)
    }
}

impl AsRef<str> for ClientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An opaque stored-row identifier, unique within one tenant and kind.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Creates a record id from the given string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::new(s)
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId::new(s)
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_id_creation() {
        let tenant = TenantId::new("clinic-a");
        assert_eq!(tenant.as_str(), "clinic-a");
        assert_eq!(format!("{:?}", tenant), "TenantId(clinic-a)");
    }

    #[test]
    fn test_system_tenant() {
        let system = TenantId::system();
        assert!(system.is_system());
        assert_eq!(system.as_str(), SYSTEM_TENANT);
        assert!(!TenantId::new("clinic-a").is_system());
    }

    #[test]
    fn test_serde_is_transparent() {
        let tenant = TenantId::new("clinic-a");
        assert_eq!(serde_json::to_string(&tenant).unwrap(), "\"clinic-a\"");
        let parsed: TenantId = serde_json::from_str("\"clinic-a\"").unwrap();
        assert_eq!(parsed, tenant);
    }

    #[test]
    fn test_from_conversions() {
        let a: ClientId = "cli-1".into();
        let b: ClientId = String::from("cli-1").into();
        assert_eq!(a, b);

        let r: RecordId = "rec-1".into();
        assert_eq!(r.as_str(), "rec-1");
    }

    #[test]
    fn test_ids_are_distinct_types() {
        // Same text, different id spaces; equality only exists per type.
        let tenant = TenantId::new("x");
        let client = ClientId::new("x");
        assert_eq!(tenant.as_str(), client.as_str());
    }
}
