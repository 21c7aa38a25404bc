//! The role taxonomy for resolved principals.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The role a principal acts as.
///
/// Every role except [`Client`](Role::Client) is a staff-class role for
/// scoping purposes: staff see staff-only entity kinds, clients never do.
/// [`SuperAdmin`](Role::SuperAdmin) is the platform-operator role; a global
/// operator session binds it to the reserved system tenant rather than to a
/// null tenant, so its filters stay tenant-conjunctive like everyone else's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    /// Platform operator.
    SuperAdmin,
    /// Clinic administrator.
    Admin,
    /// Veterinarian.
    Vet,
    /// Front-desk staff.
    Receptionist,
    /// Veterinary assistant.
    Assistant,
    /// Pet owner using the portal.
    Client,
}

impl Role {
    /// Returns `true` for the portal client role.
    pub fn is_client(&self) -> bool {
        matches!(self, Role::Client)
    }

    /// Returns `true` for every staff-class role (everything except Client).
    pub fn is_staff(&self) -> bool {
        !self.is_client()
    }

    /// Returns the stable camelCase wire name of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "superAdmin",
            Role::Admin => "admin",
            Role::Vet => "vet",
            Role::Receptionist => "receptionist",
            Role::Assistant => "assistant",
            Role::Client => "client",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "superAdmin" | "super_admin" | "superadmin" => Ok(Role::SuperAdmin),
            "admin" => Ok(Role::Admin),
            "vet" => Ok(Role::Vet),
            "receptionist" => Ok(Role::Receptionist),
            "assistant" => Ok(Role::Assistant),
            "client" => Ok(Role::Client),
            _ => Err(format!("unknown role: {}", s)),
        }
    }
}
