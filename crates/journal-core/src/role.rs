//! Roles and read scopes.
//!
//! There are exactly two roles, fixed by server configuration. Each role
//! maps to a [`Scope`] that every read operation must honour.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entry::Entry;

/// One of the two fixed identities a session can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full create/read/update/delete access.
    Admin,
    /// Read access to shared entries only.
    Viewer,
}

impl Role {
    /// All roles, admin first.
    pub const ALL: [Role; 2] = [Role::Admin, Role::Viewer];

    /// The wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Viewer => "viewer",
        }
    }

    /// Whether this role may mutate entries.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "viewer" => Ok(Role::Viewer),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Returned when a string names neither role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role '{}'", self.0)
    }
}

impl std::error::Error for UnknownRole {}

/// Read-time visibility restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Every entry is visible.
    Unrestricted,
    /// Only entries with `is_shared == true` are visible.
    SharedOnly,
}

impl Scope {
    /// Whether an entry is visible under this scope.
    pub fn permits(&self, entry: &Entry) -> bool {
        match self {
            Scope::Unrestricted => true,
            Scope::SharedOnly => entry.is_shared,
        }
    }

    /// Whether this scope hides private entries.
    pub fn is_shared_only(&self) -> bool {
        matches!(self, Scope::SharedOnly)
    }
}
