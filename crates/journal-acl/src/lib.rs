//! Access control layer for the Journal backend.
//!
//! Maps a presented session token and a requested [`Operation`] to either
//! a [`Grant`] (role plus read [`Scope`]) or an authorization error:
//!
//! - no valid session: [`Error::Unauthenticated`]
//! - valid session, insufficient role: [`Error::Forbidden`]
//!
//! Viewers are confined to [`Scope::SharedOnly`] on every read path. That
//! confinement is derived from the role alone and cannot be widened by
//! request parameters.

#![doc = include_str!("../README.md")]

use std::fmt;
use std::sync::Arc;

use journal_auth::AuthGate;
use journal_core::{Error, Result, Role, Scope};

// ============================================================================
// Operations
// ============================================================================

/// An entry operation subject to access control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// List (optionally grouped) entries.
    ListEntries,
    /// List distinct categories.
    ListCategories,
    /// Fetch a single entry by id.
    ReadEntry,
    /// Create an entry.
    CreateEntry,
    /// Update an entry.
    UpdateEntry,
    /// Delete an entry.
    DeleteEntry,
}

impl Operation {
    /// All operations.
    pub const ALL: [Operation; 6] = [
        Operation::ListEntries,
        Operation::ListCategories,
        Operation::ReadEntry,
        Operation::CreateEntry,
        Operation::UpdateEntry,
        Operation::DeleteEntry,
    ];

    /// Whether `role` may perform this operation.
    pub fn allows(self, role: Role) -> bool {
        match self {
            Operation::ListEntries | Operation::ListCategories => true,
            Operation::ReadEntry
            | Operation::CreateEntry
            | Operation::UpdateEntry
            | Operation::DeleteEntry => role.is_admin(),
        }
    }

    /// Short human-readable name.
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::ListEntries => "list entries",
            Operation::ListCategories => "list categories",
            Operation::ReadEntry => "read entry",
            Operation::CreateEntry => "create entry",
            Operation::UpdateEntry => "update entry",
            Operation::DeleteEntry => "delete entry",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of a successful authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grant {
    /// Caller's role.
    pub role: Role,
    /// Visibility the caller's reads are confined to.
    pub scope: Scope,
}

impl Grant {
    /// Grant for `role` with its derived scope.
    pub fn for_role(role: Role) -> Self {
        Self {
            role,
            scope: scope_for(role),
        }
    }
}

/// Read scope for a role.
pub fn scope_for(role: Role) -> Scope {
    match role {
        Role::Admin => Scope::Unrestricted,
        Role::Viewer => Scope::SharedOnly,
    }
}

// ============================================================================
// Policy
// ============================================================================

/// Session-backed access policy.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    gate: Arc<AuthGate>,
}

impl AccessPolicy {
    /// Policy resolving sessions through `gate`.
    pub fn new(gate: Arc<AuthGate>) -> Self {
        Self { gate }
    }

    /// Any valid session.
    pub fn require_role(&self, token: Option<&str>) -> Result<Role> {
        self.gate.resolve_session(token).ok_or(Error::Unauthenticated)
    }

    /// A valid admin session.
    pub fn require_admin(&self, token: Option<&str>) -> Result<Role> {
        let role = self.require_role(token)?;
        if role.is_admin() {
            Ok(role)
        } else {
            Err(Error::forbidden("Admin access required"))
        }
    }

    /// Authorize `op` for the session carried by `token`.
    pub fn authorize(&self, token: Option<&str>, op: Operation) -> Result<Grant> {
        let role = self.require_role(token)?;
        if !op.allows(role) {
            log::debug!("Denied {op} for role {role}");
            return Err(Error::forbidden("Admin access required"));
        }
        Ok(Grant::for_role(role))
    }
}
