//! Shared handler state.

use std::sync::Arc;

use journal_acl::AccessPolicy;
use journal_auth::AuthGate;
use journal_core::AuthConfig;
use journal_query::EntryService;
use journal_storage::EntryStore;

/// Everything a request handler needs. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Password and session checks.
    pub gate: Arc<AuthGate>,
    /// Operation authorization.
    pub policy: AccessPolicy,
    /// Entry operations.
    pub entries: EntryService,
}

impl AppState {
    /// Wire the auth gate, policy, and entry service over `store`.
    pub fn new(auth: &AuthConfig, store: Arc<dyn EntryStore>) -> Self {
        let gate = Arc::new(AuthGate::new(auth));
        Self {
            policy: AccessPolicy::new(Arc::clone(&gate)),
            gate,
            entries: EntryService::new(store),
        }
    }
}
