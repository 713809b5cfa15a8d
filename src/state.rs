use std::sync::Arc;

use tokio::sync::Mutex;

use crate::admin::auth::Authenticator;
use crate::guard::{LockoutPolicy, LoginAttemptGuard, SystemClock, TracingReporter};
use crate::storage::SharedStore;

pub struct AppState {
    pub guard_store: SharedStore,
    pub guard_policy: LockoutPolicy,
    /// Held across every guard read-modify-write so concurrent submits
    /// cannot lose an increment.
    pub guard_serial: Mutex<()>,
    pub authenticator: Arc<dyn Authenticator>,
    pub allow_reset: bool,
}

/// Scope shared by every username that is not a known account, so junk
/// names cannot add entries to the store.
pub const UNKNOWN_ACCOUNT_SCOPE: &str = "*unknown*";

impl AppState {
    pub fn login_guard(&self, username: &str) -> LoginAttemptGuard<SharedStore> {
        let scope = if self.authenticator.is_known_account(username) {
            account_scope(username)
        } else {
            UNKNOWN_ACCOUNT_SCOPE.to_string()
        };
        LoginAttemptGuard::new(
            &scope,
            self.guard_policy.clone(),
            self.guard_store.clone(),
            SystemClock,
            TracingReporter,
        )
    }
}

/// Guard scope for a login identifier: trimmed and case-folded.
pub fn account_scope(username: &str) -> String {
    username.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_scope_normalizes() {
        assert_eq!(account_scope("  Admin@Church.org "), "admin@church.org");
    }
}
