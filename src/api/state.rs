//! Application state shared across request handlers.

use std::sync::Arc;

use crate::config::PolicyConfig;
use crate::store::CoreStore;

/// Shared application state.
///
/// Holds the store and the policy configuration loaded once at startup.
/// Handlers receive both by reference; nothing reads ambient process state
/// at call time.
#[derive(Clone)]
pub struct AppState {
    store: Arc<CoreStore>,
    policy: Arc<PolicyConfig>,
}

impl AppState {
    /// Creates a new application state from a store and a loaded policy.
    pub fn new(store: CoreStore, policy: PolicyConfig) -> Self {
        Self {
            store: Arc::new(store),
            policy: Arc::new(policy),
        }
    }

    /// Returns a reference to the store.
    pub fn store(&self) -> &CoreStore {
        &self.store
    }

    /// Returns a reference to the policy configuration.
    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        // Required for axum state.
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }
}
