//! Application state shared across handlers.

use std::sync::Arc;

use crate::clock::Clock;
use crate::config::GlobalConfig;
use crate::persistence::ListStore;

/// Process-scoped state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration.
    pub config: Arc<GlobalConfig>,
    /// Active storage backend.
    pub store: Arc<dyn ListStore>,
    /// Clock used to evaluate derived item state.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Bundle the collaborators handlers need.
    #[must_use]
    pub fn new(config: GlobalConfig, store: Arc<dyn ListStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            config: Arc::new(config),
            store,
            clock,
        }
    }
}
