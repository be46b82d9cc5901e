//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::demo::DemoState;
use crate::records::MemoryRecords;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration, the record store, and the demo API's process-wide state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    records: MemoryRecords,
    demo: DemoState,
}

impl AppState {
    /// Create a new application state with empty stores.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                records: MemoryRecords::new(),
                demo: DemoState::new(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the record store.
    #[must_use]
    pub fn records(&self) -> &MemoryRecords {
        &self.inner.records
    }

    /// Get a reference to the demo API state.
    #[must_use]
    pub fn demo(&self) -> &DemoState {
        &self.inner.demo
    }
}
