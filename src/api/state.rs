//! Application State
//!
//! State shared by the handlers of one router. Each router gets its own
//! inventory; nothing here is process-global.

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

use crate::auth::IdentityProvider;
use crate::config::Config;
use crate::inventory::InventoryStore;
use crate::pagination::PaginationLimits;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Products and sales served by this router
    pub inventory: Arc<RwLock<InventoryStore>>,
    /// Verifies bearer tokens
    pub identity: Arc<dyn IdentityProvider>,
    /// Defaults and bounds for listing requests
    pub limits: PaginationLimits,
    /// Serve requests without credentials as the guest user
    pub allow_guest: bool,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: InventoryStore, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            inventory: Arc::new(RwLock::new(store)),
            identity,
            limits: PaginationLimits::default(),
            allow_guest: false,
            start_time: Instant::now(),
        }
    }

    /// Create state with limits and guest access taken from `config`
    pub fn from_config(
        store: InventoryStore,
        identity: Arc<dyn IdentityProvider>,
        config: &Config,
    ) -> Self {
        Self {
            limits: config.pagination.limits(),
            allow_guest: config.auth.allow_guest,
            ..Self::new(store, identity)
        }
    }

    /// Builder method: enable or disable guest access
    pub fn allow_guest(mut self, allow: bool) -> Self {
        self.allow_guest = allow;
        self
    }

    /// Builder method: set listing limits
    pub fn limits(mut self, limits: PaginationLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
