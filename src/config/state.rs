// Application state module
// Immutable state shared by all in-flight requests

use std::sync::atomic::AtomicBool;

use super::types::Config;
use crate::registry::HandlerRegistry;
use crate::routing::RouteTable;

/// Application state, assembled once during initialization.
///
/// Published behind an `Arc` only after the registry scan and route table
/// build have completed; no partial state is ever visible to a request, and
/// nothing here is written after startup, so dispatch takes no locks.
pub struct AppState {
    pub config: Config,
    pub registry: HandlerRegistry,
    pub routes: RouteTable,
    /// Cached `logging.access_log` for lock-free reads on the hot path
    pub cached_access_log: AtomicBool,
}

impl AppState {
    pub fn new(config: Config, registry: HandlerRegistry, routes: RouteTable) -> Self {
        let cached_access_log = AtomicBool::new(config.logging.access_log);
        Self {
            config,
            registry,
            routes,
            cached_access_log,
        }
    }
}
