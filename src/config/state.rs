// Application state module
// Everything a request handler needs, built once at startup and shared read-only

use crate::assets::AssetStore;

use super::types::Config;

/// Application state
///
/// Shared across connections behind an `Arc`. Nothing in here is mutated
/// after construction, so requests never contend on it.
pub struct AppState {
    pub config: Config,
    pub assets: AssetStore,
}

impl AppState {
    pub const fn new(config: Config, assets: AssetStore) -> Self {
        Self { config, assets }
    }

    /// Whether access log lines should be written
    pub const fn access_log(&self) -> bool {
        self.config.logging.access_log
    }
}
