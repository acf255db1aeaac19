use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;
use crate::errors::Result;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Defaults are returned until `init_config` or `update_config` runs.
pub fn get_config() -> Arc<StaticConfig> {
    match CONFIG.get() {
        Some(config) => config.load_full(),
        None => Arc::new(StaticConfig::default()),
    }
}

/// Initialize the global configuration from `path` plus environment overrides
///
/// A second call keeps the first configuration and returns it.
pub fn init_config(path: &str) -> Result<Arc<StaticConfig>> {
    if let Some(config) = CONFIG.get() {
        return Ok(config.load_full());
    }
    let loaded = StaticConfig::load(path)?;
    Ok(CONFIG
        .get_or_init(|| ArcSwap::from_pointee(loaded))
        .load_full())
}

/// Replace the global configuration
pub fn update_config(config: StaticConfig) {
    CONFIG
        .get_or_init(|| ArcSwap::from_pointee(StaticConfig::default()))
        .store(Arc::new(config));
}
