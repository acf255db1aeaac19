//! Read-side statistics
//!
//! Composes a link record with its click log. Never mutates anything.

use std::sync::Arc;

use tracing::debug;

use crate::errors::{ShortlyError, StatsError};
use crate::storage::{LinkRegistry, LinkStats};

#[derive(Clone)]
pub struct StatsAggregator {
    registry: Arc<LinkRegistry>,
}

impl StatsAggregator {
    pub fn new(registry: Arc<LinkRegistry>) -> Self {
        Self { registry }
    }

    /// Stats for one link; zero clicks yields an empty sequence
    pub fn get_stats(&self, code: &str) -> Result<LinkStats, StatsError> {
        let slot = self.registry.slot(code).ok_or_else(|| {
            debug!("StatsAggregator: stats requested for unknown code '{}'", code);
            ShortlyError::unknown_code(format!("Short code '{}' not found", code))
        })?;

        let (record, clicks) = slot.snapshot();
        Ok(LinkStats {
            total_clicks: record.click_count,
            record,
            clicks,
        })
    }

    /// Stats for every registered link, oldest first
    pub fn all_stats(&self) -> Vec<LinkStats> {
        self.registry
            .codes()
            .iter()
            .filter_map(|code| self.get_stats(code).ok())
            .collect()
    }
}
