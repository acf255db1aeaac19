//! Link service
//!
//! The library boundary used by the HTTP layer: batch shortening, click
//! recording, stats and resolution, all over one shared registry.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::{BatchIntake, BatchResult, ShortenRequest};
use crate::analytics::{ClickRecorder, StatsAggregator};
use crate::config::{ClickSettings, LinkSettings, StaticConfig};
use crate::errors::{Result, ShortlyError};
use crate::storage::{LinkRecord, LinkRegistry, LinkStats};

pub struct LinkService {
    registry: Arc<LinkRegistry>,
    intake: BatchIntake,
    recorder: ClickRecorder,
    stats: StatsAggregator,
}

impl LinkService {
    pub fn new(links: &LinkSettings, clicks: &ClickSettings) -> Self {
        Self::with_registry(Arc::new(LinkRegistry::new()), links, clicks)
    }

    /// Build from the full configuration, reserving the API route segment
    pub fn from_config(config: &StaticConfig) -> Self {
        Self::new(&config.link_settings(), &config.clicks)
    }

    /// Build on an existing registry
    pub fn with_registry(
        registry: Arc<LinkRegistry>,
        links: &LinkSettings,
        clicks: &ClickSettings,
    ) -> Self {
        Self {
            intake: BatchIntake::new(Arc::clone(&registry), links),
            recorder: ClickRecorder::new(Arc::clone(&registry), clicks),
            stats: StatsAggregator::new(Arc::clone(&registry)),
            registry,
        }
    }

    pub fn registry(&self) -> &Arc<LinkRegistry> {
        &self.registry
    }

    pub fn max_rows(&self) -> usize {
        self.intake.max_rows()
    }

    pub fn shorten_batch(&self, requests: &[ShortenRequest]) -> Result<BatchResult> {
        self.intake.shorten_batch(requests)
    }

    pub fn shorten_batch_with_limit(
        &self,
        requests: &[ShortenRequest],
        max_rows: usize,
    ) -> Result<BatchResult> {
        self.intake.shorten_batch_with_limit(requests, max_rows)
    }

    pub fn record_click(&self, code: &str, source: &str, location: &str) -> Result<()> {
        self.recorder.record(code, source, location, None)
    }

    pub fn record_click_at(
        &self,
        code: &str,
        source: &str,
        location: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<()> {
        self.recorder.record(code, source, location, Some(timestamp))
    }

    pub fn get_stats(&self, code: &str) -> Result<LinkStats> {
        self.stats.get_stats(code)
    }

    pub fn all_stats(&self) -> Vec<LinkStats> {
        self.stats.all_stats()
    }

    /// Resolve a code for redirection
    ///
    /// Expired links still resolve; use [`LinkService::is_expired`] to decide
    /// how to answer.
    pub fn resolve(&self, code: &str) -> Result<LinkRecord> {
        self.registry
            .lookup(code)
            .ok_or_else(|| ShortlyError::unknown_code(format!("Short code '{}' not found", code)))
    }

    pub fn is_expired(record: &LinkRecord, now: DateTime<Utc>) -> bool {
        LinkRegistry::is_expired(record, now)
    }

    pub fn short_url(&self, code: &str) -> String {
        self.intake.short_url(code)
    }
}
