//! 点击记录器
//!
//! 把点击事件追加到对应链接的日志，并在同一把锁内递增 click_count，
//! 并发读者永远看不到计数与日志不一致的状态。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::config::ClickSettings;
use crate::errors::{RecorderError, ShortlyError};
use crate::storage::{ClickEvent, LinkRegistry};

#[derive(Clone)]
pub struct ClickRecorder {
    registry: Arc<LinkRegistry>,
    /// 每个链接保留的最近点击数
    retention_limit: Option<usize>,
}

impl ClickRecorder {
    pub fn new(registry: Arc<LinkRegistry>, settings: &ClickSettings) -> Self {
        Self {
            registry,
            retention_limit: settings.retention_limit,
        }
    }

    /// 记录一次点击，`timestamp` 缺省时取当前时间
    pub fn record(
        &self,
        code: &str,
        source: &str,
        location: &str,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<(), RecorderError> {
        let slot = self.registry.slot(code).ok_or_else(|| {
            debug!("ClickRecorder: click on unknown code '{}'", code);
            ShortlyError::unknown_code(format!("Short code '{}' not found", code))
        })?;

        let event = ClickEvent {
            link_code: code.to_string(),
            timestamp: timestamp.unwrap_or_else(Utc::now),
            source: source.to_string(),
            location: location.to_string(),
        };

        let count = slot.append_click(event, self.retention_limit);
        trace!(
            "ClickRecorder: '{}' clicked from {} ({}), total {}",
            code, source, location, count
        );
        Ok(())
    }
}
