//! 链接注册表
//!
//! 短码到链接记录的权威存储，负责：
//! - 短码唯一性（创建时原子地检查并插入）
//! - 有效期计算与过期判定
//! - 每个链接独立加锁，不同短码之间互不阻塞

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use super::{ClickEvent, LinkRecord};
use crate::errors::{RegistryError, ShortlyError};
use crate::utils::is_code_char;
use crate::utils::url_validator::validate_url;

/// 单个链接的可变状态：记录与点击日志放在同一把锁下
pub(crate) struct SlotState {
    pub(crate) record: LinkRecord,
    pub(crate) clicks: VecDeque<ClickEvent>,
}

/// 注册表中的一个槽位
pub(crate) struct LinkSlot {
    /// 创建序号，用于按创建顺序列出
    seq: u64,
    state: RwLock<SlotState>,
}

impl LinkSlot {
    fn new(seq: u64, record: LinkRecord) -> Self {
        Self {
            seq,
            state: RwLock::new(SlotState {
                record,
                clicks: VecDeque::new(),
            }),
        }
    }

    pub(crate) fn record(&self) -> LinkRecord {
        self.state.read().record.clone()
    }

    /// 追加点击并递增计数，两者在同一个写锁内完成
    ///
    /// `retention_limit` 只裁剪日志头部，计数不受影响。返回新的计数。
    pub(crate) fn append_click(&self, event: ClickEvent, retention_limit: Option<usize>) -> u64 {
        let mut state = self.state.write();
        state.clicks.push_back(event);
        if let Some(limit) = retention_limit {
            while state.clicks.len() > limit {
                state.clicks.pop_front();
            }
        }
        state.record.click_count += 1;
        state.record.click_count
    }

    /// 在同一个读锁内取出记录与点击日志的一致快照
    pub(crate) fn snapshot(&self) -> (LinkRecord, Vec<ClickEvent>) {
        let state = self.state.read();
        (state.record.clone(), state.clicks.iter().cloned().collect())
    }
}

/// 校验原始 URL，返回去掉首尾空白后的 URL
pub fn validate_original_url(original_url: &str) -> Result<String, RegistryError> {
    validate_url(original_url)
        .map(|_| original_url.trim().to_string())
        .map_err(|e| ShortlyError::invalid_url(e.to_string()))
}

/// 校验有效期（分钟），必须为正整数
pub fn validate_validity(validity_minutes: Option<i64>) -> Result<Option<TimeDelta>, RegistryError> {
    match validity_minutes {
        None => Ok(None),
        Some(minutes) if minutes <= 0 => Err(ShortlyError::invalid_validity(format!(
            "Validity must be a positive integer, got {}",
            minutes
        ))),
        Some(minutes) => TimeDelta::try_minutes(minutes).map(Some).ok_or_else(|| {
            ShortlyError::invalid_validity(format!("Validity of {} minutes is out of range", minutes))
        }),
    }
}

/// 链接注册表
#[derive(Default)]
pub struct LinkRegistry {
    links: DashMap<Arc<str>, Arc<LinkSlot>>,
    next_seq: AtomicU64,
}

impl LinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建链接记录，`created_at` 取当前时间
    pub fn create(
        &self,
        original_url: &str,
        code: &str,
        validity_minutes: Option<i64>,
    ) -> Result<LinkRecord, RegistryError> {
        self.create_at(original_url, code, validity_minutes, Utc::now())
    }

    /// 以给定时间作为 `created_at` 创建链接记录
    ///
    /// 这里只检查短码字符集，长度与保留字由 `CodeGenerator` 负责。
    /// 校验失败或短码冲突时不会留下任何记录。
    pub fn create_at(
        &self,
        original_url: &str,
        code: &str,
        validity_minutes: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<LinkRecord, RegistryError> {
        let original_url = validate_original_url(original_url)?;
        let validity = validate_validity(validity_minutes)?;
        if code.is_empty() || !code.chars().all(is_code_char) {
            return Err(ShortlyError::invalid_code(format!(
                "Short code '{}' must be non-empty letters, digits, '-' or '_'",
                code
            )));
        }

        let expires_at = match validity {
            Some(delta) => Some(now.checked_add_signed(delta).ok_or_else(|| {
                ShortlyError::invalid_validity("Expiry time is out of range")
            })?),
            None => None,
        };

        // entry 持有分片写锁，检查与插入是原子的
        match self.links.entry(Arc::from(code)) {
            Entry::Occupied(_) => {
                warn!("LinkRegistry: code '{}' already exists", code);
                Err(ShortlyError::code_conflict(format!(
                    "Short code '{}' is already in use",
                    code
                )))
            }
            Entry::Vacant(vacant) => {
                let record = LinkRecord {
                    code: code.to_string(),
                    original_url,
                    created_at: now,
                    expires_at,
                    click_count: 0,
                };
                let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                vacant.insert(Arc::new(LinkSlot::new(seq, record.clone())));
                info!(
                    "LinkRegistry: created '{}' -> '{}'",
                    record.code, record.original_url
                );
                Ok(record)
            }
        }
    }

    /// 查询链接记录，不论是否过期
    pub fn lookup(&self, code: &str) -> Option<LinkRecord> {
        let record = self.slot(code).map(|slot| slot.record());
        if record.is_none() {
            debug!("LinkRegistry: lookup miss for '{}'", code);
        }
        record
    }

    pub fn contains(&self, code: &str) -> bool {
        self.links.contains_key(code)
    }

    /// `expires_at` 已设置且 `now >= expires_at`
    pub fn is_expired(record: &LinkRecord, now: DateTime<Utc>) -> bool {
        record.is_expired_at(now)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// 按创建顺序返回全部短码
    pub fn codes(&self) -> Vec<String> {
        let mut entries: Vec<(u64, String)> = self
            .links
            .iter()
            .map(|entry| (entry.value().seq, entry.key().to_string()))
            .collect();
        entries.sort_unstable_by_key(|(seq, _)| *seq);
        entries.into_iter().map(|(_, code)| code).collect()
    }

    /// 取出槽位后立即释放分片锁，之后只持有该链接自己的锁
    pub(crate) fn slot(&self, code: &str) -> Option<Arc<LinkSlot>> {
        self.links.get(code).map(|entry| Arc::clone(entry.value()))
    }
}
