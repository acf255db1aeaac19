use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 短链接记录
///
/// `code`、`original_url`、`created_at`、`expires_at` 创建后不再改变，
/// 只有 `click_count` 会随点击单调递增。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    /// None 表示永不过期
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub click_count: u64,
}

impl LinkRecord {
    /// `expires_at` 已设置且 `now >= expires_at`
    ///
    /// 过期只是查询时的判定，记录本身仍然可以查询统计。
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// 一次点击事件，按短码归属到对应链接的点击日志
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickEvent {
    pub link_code: String,
    pub timestamp: DateTime<Utc>,
    /// 来源标签（referrer / utm_source / direct）
    pub source: String,
    /// 地理位置标签
    pub location: String,
}

/// 单个链接的统计视图
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStats {
    pub record: LinkRecord,
    /// 按记录顺序排列的点击事件
    pub clicks: Vec<ClickEvent>,
    pub total_clicks: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn record(expires_in: Option<TimeDelta>) -> LinkRecord {
        let created_at = Utc::now();
        LinkRecord {
            code: "abc".to_string(),
            original_url: "https://example.com".to_string(),
            created_at,
            expires_at: expires_in.map(|d| created_at + d),
            click_count: 0,
        }
    }

    #[test]
    fn test_never_expires_without_expiry() {
        let link = record(None);
        assert!(!link.is_expired_at(Utc::now() + TimeDelta::days(3650)));
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let link = record(Some(TimeDelta::minutes(5)));
        let expires_at = link.expires_at.unwrap();
        assert!(!link.is_expired_at(expires_at - TimeDelta::milliseconds(1)));
        assert!(link.is_expired_at(expires_at));
        assert!(link.is_expired_at(expires_at + TimeDelta::seconds(1)));
    }
}
