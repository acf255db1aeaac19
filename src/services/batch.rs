//! Batch intake
//!
//! Accepts a bounded batch of shorten requests. Every row is validated and
//! created on its own: a failing row is reported with its 1-based row number
//! and never stops the rows after it.

use std::sync::Arc;

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::CodeGenerator;
use crate::config::LinkSettings;
use crate::errors::{Result, ShortlyError};
use crate::storage::{LinkRecord, LinkRegistry, validate_original_url, validate_validity};

/// Validity as submitted by the caller
///
/// Forms send numbers or strings. Anything that is not a whole number of
/// minutes fails only its own row with `InvalidValidity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValidityInput {
    Minutes(i64),
    Fractional(f64),
    Text(String),
    #[serde(skip_serializing)]
    Unsupported(IgnoredAny),
}

impl ValidityInput {
    /// Whole minutes, sign unchecked; `validate_validity` rejects values <= 0
    pub fn minutes(&self) -> Result<i64> {
        match self {
            ValidityInput::Minutes(minutes) => Ok(*minutes),
            ValidityInput::Fractional(value)
                if value.fract() == 0.0 && *value >= i64::MIN as f64 && *value < i64::MAX as f64 =>
            {
                Ok(*value as i64)
            }
            ValidityInput::Fractional(value) => Err(not_whole_minutes(value)),
            ValidityInput::Text(text) => text
                .trim()
                .parse::<i64>()
                .map_err(|_| not_whole_minutes(text)),
            ValidityInput::Unsupported(_) => Err(not_whole_minutes("a non-numeric value")),
        }
    }
}

fn not_whole_minutes(value: impl std::fmt::Display) -> ShortlyError {
    ShortlyError::invalid_validity(format!(
        "Validity must be a positive integer number of minutes, got {}",
        value
    ))
}

/// One row of a batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShortenRequest {
    pub url: String,
    #[serde(default)]
    pub validity_minutes: Option<ValidityInput>,
    /// Blank values count as absent
    #[serde(default)]
    pub preferred_code: Option<String>,
}

impl ShortenRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_validity(mut self, minutes: i64) -> Self {
        self.validity_minutes = Some(ValidityInput::Minutes(minutes));
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.preferred_code = Some(code.into());
        self
    }

    fn parsed_validity(&self) -> Result<Option<i64>> {
        self.validity_minutes
            .as_ref()
            .map(ValidityInput::minutes)
            .transpose()
    }

    fn preferred_code(&self) -> Option<&str> {
        self.preferred_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// A created link together with its displayable short URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedLink {
    #[serde(flatten)]
    pub record: LinkRecord,
    pub short_url: String,
}

/// A failed row, numbered from 1 in submission order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub row: usize,
    pub error: ShortlyError,
}

impl RowError {
    pub fn message(&self) -> String {
        format!("Row {}: {}", self.row, self.error.format_simple())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    pub successes: Vec<CreatedLink>,
    pub errors: Vec<RowError>,
}

/// `<base_url>/<code>` with exactly one slash in between
pub fn compose_short_url(base_url: &str, code: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), code)
}

pub struct BatchIntake {
    registry: Arc<LinkRegistry>,
    generator: CodeGenerator,
    base_url: String,
    max_rows: usize,
}

impl BatchIntake {
    pub fn new(registry: Arc<LinkRegistry>, settings: &LinkSettings) -> Self {
        Self {
            registry,
            generator: CodeGenerator::new(settings),
            base_url: settings.base_url.clone(),
            max_rows: settings.max_batch_rows,
        }
    }

    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    pub fn short_url(&self, code: &str) -> String {
        compose_short_url(&self.base_url, code)
    }

    /// Shorten with the configured row limit
    pub fn shorten_batch(&self, requests: &[ShortenRequest]) -> Result<BatchResult> {
        self.shorten_batch_with_limit(requests, self.max_rows)
    }

    /// Shorten up to `max_rows` requests
    ///
    /// Exceeding the limit is the only failure that rejects the whole call;
    /// it is checked before any row is touched. Rows with a blank URL are
    /// skipped and produce neither a success nor an error.
    pub fn shorten_batch_with_limit(
        &self,
        requests: &[ShortenRequest],
        max_rows: usize,
    ) -> Result<BatchResult> {
        if requests.len() > max_rows {
            return Err(ShortlyError::too_many_rows(format!(
                "Batch has {} rows, at most {} allowed",
                requests.len(),
                max_rows
            )));
        }

        let mut result = BatchResult::default();
        for (idx, request) in requests.iter().enumerate() {
            if request.url.trim().is_empty() {
                debug!("BatchIntake: row {} is empty, skipped", idx + 1);
                continue;
            }

            match self.shorten_row(request) {
                Ok(record) => {
                    let short_url = self.short_url(&record.code);
                    result.successes.push(CreatedLink { record, short_url });
                }
                Err(error) => {
                    debug!("BatchIntake: row {} failed: {}", idx + 1, error);
                    result.errors.push(RowError {
                        row: idx + 1,
                        error,
                    });
                }
            }
        }

        info!(
            "BatchIntake: created {} links, {} rows failed",
            result.successes.len(),
            result.errors.len()
        );
        Ok(result)
    }

    fn shorten_row(&self, request: &ShortenRequest) -> Result<LinkRecord> {
        // 先校验输入，再生成短码
        validate_original_url(&request.url)?;
        let validity_minutes = request.parsed_validity()?;
        validate_validity(validity_minutes)?;

        let code = self
            .generator
            .generate(&self.registry, request.preferred_code())?;
        self.registry
            .create(&request.url, &code, validity_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intake() -> (Arc<LinkRegistry>, BatchIntake) {
        let registry = Arc::new(LinkRegistry::new());
        let intake = BatchIntake::new(Arc::clone(&registry), &LinkSettings::default());
        (registry, intake)
    }

    #[test]
    fn test_compose_short_url() {
        assert_eq!(
            compose_short_url("https://short.ly", "abc"),
            "https://short.ly/abc"
        );
        assert_eq!(
            compose_short_url("https://short.ly/", "abc"),
            "https://short.ly/abc"
        );
    }

    #[test]
    fn test_mixed_batch_keeps_row_order() {
        let (registry, intake) = intake();
        let requests = vec![
            ShortenRequest::new("https://one.example"),
            ShortenRequest::new("not a url").with_code("badrow"),
            ShortenRequest::new("https://two.example").with_code("two"),
            ShortenRequest::new("https://three.example").with_validity(10),
        ];

        let result = intake.shorten_batch(&requests).unwrap();

        let urls: Vec<_> = result
            .successes
            .iter()
            .map(|s| s.record.original_url.as_str())
            .collect();
        assert_eq!(
            urls,
            vec![
                "https://one.example",
                "https://two.example",
                "https://three.example"
            ]
        );
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].row, 2);
        assert!(matches!(result.errors[0].error, ShortlyError::InvalidUrl(_)));
        assert!(result.errors[0].message().starts_with("Row 2: "));
        assert!(!registry.contains("badrow"));
        assert_eq!(registry.len(), 3);
        assert_eq!(result.successes[1].short_url, "https://short.ly/two");
    }

    #[test]
    fn test_too_many_rows_creates_nothing() {
        let (registry, intake) = intake();
        let requests: Vec<_> = (0..6)
            .map(|i| ShortenRequest::new(format!("https://example.com/{}", i)))
            .collect();

        assert!(matches!(
            intake.shorten_batch(&requests),
            Err(ShortlyError::TooManyRows(_))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_blank_rows_skipped_but_counted_for_limit_and_numbering() {
        let (_, intake) = intake();
        let requests = vec![
            ShortenRequest::new("   "),
            ShortenRequest::new(""),
            ShortenRequest::new("https://example.com").with_validity(0),
        ];

        let result = intake.shorten_batch(&requests).unwrap();
        assert!(result.successes.is_empty());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].row, 3);
        assert!(matches!(
            result.errors[0].error,
            ShortlyError::InvalidValidity(_)
        ));
    }

    #[test]
    fn test_blank_preferred_code_means_random() {
        let (_, intake) = intake();
        let requests = vec![ShortenRequest::new("https://example.com").with_code("  ")];

        let result = intake.shorten_batch(&requests).unwrap();
        assert_eq!(result.successes.len(), 1);
        assert_eq!(result.successes[0].record.code.len(), 6);
    }

    #[test]
    fn test_duplicate_preferred_code_within_batch() {
        let (registry, intake) = intake();
        let requests = vec![
            ShortenRequest::new("https://a.example").with_code("same"),
            ShortenRequest::new("https://b.example").with_code("same"),
        ];

        let result = intake.shorten_batch(&requests).unwrap();
        assert_eq!(result.successes.len(), 1);
        assert_eq!(result.errors[0].row, 2);
        assert!(matches!(result.errors[0].error, ShortlyError::CodeConflict(_)));
        assert_eq!(
            registry.lookup("same").unwrap().original_url,
            "https://a.example"
        );
    }

    #[test]
    fn test_url_error_reported_before_code_error() {
        let (_, intake) = intake();
        let requests = vec![ShortenRequest::new("nope").with_code("x")];

        let result = intake.shorten_batch(&requests).unwrap();
        assert!(matches!(result.errors[0].error, ShortlyError::InvalidUrl(_)));
    }

    #[test]
    fn test_validity_input_conversion() {
        assert_eq!(ValidityInput::Minutes(15).minutes().unwrap(), 15);
        assert_eq!(ValidityInput::Fractional(30.0).minutes().unwrap(), 30);
        assert_eq!(ValidityInput::Text(" 10 ".to_string()).minutes().unwrap(), 10);

        for bad in [
            ValidityInput::Fractional(1.5),
            ValidityInput::Fractional(1e300),
            ValidityInput::Text("ten".to_string()),
            ValidityInput::Text("2.5".to_string()),
            ValidityInput::Unsupported(IgnoredAny),
        ] {
            assert!(
                matches!(bad.minutes(), Err(ShortlyError::InvalidValidity(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_non_integer_validity_fails_only_its_row() {
        let (registry, intake) = intake();
        let requests = vec![
            ShortenRequest::new("https://good.example").with_code("good"),
            ShortenRequest {
                validity_minutes: Some(ValidityInput::Fractional(1.5)),
                ..ShortenRequest::new("https://bad.example")
            },
            ShortenRequest {
                validity_minutes: Some(ValidityInput::Text("20".to_string())),
                ..ShortenRequest::new("https://text.example")
            },
        ];

        let result = intake.shorten_batch(&requests).unwrap();
        assert_eq!(result.successes.len(), 2);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].row, 2);
        assert!(matches!(
            result.errors[0].error,
            ShortlyError::InvalidValidity(_)
        ));
        assert!(registry.contains("good"));
        let text_row = &result.successes[1].record;
        assert_eq!(
            text_row.expires_at,
            Some(text_row.created_at + chrono::TimeDelta::minutes(20))
        );
    }

    #[test]
    fn test_custom_limit() {
        let (_, intake) = intake();
        let requests = vec![
            ShortenRequest::new("https://a.example"),
            ShortenRequest::new("https://b.example"),
        ];
        assert!(intake.shorten_batch_with_limit(&requests, 1).is_err());
        assert_eq!(
            intake
                .shorten_batch_with_limit(&requests, 2)
                .unwrap()
                .successes
                .len(),
            2
        );
    }
}
