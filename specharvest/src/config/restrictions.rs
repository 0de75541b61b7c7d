//! Restriction settings applied to every candidate of a crawl.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Which check runs first when a candidate is both known and out of range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestrictionOrder {
    /// Novelty check, then date checks.
    #[default]
    NoveltyFirst,
    /// Date checks, then novelty check.
    DateFirst,
}

/// What to do with candidates whose date could not be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndatedPolicy {
    /// Date checks are skipped; the candidate is still eligible.
    #[default]
    PassThrough,
    /// The candidate is skipped.
    Drop,
}

/// Read-only restriction settings for a whole crawl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestrictionConfig {
    /// Candidates published strictly before this instant end the crawl.
    #[serde(default, deserialize_with = "deserialize_date")]
    pub from_date: Option<DateTime<Utc>>,
    /// Candidates published strictly after this instant are skipped.
    #[serde(default, deserialize_with = "deserialize_date")]
    pub to_date: Option<DateTime<Utc>>,
    /// Maximum number of documents to emit.
    #[serde(default = "default_max_items")]
    pub max_items: Option<usize>,
    /// Stop at the first already-known candidate instead of skipping it.
    #[serde(default)]
    pub to_last_seen: bool,
    /// Order of the novelty and date checks.
    #[serde(default)]
    pub order: RestrictionOrder,
    /// Handling of undated candidates.
    #[serde(default)]
    pub undated: UndatedPolicy,
}

fn default_max_items() -> Option<usize> {
    Some(50)
}

/// Accepts RFC 3339 as well as the looser forms `parse_timestamp` reads
/// ("2025-01-01", "March 2025").
fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(text) => crate::utils::parse_timestamp(&text)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

impl Default for RestrictionConfig {
    fn default() -> Self {
        Self {
            from_date: None,
            to_date: None,
            max_items: default_max_items(),
            to_last_seen: false,
            order: RestrictionOrder::default(),
            undated: UndatedPolicy::default(),
        }
    }
}

impl RestrictionConfig {
    /// Creates restrictions with defaults (50 items, no date bounds).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// No bounds at all; only novelty applies.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            max_items: None,
            ..Self::default()
        }
    }

    /// Sets the date floor.
    #[must_use]
    pub fn with_from_date(mut self, from_date: DateTime<Utc>) -> Self {
        self.from_date = Some(from_date);
        self
    }

    /// Sets the date ceiling.
    #[must_use]
    pub fn with_to_date(mut self, to_date: DateTime<Utc>) -> Self {
        self.to_date = Some(to_date);
        self
    }

    /// Sets the item cap.
    #[must_use]
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = Some(max_items);
        self
    }

    /// Removes the item cap.
    #[must_use]
    pub fn without_max_items(mut self) -> Self {
        self.max_items = None;
        self
    }

    /// Stops at the first known candidate.
    #[must_use]
    pub fn stop_at_last_seen(mut self) -> Self {
        self.to_last_seen = true;
        self
    }

    /// Sets the check order.
    #[must_use]
    pub fn with_order(mut self, order: RestrictionOrder) -> Self {
        self.order = order;
        self
    }

    /// Sets the undated policy.
    #[must_use]
    pub fn with_undated(mut self, undated: UndatedPolicy) -> Self {
        self.undated = undated;
        self
    }

    /// Checks that the bounds are consistent.
    pub fn validate(&self) -> Result<(), String> {
        if let (Some(from), Some(to)) = (self.from_date, self.to_date) {
            if from > to {
                return Err(format!(
                    "from_date {} is after to_date {}",
                    from.to_rfc3339(),
                    to.to_rfc3339()
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_defaults() {
        let config = RestrictionConfig::default();
        assert_eq!(config.max_items, Some(50));
        assert!(config.from_date.is_none());
        assert!(!config.to_last_seen);
        assert_eq!(config.order, RestrictionOrder::NoveltyFirst);
        assert_eq!(config.undated, UndatedPolicy::PassThrough);
        assert_eq!(RestrictionConfig::unbounded().max_items, None);
    }

    #[test]
    fn test_deserialize_loose_dates() {
        let config: RestrictionConfig = serde_json::from_str(
            r#"{"from_date": "2025-01-01", "to_date": "2025-06-30T12:00:00Z", "order": "date_first"}"#,
        )
        .unwrap();
        assert_eq!(
            config.from_date,
            Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            config.to_date,
            Some(Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap())
        );
        assert_eq!(config.order, RestrictionOrder::DateFirst);
        assert_eq!(config.max_items, Some(50));
    }

    #[test]
    fn test_deserialize_null_max_items() {
        let config: RestrictionConfig =
            serde_json::from_str(r#"{"max_items": null, "undated": "drop"}"#).unwrap();
        assert_eq!(config.max_items, None);
        assert_eq!(config.undated, UndatedPolicy::Drop);
    }

    #[test]
    fn test_deserialize_rejects_bad_date() {
        let result: Result<RestrictionConfig, _> =
            serde_json::from_str(r#"{"from_date": "someday"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_bounds() {
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert!(RestrictionConfig::new()
            .with_from_date(early)
            .with_to_date(late)
            .validate()
            .is_ok());
        assert!(RestrictionConfig::new()
            .with_from_date(late)
            .with_to_date(early)
            .validate()
            .is_err());
    }
}
