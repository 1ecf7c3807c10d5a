//! Exchange rate abstractions and core types

use crate::core::error::Result;
use async_trait::async_trait;
use chrono::{Days, NaiveDate, Utc};
use std::collections::HashMap;

/// Days covered by the trend series unless configured otherwise.
pub const DEFAULT_HISTORY_DAYS: u32 = 7;

/// Longest trend window accepted from the command line or config.
pub const MAX_HISTORY_DAYS: u32 = 3650;

/// Point-in-time rates quoted against one base currency.
#[derive(Debug, Clone, PartialEq)]
pub struct RateSnapshot {
    pub base: String,
    pub as_of: NaiveDate,
    pub rates: HashMap<String, f64>,
}

impl RateSnapshot {
    /// Rate for `code`, treating zero or negative quotes as missing.
    pub fn positive_rate(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied().filter(|rate| *rate > 0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPoint {
    pub date: String,
    pub rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardPairRate {
    pub from: String,
    pub to: String,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRate {
    pub code: String,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub rate: f64,
    pub value: f64,
}

impl ConversionResult {
    pub fn new(amount: f64, from: &str, to: &str, rate: f64) -> Self {
        ConversionResult {
            amount,
            from: from.to_string(),
            to: to.to_string(),
            rate,
            value: amount * rate,
        }
    }
}

/// Inclusive `[today - days, today]` window in UTC calendar days.
///
/// The start saturates at the earliest representable date.
pub fn history_window(today: NaiveDate, days: u32) -> (NaiveDate, NaiveDate) {
    let start = today
        .checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN);
    (start, today)
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn latest_rates(&self, base: &str) -> Result<RateSnapshot>;

    async fn historical_range(
        &self,
        from: &str,
        to: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<HistoryPoint>>;

    /// Trend series ending today, computed from the wall clock.
    async fn historical_trends(
        &self,
        from: &str,
        to: &str,
        window_days: u32,
    ) -> Result<Vec<HistoryPoint>> {
        let (start, end) = history_window(Utc::now().date_naive(), window_days);
        self.historical_range(from, to, start, end).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_window_spans_calendar_days() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let (start, end) = history_window(today, 7);
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 2, 24).unwrap());
        assert_eq!(end, today);
    }

    #[test]
    fn test_history_window_saturates_on_huge_day_counts() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let (start, end) = history_window(today, 100_000_000);
        assert_eq!(start, NaiveDate::MIN);
        assert_eq!(end, today);

        let (start, _) = history_window(today, u32::MAX);
        assert_eq!(start, NaiveDate::MIN);
    }

    #[test]
    fn test_positive_rate_ignores_zero_quotes() {
        let snapshot = RateSnapshot {
            base: "USD".to_string(),
            as_of: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            rates: HashMap::from([("EUR".to_string(), 0.9), ("XYZ".to_string(), 0.0)]),
        };
        assert_eq!(snapshot.positive_rate("EUR"), Some(0.9));
        assert_eq!(snapshot.positive_rate("XYZ"), None);
        assert_eq!(snapshot.positive_rate("GBP"), None);
    }

    #[test]
    fn test_conversion_value() {
        let result = ConversionResult::new(250.0, "USD", "EUR", 0.9);
        assert!((result.value - 225.0).abs() < 1e-9);
        assert_eq!(result.from, "USD");
        assert_eq!(result.to, "EUR");
    }
}
