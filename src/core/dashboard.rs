//! Market overview built from the dashboard base snapshots

use crate::core::catalog::{CurrencyPair, DASHBOARD_BASES, DASHBOARD_PAIRS};
use crate::core::error::Result;
use crate::core::rates::{DashboardPairRate, RateProvider, RateSnapshot};
use futures::future::try_join3;
use tracing::{debug, error};

/// Reads each pair's rate from the snapshot whose base matches the pair's `from`.
pub fn project_pairs(pairs: &[CurrencyPair], snapshots: &[RateSnapshot]) -> Vec<DashboardPairRate> {
    pairs
        .iter()
        .map(|pair| {
            let rate = snapshots
                .iter()
                .find(|s| s.base == pair.from)
                .and_then(|s| s.rates.get(pair.to).copied())
                .unwrap_or(0.0);
            DashboardPairRate {
                from: pair.from.to_string(),
                to: pair.to.to_string(),
                rate,
            }
        })
        .collect()
}

/// Fetches every dashboard base at once; one failure fails the lot.
pub async fn fetch_dashboard(provider: &dyn RateProvider) -> Result<Vec<DashboardPairRate>> {
    let [first, second, third] = DASHBOARD_BASES;
    let (a, b, c) = try_join3(
        provider.latest_rates(first),
        provider.latest_rates(second),
        provider.latest_rates(third),
    )
    .await?;
    Ok(project_pairs(DASHBOARD_PAIRS, &[a, b, c]))
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub loading: bool,
    pub rates: Vec<DashboardPairRate>,
}

impl Default for DashboardState {
    fn default() -> Self {
        DashboardState {
            loading: true,
            rates: Vec::new(),
        }
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Best-effort refresh: failures are logged and the previous rates stay in place.
    pub async fn load(&mut self, provider: &dyn RateProvider) {
        self.loading = true;
        let result = fetch_dashboard(provider).await;
        self.finish(result);
    }

    /// Applies a finished aggregation and clears the loading flag either way.
    pub fn finish(&mut self, result: Result<Vec<DashboardPairRate>>) {
        match result {
            Ok(rates) => {
                debug!(pairs = rates.len(), "Dashboard rates loaded");
                self.rates = rates;
            }
            Err(e) => error!(error = %e, "Dashboard fetch failed"),
        }
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::converter::tests::MockRateProvider;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::sync::atomic::Ordering;

    fn snapshot(base: &str, rates: &[(&str, f64)]) -> RateSnapshot {
        RateSnapshot {
            base: base.to_string(),
            as_of: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            rates: rates
                .iter()
                .map(|(c, r)| (c.to_string(), *r))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn test_project_pairs_in_input_order() {
        let pairs = [
            CurrencyPair { from: "USD", to: "EUR" },
            CurrencyPair { from: "EUR", to: "GBP" },
            CurrencyPair { from: "GBP", to: "USD" },
            CurrencyPair { from: "USD", to: "JPY" },
        ];
        let snapshots = [
            snapshot("USD", &[("EUR", 0.9)]),
            snapshot("EUR", &[("GBP", 0.85)]),
            snapshot("GBP", &[("USD", 1.3)]),
        ];

        let rates = project_pairs(&pairs, &snapshots);
        let flat: Vec<_> = rates
            .iter()
            .map(|r| (r.from.as_str(), r.to.as_str(), r.rate))
            .collect();
        assert_eq!(
            flat,
            vec![
                ("USD", "EUR", 0.9),
                ("EUR", "GBP", 0.85),
                ("GBP", "USD", 1.3),
                ("USD", "JPY", 0.0),
            ]
        );
    }

    #[test]
    fn test_project_pairs_unknown_base_defaults_to_zero() {
        let pairs = [CurrencyPair { from: "JPY", to: "USD" }];
        let rates = project_pairs(&pairs, &[snapshot("USD", &[("JPY", 150.0)])]);
        assert_eq!(rates[0].rate, 0.0);
    }

    #[tokio::test]
    async fn test_load_fills_all_dashboard_pairs() {
        let provider = MockRateProvider::default()
            .with_snapshot("USD", &[("EUR", 0.9), ("GBP", 0.8)])
            .with_snapshot("EUR", &[("USD", 1.1), ("GBP", 0.85)])
            .with_snapshot("GBP", &[("USD", 1.3)]);

        let mut state = DashboardState::new();
        assert!(state.loading);
        state.load(&provider).await;

        assert!(!state.loading);
        assert_eq!(state.rates.len(), DASHBOARD_PAIRS.len());
        assert_eq!(state.rates[0].rate, 0.9);
        assert_eq!(state.rates[4].rate, 1.1);
        assert_eq!(state.rates[5].rate, 1.3);
        assert_eq!(state.rates[10].rate, 0.85);
        assert_eq!(provider.latest_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_single_failure_yields_no_partial_rates() {
        let mut provider = MockRateProvider::default()
            .with_snapshot("USD", &[("EUR", 0.9)])
            .with_snapshot("GBP", &[("USD", 1.3)]);
        provider.fail_latest.push("EUR".to_string());

        let mut state = DashboardState::new();
        state.load(&provider).await;

        assert!(!state.loading);
        assert!(state.rates.is_empty());
        assert!(fetch_dashboard(&provider).await.is_err());
    }

    #[test]
    fn test_failed_refresh_keeps_previous_rates() {
        let mut state = DashboardState::new();
        state.finish(Ok(project_pairs(
            DASHBOARD_PAIRS,
            &[snapshot("USD", &[("EUR", 0.9)])],
        )));
        state.loading = true;
        state.finish(Err(crate::core::error::FxError::network(
            "latest rates",
            "timed out",
        )));

        assert!(!state.loading);
        assert_eq!(state.rates.len(), DASHBOARD_PAIRS.len());
        assert_eq!(state.rates[0].rate, 0.9);
    }
}
