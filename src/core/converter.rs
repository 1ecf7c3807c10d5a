//! Conversion state and the fetch cycle that refreshes it

use crate::core::catalog::COMPARISON_TARGETS;
use crate::core::error::{FxError, Result};
use crate::core::rates::{
    ComparisonRate, ConversionResult, DEFAULT_HISTORY_DAYS, HistoryPoint, RateProvider,
    RateSnapshot,
};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartView {
    #[default]
    Comparison,
    Trend,
}

impl Display for ChartView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ChartView::Comparison => "comparison",
                ChartView::Trend => "trend",
            }
        )
    }
}

impl FromStr for ChartView {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "comparison" | "compare" => Ok(ChartView::Comparison),
            "trend" | "history" => Ok(ChartView::Trend),
            _ => Err(anyhow::anyhow!("Invalid chart view: {}", s)),
        }
    }
}

impl ChartView {
    pub fn toggled(self) -> Self {
        match self {
            ChartView::Comparison => ChartView::Trend,
            ChartView::Trend => ChartView::Comparison,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConverterState {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub rate: Option<f64>,
    pub history: Vec<HistoryPoint>,
    pub loading: bool,
    pub error: Option<String>,
    pub comparison: Vec<ComparisonRate>,
    pub view: ChartView,
}

/// One fetch cycle, tagged with the token issued when it started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRequest {
    pub token: u64,
    pub from: String,
    pub to: String,
    pub history_days: u32,
}

/// Whatever a cycle managed to produce before it finished or failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncOutcome {
    pub rate: Option<f64>,
    pub comparison: Option<Vec<ComparisonRate>>,
    pub history: Option<Vec<HistoryPoint>>,
    pub error: Option<FxError>,
}

/// Same-currency pairs are always 1, otherwise the quote must be present and positive.
pub fn resolve_rate(snapshot: &RateSnapshot, from: &str, to: &str) -> Result<f64> {
    if from == to {
        return Ok(1.0);
    }
    snapshot
        .positive_rate(to)
        .ok_or_else(|| FxError::RateNotFound {
            from: from.to_string(),
            to: to.to_string(),
        })
}

pub fn comparison_rates(snapshot: &RateSnapshot, from: &str) -> Vec<ComparisonRate> {
    COMPARISON_TARGETS
        .iter()
        .filter(|code| **code != from)
        .filter_map(|code| {
            snapshot.positive_rate(code).map(|rate| ComparisonRate {
                code: code.to_string(),
                rate,
            })
        })
        .collect()
}

/// Runs the latest-rates then trend fetch for `request`.
#[instrument(name = "ConversionSync", skip(provider), fields(token = request.token))]
pub async fn run_sync(provider: &dyn RateProvider, request: &SyncRequest) -> SyncOutcome {
    let mut outcome = SyncOutcome::default();
    if let Err(e) = fetch_into(provider, request, &mut outcome).await {
        debug!(error = %e, "Conversion sync failed");
        outcome.error = Some(e);
    }
    outcome
}

async fn fetch_into(
    provider: &dyn RateProvider,
    request: &SyncRequest,
    outcome: &mut SyncOutcome,
) -> Result<()> {
    let snapshot = provider.latest_rates(&request.from).await?;
    outcome.rate = Some(resolve_rate(&snapshot, &request.from, &request.to)?);
    outcome.comparison = Some(comparison_rates(&snapshot, &request.from));
    outcome.history = Some(
        provider
            .historical_trends(&request.from, &request.to, request.history_days)
            .await?,
    );
    Ok(())
}

pub struct ConversionController {
    state: ConverterState,
    history_days: u32,
    latest_token: u64,
}

impl ConversionController {
    pub fn new(amount: f64, from: &str, to: &str) -> Self {
        ConversionController {
            state: ConverterState {
                amount,
                from: from.to_uppercase(),
                to: to.to_uppercase(),
                rate: None,
                history: Vec::new(),
                loading: true,
                error: None,
                comparison: Vec::new(),
                view: ChartView::default(),
            },
            history_days: DEFAULT_HISTORY_DAYS,
            latest_token: 0,
        }
    }

    pub fn with_view(mut self, view: ChartView) -> Self {
        self.state.view = view;
        self
    }

    pub fn with_history_days(mut self, days: u32) -> Self {
        self.history_days = days;
        self
    }

    pub fn state(&self) -> &ConverterState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    pub fn rate(&self) -> Option<f64> {
        self.state.rate
    }

    pub fn history(&self) -> &[HistoryPoint] {
        &self.state.history
    }

    pub fn comparison(&self) -> &[ComparisonRate] {
        &self.state.comparison
    }

    pub fn view(&self) -> ChartView {
        self.state.view
    }

    pub fn conversion(&self) -> Option<ConversionResult> {
        self.state
            .rate
            .map(|rate| ConversionResult::new(self.state.amount, &self.state.from, &self.state.to, rate))
    }

    /// Converted amount, or zero while no rate is known.
    pub fn display_value(&self) -> f64 {
        self.conversion().map_or(0.0, |c| c.value)
    }

    /// Updates the amount locally; never requires a refetch.
    pub fn set_amount(&mut self, amount: f64) {
        self.state.amount = amount;
    }

    /// Returns true when the selection changed and rates must be refetched.
    pub fn set_from(&mut self, code: &str) -> bool {
        let code = code.to_uppercase();
        if self.state.from == code {
            return false;
        }
        debug!(from = %code, "Base currency changed");
        self.state.from = code;
        true
    }

    pub fn set_to(&mut self, code: &str) -> bool {
        let code = code.to_uppercase();
        if self.state.to == code {
            return false;
        }
        debug!(to = %code, "Quote currency changed");
        self.state.to = code;
        true
    }

    /// Exchanges base and quote; the caller refetches like any other selection change.
    pub fn swap(&mut self) -> bool {
        std::mem::swap(&mut self.state.from, &mut self.state.to);
        debug!(from = %self.state.from, to = %self.state.to, "Swapped currencies");
        self.state.from != self.state.to
    }

    pub fn set_view(&mut self, view: ChartView) {
        self.state.view = view;
    }

    pub fn toggle_view(&mut self) -> ChartView {
        self.state.view = self.state.view.toggled();
        self.state.view
    }

    /// Marks the state as loading and issues a fresh request token.
    pub fn begin_sync(&mut self) -> SyncRequest {
        self.latest_token += 1;
        self.state.loading = true;
        self.state.error = None;
        SyncRequest {
            token: self.latest_token,
            from: self.state.from.clone(),
            to: self.state.to.clone(),
            history_days: self.history_days,
        }
    }

    /// Applies an outcome unless a newer cycle has been issued since.
    pub fn complete_sync(&mut self, request: &SyncRequest, outcome: SyncOutcome) -> bool {
        if request.token != self.latest_token {
            debug!(
                stale = request.token,
                latest = self.latest_token,
                "Discarding stale conversion result"
            );
            return false;
        }

        if let Some(rate) = outcome.rate {
            self.state.rate = Some(rate);
        }
        if let Some(comparison) = outcome.comparison {
            self.state.comparison = comparison;
        }
        if let Some(history) = outcome.history {
            self.state.history = history;
        }
        self.state.error = outcome.error.map(|e| e.to_string());
        self.state.loading = false;
        true
    }

    pub async fn convert(&mut self, provider: &dyn RateProvider) {
        let request = self.begin_sync();
        let outcome = run_sync(provider, &request).await;
        self.complete_sync(&request, outcome);
    }
}
