use crate::core::error::{FxError, Result};
use crate::core::rates::{HistoryPoint, RateProvider, RateSnapshot};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, instrument};

const LATEST_RESOURCE: &str = "latest rates";
const HISTORY_RESOURCE: &str = "historical data";

/// Client for the Frankfurter exchange-rate API.
pub struct FrankfurterProvider {
    base_url: String,
}

impl FrankfurterProvider {
    pub fn new(base_url: &str) -> Self {
        FrankfurterProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Joins `path` onto the base URL with percent-encoded query parameters.
    fn endpoint(
        &self,
        path: &str,
        params: &[(&str, &str)],
        resource: &'static str,
    ) -> Result<reqwest::Url> {
        reqwest::Url::parse_with_params(&format!("{}/{}", self.base_url, path), params)
            .map_err(|e| FxError::network(resource, e))
    }

    async fn get(&self, url: &reqwest::Url, resource: &'static str) -> Result<reqwest::Response> {
        debug!("Requesting {} from {}", resource, url);

        let client = reqwest::Client::builder()
            .user_agent("fxpulse/0.1")
            .build()
            .map_err(|e| FxError::network(resource, e))?;
        let response = client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FxError::network(resource, e))?;

        if !response.status().is_success() {
            return Err(FxError::network(
                resource,
                format!("HTTP {}", response.status()),
            ));
        }
        Ok(response)
    }
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    base: String,
    date: NaiveDate,
    #[serde(default)]
    rates: HashMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct HistoricalResponse {
    #[serde(default, deserialize_with = "in_document_order")]
    rates: Vec<(String, HashMap<String, f64>)>,
}

/// Keeps the date keys of a JSON object in the order the provider sent them.
fn in_document_order<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<(String, HashMap<String, f64>)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OrderedEntries;

    impl<'de> Visitor<'de> for OrderedEntries {
        type Value = Vec<(String, HashMap<String, f64>)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of dates to currency rates")
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(OrderedEntries)
}

/// One point per date, carrying `None` where the date lacks `to`.
fn project_history(response: HistoricalResponse, to: &str) -> Vec<HistoryPoint> {
    response
        .rates
        .into_iter()
        .map(|(date, rates)| HistoryPoint {
            rate: rates.get(to).copied(),
            date,
        })
        .collect()
}

#[async_trait]
impl RateProvider for FrankfurterProvider {
    #[instrument(name = "FrankfurterLatest", skip(self))]
    async fn latest_rates(&self, base: &str) -> Result<RateSnapshot> {
        let url = self.endpoint("latest", &[("from", base)], LATEST_RESOURCE)?;
        let response = self.get(&url, LATEST_RESOURCE).await?;

        let data = response
            .json::<LatestResponse>()
            .await
            .map_err(|e| FxError::network(LATEST_RESOURCE, e))?;
        debug!(rates = data.rates.len(), date = %data.date, "Received latest rates");

        Ok(RateSnapshot {
            base: data.base,
            as_of: data.date,
            rates: data.rates,
        })
    }

    #[instrument(name = "FrankfurterHistory", skip(self))]
    async fn historical_range(
        &self,
        from: &str,
        to: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<HistoryPoint>> {
        let url = self.endpoint(
            &format!("{start}..{end}"),
            &[("from", from), ("to", to)],
            HISTORY_RESOURCE,
        )?;
        let response = self.get(&url, HISTORY_RESOURCE).await?;

        let data = response
            .json::<HistoricalResponse>()
            .await
            .map_err(|e| FxError::network(HISTORY_RESOURCE, e))?;
        debug!(points = data.rates.len(), "Received historical rates");

        Ok(project_history(data, to))
    }
}
