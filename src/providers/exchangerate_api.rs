use crate::core::error::{FetchError, RateError};
use crate::core::rates::{RateProvider, RateTable};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Loads rates from an exchangerate-api.com style "latest" endpoint.
pub struct ExchangeRateApiProvider {
    endpoint: String,
    base_currency: String,
}

impl ExchangeRateApiProvider {
    pub fn new(endpoint: &str, base_currency: &str) -> Self {
        ExchangeRateApiProvider {
            endpoint: endpoint.to_string(),
            base_currency: base_currency.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    result: Option<String>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    base_code: Option<String>,
    conversion_rates: Option<HashMap<String, f64>>,
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    // The endpoint embeds the API key, keep it out of spans.
    #[instrument(name = "RateFetch", skip(self), fields(base = %self.base_currency))]
    async fn fetch(&self) -> Result<RateTable, RateError> {
        debug!("Requesting currency rates");

        let client = reqwest::Client::builder()
            .user_agent("fxconv/1.0")
            .build()
            .map_err(FetchError::from)?;
        let response = client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(FetchError::from)?;

        debug!(status = %response.status(), "Received rate service response");

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()).into());
        }

        let text = response.text().await.map_err(FetchError::from)?;
        let data: LatestRatesResponse = serde_json::from_str(&text).map_err(FetchError::from)?;

        if data.result.as_deref() == Some("error") {
            let reason = data.error_type.unwrap_or_else(|| "unknown".to_string());
            return Err(FetchError::Service(reason).into());
        }

        let rates = data
            .conversion_rates
            .filter(|rates| !rates.is_empty())
            .ok_or(RateError::MissingRates)?;
        let base = data.base_code.as_deref().unwrap_or(&self.base_currency);

        let table = RateTable::new(base, rates)?;
        debug!(count = table.len(), base = %table.base(), "Loaded currency rates");
        Ok(table)
    }
}
