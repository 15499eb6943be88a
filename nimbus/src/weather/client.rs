use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

use super::reshape::{classify_upstream_failure, reshape};
use super::types::{ProviderForecastResponse, WeatherReport};
use crate::config::WeatherConfig;
use crate::error::{NimbusError, Result};

/// Forecast provider client. Every call goes upstream; nothing is cached or
/// retried.
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    config: Arc<WeatherConfig>,
    permits: Arc<Semaphore>,
}

impl WeatherClient {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NimbusError::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config: Arc::new(config.clone()),
            permits: Arc::new(Semaphore::new(config.max_concurrent_requests)),
        })
    }

    pub fn forecast_days(&self) -> u8 {
        self.config.forecast_days
    }

    /// Fetch the current conditions and forecast for a free-text location,
    /// postal code or `"lat,lon"` pair.
    pub async fn fetch(&self, location: &str) -> Result<WeatherReport> {
        let location = location.trim();
        if location.is_empty() {
            return Err(NimbusError::Validation(
                "Location parameter is missing. Please provide a city, zip, or coordinates."
                    .to_string(),
            ));
        }

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| NimbusError::Internal(format!("Upstream limiter closed: {e}")))?;

        let url = format!("{}/forecast.json", self.config.base_url);
        let days = self.config.forecast_days.to_string();

        tracing::debug!(location, days = %days, "Requesting forecast from provider");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.config.api_key.as_str()),
                ("q", location),
                ("days", days.as_str()),
                ("aqi", "no"),
            ])
            .send()
            .await
            .map_err(|e| {
                // reqwest includes the full URL, api key included, in its errors.
                NimbusError::Upstream(format!("request failed: {}", e.without_url()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = classify_upstream_failure(status, &body, location);
            if let NimbusError::Upstream(ref msg) = err {
                tracing::error!(location, error = %msg, "External weather API error");
            }
            return Err(err);
        }

        let payload: ProviderForecastResponse = response.json().await.map_err(|e| {
            NimbusError::Upstream(format!("unexpected provider payload: {}", e.without_url()))
        })?;

        Ok(reshape(payload))
    }
}
