//! Client for the current-conditions endpoint of the weather provider.
//!
//! The provider payload is narrowed to [`WeatherSnapshot`] here so that the
//! rest of the crate never sees provider-specific fields.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::config::WeatherConfig;
use crate::i18n::Lang;
use crate::models::WeatherSnapshot;

/// Failure shape surfaced to API clients as the error envelope `data`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GatewayError {
    pub message: String,
    pub code: u16,
    /// Upstream JSON body, when the provider answered with one.
    pub response: Option<serde_json::Value>,
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "weather provider error ({}): {}", self.code, self.message)
    }
}

impl std::error::Error for GatewayError {}

impl GatewayError {
    fn transport(err: &reqwest::Error) -> Self {
        Self {
            message: err.to_string(),
            code: err.status().map_or(0, |s| s.as_u16()),
            response: None,
        }
    }

    fn decode(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: 0,
            response: None,
        }
    }
}

#[async_trait]
pub trait WeatherGateway: Send + Sync {
    /// Fetches current conditions for `city`, localized to `lang`.
    async fn fetch_current(&self, city: &str, lang: Lang) -> Result<WeatherSnapshot, GatewayError>;
}

#[derive(Clone)]
pub struct WeatherApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WeatherApiClient {
    pub fn new(config: &WeatherConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(concat!("nimbus/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn current_url(&self, city: &str, lang: Lang) -> Result<url::Url, GatewayError> {
        url::Url::parse_with_params(
            &format!("{}/current.json", self.base_url),
            [
                ("key", self.api_key.as_str()),
                ("q", city),
                ("lang", lang.code()),
            ],
        )
        .map_err(|e| GatewayError::decode(format!("Invalid weather API URL: {e}")))
    }
}

#[async_trait]
impl WeatherGateway for WeatherApiClient {
    async fn fetch_current(&self, city: &str, lang: Lang) -> Result<WeatherSnapshot, GatewayError> {
        let url = self.current_url(city, lang)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GatewayError::transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError {
                message: format!("Weather API error: {status}"),
                code: status.as_u16(),
                response: serde_json::from_str(&body).ok(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| GatewayError::transport(&e))?;

        serde_json::from_slice::<WeatherSnapshot>(&body)
            .map_err(|e| GatewayError::decode(format!("Unexpected weather payload: {e}")))
    }
}
