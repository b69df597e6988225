//! Weather lookup: cache-aside in front of the provider, with the search
//! recorded in the background.

use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

use crate::clients::{GatewayError, WeatherGateway};
use crate::i18n::Lang;
use crate::models::WeatherSnapshot;
use crate::services::history::{HistoryJob, HistoryQueue};
use crate::services::weather_cache::WeatherCache;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error(transparent)]
    Upstream(#[from] GatewayError),
}

#[derive(Clone)]
pub struct WeatherService {
    cache: WeatherCache,
    gateway: Arc<dyn WeatherGateway>,
    history: HistoryQueue,
}

impl WeatherService {
    #[must_use]
    pub fn new(cache: WeatherCache, gateway: Arc<dyn WeatherGateway>, history: HistoryQueue) -> Self {
        Self {
            cache,
            gateway,
            history,
        }
    }

    /// Returns current conditions for `city`. On success one history job is
    /// queued for `user_id`; the caller never waits for it.
    pub async fn current_by_city(
        &self,
        user_id: i32,
        city: &str,
        lang: Lang,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let gateway = self.gateway.clone();
        let snapshot = self
            .cache
            .get_or_compute(city, lang, || async move {
                gateway.fetch_current(city, lang).await.inspect_err(|e| {
                    metrics::counter!("weather_upstream_failures_total").increment(1);
                    warn!(city = %city, code = e.code, error = %e.message, "Weather lookup failed");
                })
            })
            .await?;

        self.history.enqueue(HistoryJob {
            user_id,
            city: city.to_string(),
            country: snapshot.country().to_string(),
            region: snapshot.region().to_string(),
        });

        Ok(snapshot)
    }

    #[must_use]
    pub const fn history(&self) -> &HistoryQueue {
        &self.history
    }
}
