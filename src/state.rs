use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::clients::{WeatherApiClient, WeatherGateway};
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AccessControl, AuthService, CacheStore, FavoriteService, HistoryQueue, MemoryCacheStore,
    RetryPolicy, SeaOrmAuthService, SeaOrmFavoriteService, SeaOrmUserService,
    SearchHistoryRetention, UserService, WeatherCache, WeatherService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub user_service: Arc<dyn UserService>,

    pub favorite_service: Arc<dyn FavoriteService>,

    pub weather_service: WeatherService,

    pub access_control: AccessControl,

    pub cache_store: Arc<dyn CacheStore>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let gateway = Arc::new(WeatherApiClient::new(&config.weather)?);
        Self::with_gateway(config, gateway).await
    }

    /// Builds the state around an explicit weather provider.
    pub async fn with_gateway(
        config: Config,
        gateway: Arc<dyn WeatherGateway>,
    ) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let users = SeaOrmUserService::new(store.clone(), config.security.clone());
        users
            .ensure_bootstrap_admin(&config.security.bootstrap)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create bootstrap administrator: {e}"))?;

        let cache_store: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
        let cache = WeatherCache::new(
            cache_store.clone(),
            chrono::Duration::minutes(config.weather.cache_ttl_minutes),
        );

        let recorder = Arc::new(SearchHistoryRetention::new(
            store.clone(),
            config.history.max_entries,
        ));
        let history = HistoryQueue::spawn(
            recorder,
            config.history.queue_capacity,
            RetryPolicy::from(&config.history),
        );

        let weather_service = WeatherService::new(cache, gateway, history);

        Ok(Self {
            auth_service: Arc::new(SeaOrmAuthService::new(
                store.clone(),
                config.security.clone(),
            )),
            user_service: Arc::new(users),
            favorite_service: Arc::new(SeaOrmFavoriteService::new(store.clone())),
            weather_service,
            access_control: AccessControl::new(store.clone()),
            cache_store,
            store,
            config: Arc::new(RwLock::new(config)),
        })
    }

    /// Periodically drops expired weather cache entries.
    pub fn spawn_cache_sweep(&self, interval: Duration) -> JoinHandle<()> {
        let cache_store = self.cache_store.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let purged = cache_store.purge_expired().await;
                if purged > 0 {
                    let remaining = cache_store.entry_count().await;
                    debug!(
                        event = "weather_cache_swept",
                        purged,
                        remaining,
                        "Expired cache entries dropped"
                    );
                }
            }
        })
    }

    /// Waits until every queued history job has been written.
    pub async fn shutdown(&self) {
        self.weather_service.history().flush().await;
        info!("Background history queue drained");
    }
}
