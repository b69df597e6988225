use axum::{
    Router,
    handler::Handler,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::services::{
    AccessControl, AuthService, FavoriteService, Permission, UserService, WeatherService,
};
use crate::state::SharedState;

pub mod auth;
mod error;
pub mod extract;
mod favorites;
mod observability;
mod types;
mod users;
mod validation;
mod weather;

pub use error::{ApiError, FieldErrors};
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    /// Origin prepended to request paths in pagination links.
    pub public_url: String,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn user_service(&self) -> &Arc<dyn UserService> {
        &self.shared.user_service
    }

    #[must_use]
    pub fn favorite_service(&self) -> &Arc<dyn FavoriteService> {
        &self.shared.favorite_service
    }

    #[must_use]
    pub fn weather_service(&self) -> &WeatherService {
        &self.shared.weather_service
    }

    #[must_use]
    pub fn access_control(&self) -> &AccessControl {
        &self.shared.access_control
    }

    #[must_use]
    pub fn absolute_url(&self, path: &str) -> String {
        format!("{}{}", self.public_url.trim_end_matches('/'), path)
    }
}

pub async fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    let public_url = shared.config.read().await.server.public_url.clone();

    Arc::new(AppState {
        shared,
        public_url,
        prometheus_handle,
    })
}

pub async fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().read().await.server.cors_allowed_origins.clone();

    let v1 = Router::new()
        .merge(create_protected_router(state.clone()))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .with_state(state);

    let api_router = Router::new()
        .route("/", get(|| async { "Hello World" }))
        .nest("/v1", v1);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let gate_state = state.clone();
    let gate = move |permission: Permission| {
        middleware::from_fn_with_state((gate_state.clone(), permission), auth::permission_gate)
    };

    Router::new()
        .route("/auth/logout", post(auth::logout))
        .route(
            "/users",
            get(users::list.layer(gate(Permission::UsersIndex)))
                .post(users::create.layer(gate(Permission::UsersCreate))),
        )
        .route(
            "/users/{id}",
            put(users::update.layer(gate(Permission::UsersUpdate)))
                .delete(users::delete.layer(gate(Permission::UsersDestroy))),
        )
        .route("/weather-module/weather/by-city", get(weather::by_city))
        .route(
            "/weather-module/search-history",
            get(weather::search_history),
        )
        .route(
            "/weather-module/favorite-cities",
            get(favorites::list).post(favorites::add),
        )
        .route(
            "/weather-module/favorite-cities/{id}",
            delete(favorites::remove),
        )
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn_with_state(state, auth::require_bearer))
}
