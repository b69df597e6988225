#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use nimbus::clients::{GatewayError, WeatherGateway};
use nimbus::config::Config;
use nimbus::i18n::Lang;
use nimbus::models::{Condition, CurrentConditions, SnapshotLocation, WeatherSnapshot};
use nimbus::state::SharedState;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@nimbus.test";
pub const ADMIN_PASSWORD: &str = "admin-pass-1";

/// Provider stand-in that counts calls and can be switched to failing.
#[derive(Default)]
pub struct FakeGateway {
    pub calls: AtomicUsize,
    pub failing: AtomicBool,
}

impl FakeGateway {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl WeatherGateway for FakeGateway {
    async fn fetch_current(&self, city: &str, _lang: Lang) -> Result<WeatherSnapshot, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing.load(Ordering::SeqCst) {
            return Err(GatewayError {
                message: "No matching location found.".to_string(),
                code: 400,
                response: Some(json!({"error": {"code": 1006, "message": "No matching location found."}})),
            });
        }

        Ok(WeatherSnapshot {
            location: SnapshotLocation {
                name: city.to_string(),
                region: format!("{city} Region"),
                country: "Testland".to_string(),
                localtime: "2026-10-19 12:00".to_string(),
            },
            current: CurrentConditions {
                temp_c: 18.0,
                temp_f: 64.4,
                condition: Condition {
                    text: "Partly cloudy".to_string(),
                },
                wind_kph: 11.2,
                humidity: 72,
            },
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub shared: Arc<SharedState>,
    pub gateway: Arc<FakeGateway>,
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    let path = std::env::temp_dir().join(format!("nimbus-test-{}.db", uuid::Uuid::new_v4()));
    config.general.database_path = format!("sqlite:{}", path.display());
    config.observability.metrics_enabled = false;

    config.security.argon2_memory_cost_kib = 64;
    config.security.argon2_time_cost = 1;
    config.security.argon2_parallelism = 1;
    config.security.bootstrap.admin_email = ADMIN_EMAIL.to_string();
    config.security.bootstrap.admin_password = ADMIN_PASSWORD.to_string();

    config
}

pub async fn spawn_app() -> TestApp {
    let gateway = Arc::new(FakeGateway::default());
    let shared = Arc::new(
        SharedState::with_gateway(test_config(), gateway.clone())
            .await
            .expect("Failed to build shared state"),
    );

    let state = nimbus::api::create_app_state(shared.clone(), None).await;
    let router = nimbus::api::router(state).await;

    TestApp {
        router,
        shared,
        gateway,
    }
}

impl TestApp {
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send("GET", uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, token, Some(body)).await
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .post(
                "/api/v1/auth/login",
                None,
                json!({"email": email, "password": password}),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["data"]["access_token"].as_str().unwrap().to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    /// Registers a fresh `user`-role account and returns its token.
    pub async fn register(&self, name: &str, email: &str) -> String {
        let (status, body) = self
            .post(
                "/api/v1/auth/register",
                None,
                json!({
                    "name": name,
                    "email": email,
                    "password": "password123",
                    "password_confirmation": "password123",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register failed: {body}");
        body["data"]["access_token"].as_str().unwrap().to_string()
    }
}
