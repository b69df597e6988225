mod common;

use axum::http::StatusCode;
use common::{ADMIN_EMAIL, spawn_app};
use serde_json::json;

#[tokio::test]
async fn test_liveness() {
    let app = spawn_app().await;
    let response = tower::ServiceExt::oneshot(
        app.router.clone(),
        axum::http::Request::builder()
            .uri("/api")
            .body(axum::body::Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    assert_eq!(&bytes[..], b"Hello World");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = spawn_app().await;

    let (status, body) = app
        .send("GET", "/api/v1/weather-module/favorite-cities", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "You are not authenticated.");

    let (status, _) = app
        .get("/api/v1/weather-module/favorite-cities", "not-a-token")
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_login_logout_round_trip() {
    let app = spawn_app().await;

    let token = app.register("Ana Lopez", "ana@example.com").await;
    let (status, _) = app.get("/api/v1/weather-module/favorite-cities", &token).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post(
            "/api/v1/auth/login",
            None,
            json!({"email": "ana@example.com", "password": "password123"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["token_type"], "Bearer");
    assert_eq!(body["data"]["user_data"]["email"], "ana@example.com");
    assert_eq!(body["data"]["role"]["name"], "user");
    assert!(body["data"]["user_data"].get("password_hash").is_none());
    let login_token = body["data"]["access_token"].as_str().unwrap().to_string();

    let (status, body) = app
        .send("POST", "/api/v1/auth/logout", Some(&login_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], "Logged out successfully");

    let (status, _) = app
        .get("/api/v1/weather-module/favorite-cities", &login_token)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // The registration token is independent of the revoked one.
    let (status, _) = app.get("/api/v1/weather-module/favorite-cities", &token).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_with_bad_credentials() {
    let app = spawn_app().await;

    let (status, body) = app
        .post(
            "/api/v1/auth/login",
            None,
            json!({"email": ADMIN_EMAIL, "password": "wrong-password"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");

    let (status, body) = app
        .post(
            "/api/v1/auth/login?lang=es",
            None,
            json!({"email": ADMIN_EMAIL, "password": "wrong-password"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Credenciales inválidas");
}

#[tokio::test]
async fn test_register_validation() {
    let app = spawn_app().await;

    let (status, body) = app
        .post(
            "/api/v1/auth/register",
            None,
            json!({
                "name": "Al",
                "email": "nope",
                "password": "password123",
                "password_confirmation": "different1",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid data");
    assert!(body["data"]["name"].is_array());
    assert!(body["data"]["email"].is_array());
    assert!(body["data"]["password"].is_array());

    app.register("Ana Lopez", "ana@example.com").await;
    let (status, body) = app
        .post(
            "/api/v1/auth/register",
            None,
            json!({
                "name": "Other Ana",
                "email": "ana@example.com",
                "password": "password123",
                "password_confirmation": "password123",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["email"][0], "The email has already been taken.");
}

#[tokio::test]
async fn test_malformed_json_is_a_validation_error() {
    let app = spawn_app().await;

    let response = tower::ServiceExt::oneshot(
        app.router.clone(),
        axum::http::Request::builder()
            .method("POST")
            .uri("/api/v1/auth/login")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{not json"))
            .unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post(
            "/api/v1/auth/login",
            None,
            json!({"email": 42, "password": "x"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["email"][0], "The email field must be a string.");
}

#[tokio::test]
async fn test_user_management_requires_permission() {
    let app = spawn_app().await;
    let token = app.register("Ana Lopez", "ana@example.com").await;

    let (status, body) = app.get("/api/v1/users", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["message"],
        "You do not have the required permissions to access this route."
    );

    let (status, body) = app.get("/api/v1/users?lang=es", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["message"],
        "No tiene los permisos necesarios para acceder a esta ruta."
    );
}

#[tokio::test]
async fn test_admin_user_crud() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (status, body) = app
        .post(
            "/api/v1/users",
            Some(&admin),
            json!({
                "name": "Bruno Diaz",
                "email": "bruno@example.com",
                "password": "password123",
                "password_confirmation": "password123",
                "role": "user",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["message"], "User created successfully");
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app
        .post(
            "/api/v1/users",
            Some(&admin),
            json!({
                "name": "Carla Ruiz",
                "email": "carla@example.com",
                "password": "password123",
                "password_confirmation": "password123",
                "role": "superhero",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"]["role"].is_array());

    // The caller is excluded from the listing.
    let (status, body) = app.get("/api/v1/users", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["email"], "bruno@example.com");

    let (status, body) = app
        .send(
            "PUT",
            &format!("/api/v1/users/{id}"),
            Some(&admin),
            Some(json!({"name": "Bruno Wayne"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Bruno Wayne");

    let (status, body) = app
        .send("DELETE", &format!("/api/v1/users/{id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted successfully");
    assert!(body["data"].is_null());

    let (status, _) = app
        .send("DELETE", &format!("/api/v1/users/{id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(
            "PUT",
            "/api/v1/users/abc",
            Some(&admin),
            Some(json!({"name": "Nobody Here"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleted_user_token_is_rejected() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let token = app.register("Dora Vega", "dora@example.com").await;

    let user = app
        .shared
        .store
        .get_user_by_email("dora@example.com")
        .await
        .unwrap()
        .unwrap();

    let (status, _) = app
        .send("DELETE", &format!("/api/v1/users/{}", user.id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get("/api/v1/weather-module/favorite-cities", &token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
