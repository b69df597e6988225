use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use super::extract::{BearerToken, CurrentUser, JsonBody};
use super::validation::Validator;
use super::{ApiError, ApiResponse, AppState, LoginResponse, MessageResponse};
use crate::i18n::{Lang, Msg, Rule};
use crate::services::{AuthError, IssuedToken, Permission};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Resolves `Authorization: Bearer <token>` to an account and exposes it to
/// handlers as [`CurrentUser`]. Anything else is rejected with 401.
pub async fn require_bearer(
    State(state): State<Arc<AppState>>,
    lang: Lang,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(&headers).ok_or_else(|| ApiError::unauthenticated(lang))?;

    let user = state
        .auth_service()
        .authenticate(&token)
        .await
        .map_err(|e| ApiError::internal(lang, Msg::ApiError, e))?
        .ok_or_else(|| ApiError::unauthenticated(lang))?;

    tracing::Span::current().record("user_id", user.id);

    request.extensions_mut().insert(CurrentUser(user));
    request.extensions_mut().insert(BearerToken(token));
    Ok(next.run(request).await)
}

/// Per-route permission check; runs after [`require_bearer`].
pub async fn permission_gate(
    State((state, permission)): State<(Arc<AppState>, Permission)>,
    lang: Lang,
    CurrentUser(user): CurrentUser,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let allowed = state
        .access_control()
        .has_permission(user.id, permission)
        .await
        .map_err(|e| ApiError::internal(lang, Msg::ApiError, e))?;

    if !allowed {
        tracing::info!(
            event = "permission_denied",
            user_id = user.id,
            permission = %permission,
            "Permission denied"
        );
        return Err(ApiError::permission_denied(lang));
    }

    Ok(next.run(request).await)
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// POST /auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    lang: Lang,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> Result<Json<ApiResponse<IssuedToken>>, ApiError> {
    let mut v = Validator::new(lang);
    let name = v.name(payload.name.as_deref());
    let email = v.email(payload.email.as_deref());
    let password = v.confirmed_password(
        payload.password.as_deref(),
        payload.password_confirmation.as_deref(),
    );
    let (Some(name), Some(email), Some(password)) = (name, email, password) else {
        return Err(v.into_error());
    };

    let token = state
        .auth_service()
        .register(name, email, password)
        .await
        .map_err(|e| auth_error(lang, e))?;

    Ok(Json(ApiResponse::success(token, Msg::ApiSuccess.text(lang))))
}

/// POST /auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    lang: Lang,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let mut v = Validator::new(lang);
    let email = v.email(payload.email.as_deref());
    let password = v.required("password", payload.password.as_deref());
    let (Some(email), Some(password)) = (email, password) else {
        return Err(v.into_error());
    };

    let result = state
        .auth_service()
        .login(email, password)
        .await
        .map_err(|e| auth_error(lang, e))?;

    Ok(Json(ApiResponse::success(
        LoginResponse {
            access_token: result.token.access_token,
            user_data: result.user.into(),
            role: result.role.map(Into::into),
            token_type: result.token.token_type,
        },
        Msg::ApiSuccess.text(lang),
    )))
}

/// POST /auth/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    lang: Lang,
    BearerToken(token): BearerToken,
) -> Result<impl IntoResponse, ApiError> {
    state
        .auth_service()
        .logout(&token)
        .await
        .map_err(|e| auth_error(lang, e))?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            MessageResponse {
                message: Msg::LogoutSuccess.text(lang).to_string(),
            },
            Msg::ApiSuccess.text(lang),
        )),
    ))
}

fn auth_error(lang: Lang, err: AuthError) -> ApiError {
    match err {
        AuthError::InvalidCredentials => ApiError::invalid_credentials(lang),
        AuthError::EmailTaken => ApiError::field(lang, "email", Rule::Unique),
        AuthError::RoleNotFound(role) => {
            ApiError::internal(lang, Msg::ApiError, format!("default role missing: {role}"))
        }
        AuthError::Internal(detail) => ApiError::internal(lang, Msg::ApiError, detail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_bearer() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(extract_bearer(&headers).as_deref(), Some("abc123"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc123"));
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_bearer(&headers), None);
    }
}
