//! Request extractors shared by the handlers.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, OriginalUri, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::convert::Infallible;

use super::ApiError;
use super::error::FieldErrors;
use super::validation::Validator;
use crate::db::User;
use crate::i18n::{Lang, Msg, Rule};
use crate::models::ListOptions;

impl<S: Send + Sync> FromRequestParts<S> for Lang {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_query(parts.uri.query()))
    }
}

/// JSON request body whose fields are all optional strings.
///
/// An empty body deserializes to `T::default()` so that missing fields are
/// reported by the validator as `required`. Non-string field values are
/// reported as `string` failures; a body that is not a JSON object at all is
/// rejected as invalid data.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let lang = Lang::from_query(req.uri().query());
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::internal(lang, Msg::ApiError, e))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }

        let Ok(Value::Object(fields)) = serde_json::from_slice::<Value>(&bytes) else {
            return Err(ApiError::invalid_data(lang, FieldErrors::new()));
        };

        let mut v = Validator::new(lang);
        for (name, value) in &fields {
            if !matches!(value, Value::String(_) | Value::Null) {
                v.fail(name, Rule::String);
            }
        }
        v.finish()?;

        serde_json::from_value(Value::Object(fields))
            .map(Self)
            .map_err(|_| ApiError::invalid_data(lang, FieldErrors::new()))
    }
}

/// Validated `take` / `order_direction` / `page` query parameters plus the
/// request path used to build pagination links.
#[derive(Debug, Clone)]
pub struct ListParams {
    pub options: ListOptions,
    pub path: String,
}

impl<S: Send + Sync> FromRequestParts<S> for ListParams {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();
        let param = |key: &str| {
            url::form_urlencoded::parse(query.as_bytes())
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.into_owned())
        };

        let take = param("take");
        let direction = param("order_direction");
        let page = param("page");

        let mut v = Validator::new(Lang::from_query(parts.uri.query()));
        let options = v.list_options(take.as_deref(), direction.as_deref(), page.as_deref());
        v.finish()?;

        // Nested routers see a stripped URI; the original keeps the `/api/v1` prefix.
        let path = parts
            .extensions
            .get::<OriginalUri>()
            .map_or_else(|| parts.uri.path().to_string(), |uri| uri.path().to_string());

        Ok(Self { options, path })
    }
}

/// The account behind the bearer token, set by the auth middleware.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| ApiError::unauthenticated(Lang::from_query(parts.uri.query())))
    }
}

/// The raw bearer token of the current request.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| ApiError::unauthenticated(Lang::from_query(parts.uri.query())))
    }
}
