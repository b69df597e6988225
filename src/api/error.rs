use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use super::ApiResponse;
use crate::clients::GatewayError;
use crate::i18n::{Lang, Msg, Rule};

/// Field name to localized messages, rendered as the error envelope `data`.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Every variant carries its already-localized envelope message.
#[derive(Debug)]
pub enum ApiError {
    Validation { message: String, errors: FieldErrors },

    Conflict(String),

    NotFound(String),

    Unauthenticated(String),

    PermissionDenied(String),

    Upstream { message: String, error: GatewayError },

    Internal { message: String, detail: String },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation { errors, .. } => {
                let fields: Vec<&str> = errors.keys().map(String::as_str).collect();
                write!(f, "Validation error: {}", fields.join(", "))
            }
            Self::Conflict(msg) => write!(f, "Conflict: {msg}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::Unauthenticated(msg) => write!(f, "Unauthenticated: {msg}"),
            Self::PermissionDenied(msg) => write!(f, "Permission denied: {msg}"),
            Self::Upstream { error, .. } => write!(f, "Upstream error: {error}"),
            Self::Internal { detail, .. } => write!(f, "Internal error: {detail}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, data) = match self {
            Self::Validation { message, errors } => (
                message,
                serde_json::to_value(errors).unwrap_or_else(|_| empty()),
            ),
            Self::Conflict(message)
            | Self::NotFound(message)
            | Self::Unauthenticated(message)
            | Self::PermissionDenied(message) => (message, empty()),
            Self::Upstream { message, error } => {
                tracing::warn!(code = error.code, "Weather provider error: {}", error.message);
                (
                    message,
                    serde_json::to_value(error).unwrap_or_else(|_| empty()),
                )
            }
            Self::Internal { message, detail } => {
                tracing::error!("Internal error: {}", detail);
                (message, empty())
            }
        };

        (status, Json(ApiResponse::error(message, data))).into_response()
    }
}

fn empty() -> Value {
    Value::Array(Vec::new())
}

impl ApiError {
    pub fn invalid_data(lang: Lang, errors: FieldErrors) -> Self {
        Self::Validation {
            message: Msg::InvalidData.text(lang).to_string(),
            errors,
        }
    }

    /// Single-field validation failure.
    pub fn field(lang: Lang, field: &str, rule: Rule) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![rule.message(field, lang)]);
        Self::invalid_data(lang, errors)
    }

    pub fn conflict(lang: Lang, msg: Msg) -> Self {
        Self::Conflict(msg.text(lang).to_string())
    }

    pub fn not_found(lang: Lang, msg: Msg) -> Self {
        Self::NotFound(msg.text(lang).to_string())
    }

    pub fn unauthenticated(lang: Lang) -> Self {
        Self::Unauthenticated(Msg::Unauthenticated.text(lang).to_string())
    }

    pub fn invalid_credentials(lang: Lang) -> Self {
        Self::Unauthenticated(Msg::LoginError.text(lang).to_string())
    }

    pub fn permission_denied(lang: Lang) -> Self {
        Self::PermissionDenied(Msg::PermissionDenied.text(lang).to_string())
    }

    pub fn upstream(lang: Lang, error: GatewayError) -> Self {
        Self::Upstream {
            message: Msg::WeatherError.text(lang).to_string(),
            error,
        }
    }

    pub fn internal(lang: Lang, msg: Msg, detail: impl fmt::Display) -> Self {
        Self::Internal {
            message: msg.text(lang).to_string(),
            detail: detail.to_string(),
        }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::Conflict(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied(_) => StatusCode::FORBIDDEN,
            Self::Upstream { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
