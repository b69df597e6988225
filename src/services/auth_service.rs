//! Domain service for authentication.
//!
//! Handles registration, login, logout and bearer token verification.

use serde::Serialize;
use thiserror::Error;

use crate::db::{Role, User};

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Role not found: {0}")]
    RoleNotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

/// Token handed to a client after registration or login.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: &'static str,
}

/// Login result containing the token, the account and its role.
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub token: IssuedToken,
    pub user: User,
    pub role: Option<Role>,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates an account with the default role and issues its first token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::EmailTaken`] if the email is already registered.
    async fn register(&self, name: &str, email: &str, password: &str)
    -> Result<IssuedToken, AuthError>;

    /// Verifies credentials and issues a new token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AuthError>;

    /// Revokes the presented token.
    async fn logout(&self, token: &str) -> Result<(), AuthError>;

    /// Resolves a bearer token to its owner, if the token is live.
    async fn authenticate(&self, token: &str) -> Result<Option<User>, AuthError>;
}
