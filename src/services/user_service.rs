//! Domain service for admin-facing account management.

use thiserror::Error;

use crate::db::User;
use crate::models::{ListOptions, Page};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Role not found: {0}")]
    RoleNotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Fields left as `None` are not touched. A role replaces the current one.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub name: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    /// Lists every account except the caller's.
    async fn list(&self, current_user_id: i32, options: ListOptions) -> Result<Page<User>, UserError>;

    /// # Errors
    ///
    /// Returns [`UserError::EmailTaken`] or [`UserError::RoleNotFound`] before anything is written.
    async fn create(&self, account: NewAccount) -> Result<User, UserError>;

    async fn update(&self, id: i32, changes: AccountChanges) -> Result<User, UserError>;

    /// Deletes the account together with its tokens, favorites and history.
    async fn delete(&self, id: i32) -> Result<(), UserError>;
}
