//! Domain service for per-user favorite cities.

use thiserror::Error;

use crate::db::FavoriteCity;
use crate::models::{ListOptions, Page};

#[derive(Debug, Error)]
pub enum FavoriteError {
    #[error("City already in favorites")]
    AlreadyExists,

    #[error("Favorite not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for FavoriteError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

/// Every operation is scoped to `user_id`; other users' rows are invisible.
#[async_trait::async_trait]
pub trait FavoriteService: Send + Sync {
    /// # Errors
    ///
    /// Returns [`FavoriteError::AlreadyExists`] if the user already has this city.
    async fn add(&self, user_id: i32, city: &str) -> Result<FavoriteCity, FavoriteError>;

    /// # Errors
    ///
    /// Returns [`FavoriteError::NotFound`] if the id is missing or owned by someone else.
    async fn remove(&self, user_id: i32, id: i32) -> Result<(), FavoriteError>;

    async fn list(
        &self,
        user_id: i32,
        options: ListOptions,
    ) -> Result<Page<FavoriteCity>, FavoriteError>;
}
