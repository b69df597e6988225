//! `SeaORM` implementation of the `FavoriteService` trait.

use async_trait::async_trait;

use crate::db::{FavoriteCity, Store};
use crate::models::{ListOptions, Page};
use crate::services::favorite_service::{FavoriteError, FavoriteService};

pub struct SeaOrmFavoriteService {
    store: Store,
}

impl SeaOrmFavoriteService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl FavoriteService for SeaOrmFavoriteService {
    async fn add(&self, user_id: i32, city: &str) -> Result<FavoriteCity, FavoriteError> {
        self.store
            .add_favorite_city(user_id, city)
            .await?
            .ok_or(FavoriteError::AlreadyExists)
    }

    async fn remove(&self, user_id: i32, id: i32) -> Result<(), FavoriteError> {
        if self.store.remove_favorite_city(user_id, id).await? {
            Ok(())
        } else {
            Err(FavoriteError::NotFound)
        }
    }

    async fn list(
        &self,
        user_id: i32,
        options: ListOptions,
    ) -> Result<Page<FavoriteCity>, FavoriteError> {
        Ok(self.store.list_favorite_cities(user_id, options).await?)
    }
}
