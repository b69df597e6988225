use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use serde::Serialize;

use super::{order, timestamp};
use crate::entities::{favorite_cities, prelude::*};
use crate::models::{ListOptions, Page};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FavoriteCity {
    pub id: i32,
    pub user_id: i32,
    pub city: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<favorite_cities::Model> for FavoriteCity {
    fn from(model: favorite_cities::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            city: model.city,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub struct FavoriteCityRepository {
    conn: DatabaseConnection,
}

impl FavoriteCityRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Returns `None` when the user already bookmarked this exact city.
    pub async fn add(&self, user_id: i32, city: &str) -> Result<Option<FavoriteCity>> {
        let exists = FavoriteCities::find()
            .filter(favorite_cities::Column::UserId.eq(user_id))
            .filter(favorite_cities::Column::City.eq(city))
            .count(&self.conn)
            .await
            .context("Failed to check favorite city")?;

        if exists > 0 {
            return Ok(None);
        }

        let now = timestamp();
        let inserted = favorite_cities::ActiveModel {
            user_id: Set(user_id),
            city: Set(city.to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await;

        match inserted {
            Ok(model) => Ok(Some(FavoriteCity::from(model))),
            // Lost a race against a concurrent add of the same city
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(None)
            }
            Err(e) => Err(e).context("Failed to insert favorite city"),
        }
    }

    /// Deletes the favorite only if `user_id` owns it.
    pub async fn remove(&self, user_id: i32, id: i32) -> Result<bool> {
        let result = FavoriteCities::delete_many()
            .filter(favorite_cities::Column::Id.eq(id))
            .filter(favorite_cities::Column::UserId.eq(user_id))
            .exec(&self.conn)
            .await
            .context("Failed to delete favorite city")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list(&self, user_id: i32, options: ListOptions) -> Result<Page<FavoriteCity>> {
        let paginator = FavoriteCities::find()
            .filter(favorite_cities::Column::UserId.eq(user_id))
            .order_by(favorite_cities::Column::Id, order(options.direction))
            .paginate(&self.conn, options.per_page);

        let total = paginator
            .num_items()
            .await
            .context("Failed to count favorite cities")?;
        let items = paginator
            .fetch_page(options.page - 1)
            .await
            .context("Failed to fetch favorite cities")?;

        Ok(Page {
            items: items.into_iter().map(FavoriteCity::from).collect(),
            total,
            per_page: options.per_page,
            current_page: options.page,
        })
    }
}
