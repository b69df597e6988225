use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;

use super::{order, timestamp};
use crate::entities::{prelude::*, search_histories};
use crate::models::{ListOptions, Page};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHistoryEntry {
    pub id: i32,
    pub user_id: i32,
    pub city: String,
    pub country: String,
    pub region: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<search_histories::Model> for SearchHistoryEntry {
    fn from(model: search_histories::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            city: model.city,
            country: model.country,
            region: model.region,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// What a single retention pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetentionOutcome {
    pub evicted: Option<i32>,
    pub inserted: bool,
}

pub struct SearchHistoryRepository {
    conn: DatabaseConnection,
}

impl SearchHistoryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Applies the bounded-retention write for one search.
    ///
    /// When the user already holds `max_entries` rows the oldest one
    /// (`created_at`, then `id`) is evicted first. Only then is the exact
    /// `(city, country, region)` tuple looked up; an identical row is left as
    /// is, otherwise a new row is inserted. Both steps share one transaction.
    pub async fn record(
        &self,
        user_id: i32,
        city: &str,
        country: &str,
        region: &str,
        max_entries: u64,
    ) -> Result<RetentionOutcome> {
        let txn = self.conn.begin().await?;
        let mut outcome = RetentionOutcome::default();

        let count = SearchHistories::find()
            .filter(search_histories::Column::UserId.eq(user_id))
            .count(&txn)
            .await
            .context("Failed to count search history")?;

        if count >= max_entries {
            let oldest = SearchHistories::find()
                .filter(search_histories::Column::UserId.eq(user_id))
                .order_by_asc(search_histories::Column::CreatedAt)
                .order_by_asc(search_histories::Column::Id)
                .one(&txn)
                .await
                .context("Failed to find oldest search history entry")?;

            if let Some(oldest) = oldest {
                SearchHistories::delete_by_id(oldest.id)
                    .exec(&txn)
                    .await
                    .context("Failed to evict search history entry")?;
                outcome.evicted = Some(oldest.id);
            }
        }

        let duplicate = SearchHistories::find()
            .filter(search_histories::Column::UserId.eq(user_id))
            .filter(search_histories::Column::City.eq(city))
            .filter(search_histories::Column::Country.eq(country))
            .filter(search_histories::Column::Region.eq(region))
            .count(&txn)
            .await
            .context("Failed to check for duplicate search")?;

        if duplicate == 0 {
            let now = timestamp();
            search_histories::ActiveModel {
                user_id: Set(user_id),
                city: Set(city.to_string()),
                country: Set(country.to_string()),
                region: Set(region.to_string()),
                created_at: Set(now.clone()),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .context("Failed to insert search history entry")?;
            outcome.inserted = true;
        }

        txn.commit().await?;
        Ok(outcome)
    }

    pub async fn list(
        &self,
        user_id: i32,
        options: ListOptions,
    ) -> Result<Page<SearchHistoryEntry>> {
        let paginator = SearchHistories::find()
            .filter(search_histories::Column::UserId.eq(user_id))
            .order_by(search_histories::Column::Id, order(options.direction))
            .paginate(&self.conn, options.per_page);

        let total = paginator
            .num_items()
            .await
            .context("Failed to count search history")?;
        let items = paginator
            .fetch_page(options.page - 1)
            .await
            .context("Failed to fetch search history")?;

        Ok(Page {
            items: items.into_iter().map(SearchHistoryEntry::from).collect(),
            total,
            per_page: options.per_page,
            current_page: options.page,
        })
    }

    /// All rows for the user, oldest first.
    pub async fn all_for_user(&self, user_id: i32) -> Result<Vec<SearchHistoryEntry>> {
        let rows = SearchHistories::find()
            .filter(search_histories::Column::UserId.eq(user_id))
            .order_by_asc(search_histories::Column::CreatedAt)
            .order_by_asc(search_histories::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to load search history")?;

        Ok(rows.into_iter().map(SearchHistoryEntry::from).collect())
    }
}
