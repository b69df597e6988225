use crate::entities::prelude::*;
use crate::entities::{favorite_cities, search_histories};
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(FavoriteCities)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_favorite_cities_user_city")
                    .table(FavoriteCities)
                    .col(favorite_cities::Column::UserId)
                    .col(favorite_cities::Column::City)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(SearchHistories)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_search_histories_user_created")
                    .table(SearchHistories)
                    .col(search_histories::Column::UserId)
                    .col(search_histories::Column::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SearchHistories).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FavoriteCities).to_owned())
            .await?;

        Ok(())
    }
}
