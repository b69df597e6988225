use sea_orm_migration::prelude::*;

mod m20260301_000001_identity;
mod m20260301_000002_weather;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_identity::Migration),
            Box::new(m20260301_000002_weather::Migration),
        ]
    }
}
