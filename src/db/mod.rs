use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::models::{ListOptions, Page};

pub mod migrator;
pub mod repositories;

pub use repositories::favorite_city::FavoriteCity;
pub use repositories::role::Role;
pub use repositories::search_history::{RetentionOutcome, SearchHistoryEntry};
pub use repositories::user::{NewUser, User, UserChanges};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url
                .trim_start_matches("sqlite://")
                .trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn role_repo(&self) -> repositories::role::RoleRepository {
        repositories::role::RoleRepository::new(self.conn.clone())
    }

    fn token_repo(&self) -> repositories::token::TokenRepository {
        repositories::token::TokenRepository::new(self.conn.clone())
    }

    fn favorite_repo(&self) -> repositories::favorite_city::FavoriteCityRepository {
        repositories::favorite_city::FavoriteCityRepository::new(self.conn.clone())
    }

    fn history_repo(&self) -> repositories::search_history::SearchHistoryRepository {
        repositories::search_history::SearchHistoryRepository::new(self.conn.clone())
    }

    // ========== Users ==========

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn get_user_by_email_with_password(
        &self,
        email: &str,
    ) -> Result<Option<(User, String)>> {
        self.user_repo().get_by_email_with_password(email).await
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        self.user_repo().email_exists(email).await
    }

    pub async fn list_users_excluding(
        &self,
        exclude_id: i32,
        options: ListOptions,
    ) -> Result<Page<User>> {
        self.user_repo().list_excluding(exclude_id, options).await
    }

    pub async fn create_user(&self, new_user: NewUser) -> Result<User> {
        self.user_repo().create(new_user).await
    }

    pub async fn update_user(&self, id: i32, changes: UserChanges) -> Result<Option<User>> {
        self.user_repo().update(id, changes).await
    }

    pub async fn delete_user(&self, id: i32) -> Result<bool> {
        self.user_repo().delete(id).await
    }

    // ========== Roles & permissions ==========

    pub async fn get_role(&self, id: i32) -> Result<Option<Role>> {
        self.role_repo().get_by_id(id).await
    }

    pub async fn get_role_by_name(&self, name: &str) -> Result<Option<Role>> {
        self.role_repo().get_by_name(name).await
    }

    pub async fn role_has_permission(&self, role_id: i32, permission: &str) -> Result<bool> {
        self.role_repo().has_permission(role_id, permission).await
    }

    // ========== Access tokens ==========

    pub async fn issue_token(&self, user_id: i32, name: &str) -> Result<String> {
        self.token_repo().issue(user_id, name).await
    }

    pub async fn authenticate_token(&self, token: &str) -> Result<Option<i32>> {
        self.token_repo().authenticate(token).await
    }

    pub async fn revoke_token(&self, token: &str) -> Result<bool> {
        self.token_repo().revoke(token).await
    }

    // ========== Favorite cities ==========

    pub async fn add_favorite_city(&self, user_id: i32, city: &str) -> Result<Option<FavoriteCity>> {
        self.favorite_repo().add(user_id, city).await
    }

    pub async fn remove_favorite_city(&self, user_id: i32, id: i32) -> Result<bool> {
        self.favorite_repo().remove(user_id, id).await
    }

    pub async fn list_favorite_cities(
        &self,
        user_id: i32,
        options: ListOptions,
    ) -> Result<Page<FavoriteCity>> {
        self.favorite_repo().list(user_id, options).await
    }

    // ========== Search history ==========

    pub async fn record_search(
        &self,
        user_id: i32,
        city: &str,
        country: &str,
        region: &str,
        max_entries: u64,
    ) -> Result<RetentionOutcome> {
        self.history_repo()
            .record(user_id, city, country, region, max_entries)
            .await
    }

    pub async fn list_search_history(
        &self,
        user_id: i32,
        options: ListOptions,
    ) -> Result<Page<SearchHistoryEntry>> {
        self.history_repo().list(user_id, options).await
    }

    pub async fn search_history_for_user(&self, user_id: i32) -> Result<Vec<SearchHistoryEntry>> {
        self.history_repo().all_for_user(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_store() -> (Store, std::path::PathBuf) {
        let path = std::env::temp_dir().join(format!("nimbus-store-{}.db", uuid::Uuid::new_v4()));
        let store = Store::new(&format!("sqlite:{}", path.display()))
            .await
            .unwrap();
        (store, path)
    }

    async fn seed_user(store: &Store, email: &str) -> User {
        store
            .create_user(NewUser {
                name: "Tester".to_string(),
                email: email.to_string(),
                password_hash: "hash".to_string(),
                role_id: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_seeded_roles_and_permissions() {
        let (store, path) = temp_store().await;

        let admin = store.get_role_by_name("admin").await.unwrap().unwrap();
        let user = store.get_role_by_name("user").await.unwrap().unwrap();

        assert!(store.role_has_permission(admin.id, "users.index").await.unwrap());
        assert!(store.role_has_permission(admin.id, "users.destroy").await.unwrap());
        assert!(!store.role_has_permission(user.id, "users.index").await.unwrap());

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_retention_evicts_oldest_then_inserts() {
        let (store, path) = temp_store().await;
        let user = seed_user(&store, "retention@example.com").await;

        for city in ["A1", "A2", "A3", "A4", "A5", "A6", "A7"] {
            store
                .record_search(user.id, city, "Country", "Region", 5)
                .await
                .unwrap();
        }

        let rows = store.search_history_for_user(user.id).await.unwrap();
        let cities: Vec<_> = rows.iter().map(|r| r.city.as_str()).collect();
        assert_eq!(cities, ["A3", "A4", "A5", "A6", "A7"]);

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_retention_duplicate_with_full_history() {
        let (store, path) = temp_store().await;
        let user = seed_user(&store, "dup@example.com").await;

        for city in ["B1", "B2", "B3", "B4", "B5"] {
            store
                .record_search(user.id, city, "Country", "Region", 5)
                .await
                .unwrap();
        }

        // B3 is not the oldest: B1 is evicted and the duplicate is skipped
        let outcome = store
            .record_search(user.id, "B3", "Country", "Region", 5)
            .await
            .unwrap();
        assert!(outcome.evicted.is_some());
        assert!(!outcome.inserted);

        let rows = store.search_history_for_user(user.id).await.unwrap();
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.city != "B1"));

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_favorite_add_is_unique_per_user() {
        let (store, path) = temp_store().await;
        let user = seed_user(&store, "fav@example.com").await;
        let other = seed_user(&store, "other@example.com").await;

        assert!(store.add_favorite_city(user.id, "London").await.unwrap().is_some());
        assert!(store.add_favorite_city(user.id, "London").await.unwrap().is_none());
        assert!(store.add_favorite_city(other.id, "London").await.unwrap().is_some());

        assert_eq!(
            store
                .list_favorite_cities(user.id, ListOptions::default())
                .await
                .unwrap()
                .total,
            1
        );

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_delete_user_removes_owned_rows() {
        let (store, path) = temp_store().await;
        let user = seed_user(&store, "gone@example.com").await;

        store.issue_token(user.id, "auth_token").await.unwrap();
        store.add_favorite_city(user.id, "Paris").await.unwrap();
        store
            .record_search(user.id, "Paris", "France", "Ile-de-France", 5)
            .await
            .unwrap();

        assert!(store.delete_user(user.id).await.unwrap());
        assert!(!store.delete_user(user.id).await.unwrap());
        assert_eq!(
            store
                .list_favorite_cities(user.id, ListOptions::default())
                .await
                .unwrap()
                .total,
            0
        );
        assert!(store.search_history_for_user(user.id).await.unwrap().is_empty());

        let _ = std::fs::remove_file(path);
    }
}
