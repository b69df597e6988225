use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tokio::task;

use super::{order, timestamp};
use crate::config::SecurityConfig;
use crate::entities::{access_tokens, favorite_cities, prelude::*, search_histories, users};
use crate::models::{ListOptions, Page};

/// User data returned from repository (without sensitive password hash)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role_id: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            role_id: model.role_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: Option<i32>,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub password_hash: Option<String>,
    pub role_id: Option<i32>,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?;

        Ok(user.map(User::from))
    }

    /// Get user by email together with the stored password hash (for login)
    pub async fn get_by_email_with_password(&self, email: &str) -> Result<Option<(User, String)>> {
        let user = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?;

        Ok(user.map(|u| {
            let password_hash = u.password_hash.clone();
            (User::from(u), password_hash)
        }))
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let count = Users::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.conn)
            .await
            .context("Failed to count users by email")?;

        Ok(count > 0)
    }

    /// Every account except `exclude_id`, ordered by id.
    pub async fn list_excluding(&self, exclude_id: i32, options: ListOptions) -> Result<Page<User>> {
        let paginator = Users::find()
            .filter(users::Column::Id.ne(exclude_id))
            .order_by(users::Column::Id, order(options.direction))
            .paginate(&self.conn, options.per_page);

        let total = paginator
            .num_items()
            .await
            .context("Failed to count users")?;
        let items = paginator
            .fetch_page(options.page - 1)
            .await
            .context("Failed to fetch user page")?;

        Ok(Page {
            items: items.into_iter().map(User::from).collect(),
            total,
            per_page: options.per_page,
            current_page: options.page,
        })
    }

    pub async fn create(&self, new_user: NewUser) -> Result<User> {
        let txn = self.conn.begin().await?;
        let now = timestamp();

        let model = users::ActiveModel {
            name: Set(new_user.name),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            role_id: Set(new_user.role_id),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("Failed to insert user")?;

        txn.commit().await?;
        Ok(User::from(model))
    }

    /// Returns `None` when no user has this id.
    pub async fn update(&self, id: i32, changes: UserChanges) -> Result<Option<User>> {
        let txn = self.conn.begin().await?;

        let Some(existing) = Users::find_by_id(id)
            .one(&txn)
            .await
            .context("Failed to query user for update")?
        else {
            return Ok(None);
        };

        let mut active: users::ActiveModel = existing.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(password_hash) = changes.password_hash {
            active.password_hash = Set(password_hash);
        }
        if let Some(role_id) = changes.role_id {
            active.role_id = Set(Some(role_id));
        }
        active.updated_at = Set(timestamp());

        let model = active
            .update(&txn)
            .await
            .context("Failed to update user")?;

        txn.commit().await?;
        Ok(Some(User::from(model)))
    }

    /// Deletes the user and everything they own. Returns `false` when no
    /// user has this id.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        if Users::find_by_id(id).one(&txn).await?.is_none() {
            return Ok(false);
        }

        AccessTokens::delete_many()
            .filter(access_tokens::Column::UserId.eq(id))
            .exec(&txn)
            .await
            .context("Failed to delete user tokens")?;
        FavoriteCities::delete_many()
            .filter(favorite_cities::Column::UserId.eq(id))
            .exec(&txn)
            .await
            .context("Failed to delete user favorites")?;
        SearchHistories::delete_many()
            .filter(search_histories::Column::UserId.eq(id))
            .exec(&txn)
            .await
            .context("Failed to delete user search history")?;
        Users::delete_by_id(id)
            .exec(&txn)
            .await
            .context("Failed to delete user")?;

        txn.commit().await?;
        Ok(true)
    }
}

/// Hash a password using Argon2id with the configured cost parameters.
/// CPU-heavy: call from `spawn_blocking`.
pub fn hash_password(password: &str, config: &SecurityConfig) -> Result<String> {
    let salt = generate_salt()?;

    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

fn generate_salt() -> Result<SaltString> {
    use rand::Rng;

    let bytes: [u8; 16] = rand::rng().random();
    SaltString::encode_b64(&bytes).map_err(|e| anyhow::anyhow!("Failed to encode salt: {e}"))
}

/// Checks a password against a PHC-formatted hash. The hash carries its own
/// parameters, so no config is needed here.
pub fn verify_password(password_hash: &str, password: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Runs [`hash_password`] on the blocking pool.
pub async fn hash_password_blocking(password: &str, config: &SecurityConfig) -> Result<String> {
    let password = password.to_string();
    let config = config.clone();

    task::spawn_blocking(move || hash_password(&password, &config))
        .await
        .context("Password hashing task panicked")?
}

/// Runs [`verify_password`] on the blocking pool.
pub async fn verify_password_blocking(password_hash: String, password: &str) -> Result<bool> {
    let password = password.to_string();

    task::spawn_blocking(move || verify_password(&password_hash, &password))
        .await
        .context("Password verification task panicked")?
}
