//! `SeaORM` implementation of the `UserService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::config::{BootstrapConfig, SecurityConfig};
use crate::db::repositories::user::hash_password_blocking;
use crate::db::{NewUser, Role, Store, User, UserChanges};
use crate::models::{ListOptions, Page};
use crate::services::user_service::{AccountChanges, NewAccount, UserError, UserService};

pub struct SeaOrmUserService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmUserService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    /// Creates the configured administrator unless an account with that
    /// email already exists.
    pub async fn ensure_bootstrap_admin(
        &self,
        bootstrap: &BootstrapConfig,
    ) -> Result<Option<User>, UserError> {
        if !bootstrap.enabled || self.store.email_exists(&bootstrap.admin_email).await? {
            return Ok(None);
        }

        let user = self
            .create(NewAccount {
                name: bootstrap.admin_name.clone(),
                email: bootstrap.admin_email.clone(),
                password: bootstrap.admin_password.clone(),
                role: "admin".to_string(),
            })
            .await?;

        info!(email = %user.email, "Bootstrap administrator created");
        Ok(Some(user))
    }

    async fn resolve_role(&self, name: &str) -> Result<Role, UserError> {
        self.store
            .get_role_by_name(name)
            .await?
            .ok_or_else(|| UserError::RoleNotFound(name.to_string()))
    }
}

#[async_trait]
impl UserService for SeaOrmUserService {
    async fn list(&self, current_user_id: i32, options: ListOptions) -> Result<Page<User>, UserError> {
        Ok(self
            .store
            .list_users_excluding(current_user_id, options)
            .await?)
    }

    async fn create(&self, account: NewAccount) -> Result<User, UserError> {
        if self.store.email_exists(&account.email).await? {
            return Err(UserError::EmailTaken);
        }
        let role = self.resolve_role(&account.role).await?;
        let password_hash = hash_password_blocking(&account.password, &self.security).await?;

        let user = self
            .store
            .create_user(NewUser {
                name: account.name,
                email: account.email,
                password_hash,
                role_id: Some(role.id),
            })
            .await?;

        info!(user_id = user.id, role = %role.name, "User created");
        Ok(user)
    }

    async fn update(&self, id: i32, changes: AccountChanges) -> Result<User, UserError> {
        let role_id = match changes.role.as_deref() {
            Some(name) => Some(self.resolve_role(name).await?.id),
            None => None,
        };

        let password_hash = match changes.password.as_deref() {
            Some(password) => Some(hash_password_blocking(password, &self.security).await?),
            None => None,
        };

        let user = self
            .store
            .update_user(
                id,
                UserChanges {
                    name: changes.name,
                    password_hash,
                    role_id,
                },
            )
            .await?
            .ok_or(UserError::NotFound)?;

        info!(user_id = user.id, "User updated");
        Ok(user)
    }

    async fn delete(&self, id: i32) -> Result<(), UserError> {
        if !self.store.delete_user(id).await? {
            return Err(UserError::NotFound);
        }

        info!(user_id = id, "User deleted");
        Ok(())
    }
}
