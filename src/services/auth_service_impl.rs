//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::config::SecurityConfig;
use crate::constants::auth::{TOKEN_NAME, TOKEN_TYPE};
use crate::db::repositories::user::{hash_password_blocking, verify_password_blocking};
use crate::db::{NewUser, Store, User};
use crate::services::auth_service::{AuthError, AuthService, IssuedToken, LoginResult};

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    async fn issue(&self, user_id: i32) -> Result<IssuedToken, AuthError> {
        let access_token = self.store.issue_token(user_id, TOKEN_NAME).await?;
        Ok(IssuedToken {
            access_token,
            token_type: TOKEN_TYPE,
        })
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<IssuedToken, AuthError> {
        if self.store.email_exists(email).await? {
            return Err(AuthError::EmailTaken);
        }

        let role = self
            .store
            .get_role_by_name(&self.security.default_role)
            .await?
            .ok_or_else(|| AuthError::RoleNotFound(self.security.default_role.clone()))?;

        let password_hash = hash_password_blocking(password, &self.security).await?;

        let user = self
            .store
            .create_user(NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
                role_id: Some(role.id),
            })
            .await?;

        info!(user_id = user.id, role = %role.name, "User registered");

        self.issue(user.id).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AuthError> {
        let Some((user, password_hash)) = self.store.get_user_by_email_with_password(email).await?
        else {
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password_blocking(password_hash, password).await? {
            return Err(AuthError::InvalidCredentials);
        }

        let role = match user.role_id {
            Some(role_id) => self.store.get_role(role_id).await?,
            None => None,
        };

        let token = self.issue(user.id).await?;

        Ok(LoginResult { token, user, role })
    }

    async fn logout(&self, token: &str) -> Result<(), AuthError> {
        self.store.revoke_token(token).await?;
        Ok(())
    }

    async fn authenticate(&self, token: &str) -> Result<Option<User>, AuthError> {
        let Some(user_id) = self.store.authenticate_token(token).await? else {
            return Ok(None);
        };

        Ok(self.store.get_user(user_id).await?)
    }
}
