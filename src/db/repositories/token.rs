use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use sha2::{Digest, Sha256};

use super::timestamp;
use crate::entities::{access_tokens, prelude::*};

pub struct TokenRepository {
    conn: DatabaseConnection,
}

impl TokenRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Creates a token for the user and returns its plaintext. Only the
    /// digest is persisted.
    pub async fn issue(&self, user_id: i32, name: &str) -> Result<String> {
        let token = generate_token();

        access_tokens::ActiveModel {
            user_id: Set(user_id),
            name: Set(name.to_string()),
            token_hash: Set(hash_token(&token)),
            last_used_at: Set(None),
            created_at: Set(timestamp()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert access token")?;

        Ok(token)
    }

    /// Resolves a plaintext token to its owner and stamps `last_used_at`.
    pub async fn authenticate(&self, token: &str) -> Result<Option<i32>> {
        let Some(row) = AccessTokens::find()
            .filter(access_tokens::Column::TokenHash.eq(hash_token(token)))
            .one(&self.conn)
            .await
            .context("Failed to query access token")?
        else {
            return Ok(None);
        };

        let user_id = row.user_id;
        let mut active: access_tokens::ActiveModel = row.into();
        active.last_used_at = Set(Some(timestamp()));
        active
            .update(&self.conn)
            .await
            .context("Failed to stamp access token")?;

        Ok(Some(user_id))
    }

    /// Returns `true` when a token was actually deleted.
    pub async fn revoke(&self, token: &str) -> Result<bool> {
        let result = AccessTokens::delete_many()
            .filter(access_tokens::Column::TokenHash.eq(hash_token(token)))
            .exec(&self.conn)
            .await
            .context("Failed to revoke access token")?;

        Ok(result.rows_affected > 0)
    }
}

/// Generate a random bearer token (64 character hex string)
#[must_use]
pub fn generate_token() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    hex::encode(bytes)
}

#[must_use]
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_is_hex() {
        let token = generate_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_token());
    }

    #[test]
    fn test_hash_token_is_stable() {
        assert_eq!(hash_token("abc"), hash_token("abc"));
        assert_eq!(
            hash_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_ne!(hash_token("abc"), hash_token("abd"));
    }
}
