//! Role/permission gate used by the routing layer.

use anyhow::Result;
use std::fmt;

use crate::db::Store;

/// User-management permissions granted through roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    UsersIndex,
    UsersCreate,
    UsersUpdate,
    UsersDestroy,
}

impl Permission {
    pub const ALL: [Self; 4] = [
        Self::UsersIndex,
        Self::UsersCreate,
        Self::UsersUpdate,
        Self::UsersDestroy,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UsersIndex => "users.index",
            Self::UsersCreate => "users.create",
            Self::UsersUpdate => "users.update",
            Self::UsersDestroy => "users.destroy",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
pub struct AccessControl {
    store: Store,
}

impl AccessControl {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// A user without a role, or with a role lacking the grant, is denied.
    pub async fn has_permission(&self, user_id: i32, permission: Permission) -> Result<bool> {
        let Some(user) = self.store.get_user(user_id).await? else {
            return Ok(false);
        };

        let Some(role_id) = user.role_id else {
            return Ok(false);
        };

        self.store
            .role_has_permission(role_id, permission.as_str())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_names() {
        let names: Vec<_> = Permission::ALL.iter().map(|p| p.as_str()).collect();
        assert_eq!(
            names,
            ["users.index", "users.create", "users.update", "users.destroy"]
        );
        assert_eq!(Permission::UsersUpdate.to_string(), "users.update");
    }
}
