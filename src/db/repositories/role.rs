use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QuerySelect, RelationTrait,
};

use crate::entities::{permissions, prelude::*, role_permissions, roles};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: i32,
    pub name: String,
    pub guard_name: String,
}

impl From<roles::Model> for Role {
    fn from(model: roles::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            guard_name: model.guard_name,
        }
    }
}

pub struct RoleRepository {
    conn: DatabaseConnection,
}

impl RoleRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<Role>> {
        let role = Roles::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query role by ID")?;

        Ok(role.map(Role::from))
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<Role>> {
        let role = Roles::find()
            .filter(roles::Column::Name.eq(name))
            .one(&self.conn)
            .await
            .context("Failed to query role by name")?;

        Ok(role.map(Role::from))
    }

    /// Whether the role has been granted the named permission.
    pub async fn has_permission(&self, role_id: i32, permission: &str) -> Result<bool> {
        let count = RolePermissions::find()
            .join(
                JoinType::InnerJoin,
                role_permissions::Relation::Permission.def(),
            )
            .filter(role_permissions::Column::RoleId.eq(role_id))
            .filter(permissions::Column::Name.eq(permission))
            .count(&self.conn)
            .await
            .context("Failed to check role permission")?;

        Ok(count > 0)
    }
}
