use crate::entities::prelude::*;
use crate::entities::{permissions, role_permissions, roles};
use crate::services::access_control::Permission;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

const ADMIN_ROLE_ID: i32 = 1;
const USER_ROLE_ID: i32 = 2;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Roles)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Permissions)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(RolePermissions)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Users)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(AccessTokens)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Seed the two built-in roles; only admin carries user-management permissions
        let now = chrono::Utc::now().to_rfc3339();

        let insert_roles = Query::insert()
            .into_table(Roles)
            .columns([
                roles::Column::Id,
                roles::Column::Name,
                roles::Column::GuardName,
                roles::Column::CreatedAt,
                roles::Column::UpdatedAt,
            ])
            .values_panic([
                ADMIN_ROLE_ID.into(),
                "admin".into(),
                crate::constants::auth::DEFAULT_GUARD.into(),
                now.clone().into(),
                now.clone().into(),
            ])
            .values_panic([
                USER_ROLE_ID.into(),
                "user".into(),
                crate::constants::auth::DEFAULT_GUARD.into(),
                now.clone().into(),
                now.into(),
            ])
            .to_owned();
        manager.exec_stmt(insert_roles).await?;

        let mut insert_permissions = Query::insert()
            .into_table(Permissions)
            .columns([permissions::Column::Id, permissions::Column::Name])
            .to_owned();
        let mut grant_admin = Query::insert()
            .into_table(RolePermissions)
            .columns([
                role_permissions::Column::RoleId,
                role_permissions::Column::PermissionId,
            ])
            .to_owned();

        for (idx, permission) in Permission::ALL.iter().enumerate() {
            let id = <i32 as TryFrom<_>>::try_from(idx + 1)
                .map_err(|e| DbErr::Custom(e.to_string()))?;
            insert_permissions.values_panic([id.into(), permission.as_str().into()]);
            grant_admin.values_panic([ADMIN_ROLE_ID.into(), id.into()]);
        }

        manager.exec_stmt(insert_permissions).await?;
        manager.exec_stmt(grant_admin).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AccessTokens).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RolePermissions).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Permissions).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Roles).to_owned())
            .await?;

        Ok(())
    }
}
