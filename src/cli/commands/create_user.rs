use crate::config::Config;
use crate::db::Store;
use crate::services::{NewAccount, SeaOrmUserService, UserError, UserService};

pub async fn cmd_create_user(
    config: &Config,
    name: &str,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let users = SeaOrmUserService::new(store, config.security.clone());

    let account = NewAccount {
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        role: role.to_string(),
    };

    match users.create(account).await {
        Ok(user) => {
            println!("✓ Created user {} <{}> (ID: {})", user.name, user.email, user.id);
            Ok(())
        }
        Err(UserError::EmailTaken) => {
            println!("A user with email {email} already exists.");
            Ok(())
        }
        Err(UserError::RoleNotFound(role)) => {
            println!("Unknown role: {role}");
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!("Failed to create user: {e}")),
    }
}
