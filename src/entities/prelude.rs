pub use super::access_tokens::Entity as AccessTokens;
pub use super::favorite_cities::Entity as FavoriteCities;
pub use super::permissions::Entity as Permissions;
pub use super::role_permissions::Entity as RolePermissions;
pub use super::roles::Entity as Roles;
pub use super::search_histories::Entity as SearchHistories;
pub use super::users::Entity as Users;
