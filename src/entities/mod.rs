pub mod prelude;

pub mod access_tokens;
pub mod favorite_cities;
pub mod permissions;
pub mod role_permissions;
pub mod roles;
pub mod search_histories;
pub mod users;
