pub mod access_control;
pub use access_control::{AccessControl, Permission};

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, IssuedToken, LoginResult};
pub use auth_service_impl::SeaOrmAuthService;

pub mod favorite_service;
pub mod favorite_service_impl;
pub use favorite_service::{FavoriteError, FavoriteService};
pub use favorite_service_impl::SeaOrmFavoriteService;

pub mod user_service;
pub mod user_service_impl;
pub use user_service::{AccountChanges, NewAccount, UserError, UserService};
pub use user_service_impl::SeaOrmUserService;

pub mod history;
pub use history::{HistoryJob, HistoryQueue, HistoryRecorder, RetryPolicy, SearchHistoryRetention};

pub mod weather_cache;
pub use weather_cache::{CacheStore, MemoryCacheStore, WeatherCache};

pub mod weather_service;
pub use weather_service::{WeatherError, WeatherService};
