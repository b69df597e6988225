pub mod weatherapi;

pub use weatherapi::{GatewayError, WeatherApiClient, WeatherGateway};
