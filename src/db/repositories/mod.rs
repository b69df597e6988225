pub mod favorite_city;
pub mod role;
pub mod search_history;
pub mod token;
pub mod user;

use crate::models::SortDirection;
use sea_orm::Order;

/// RFC 3339 with fixed microsecond precision so stored timestamps sort
/// lexically in creation order.
pub(crate) fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

pub(crate) const fn order(direction: SortDirection) -> Order {
    match direction {
        SortDirection::Asc => Order::Asc,
        SortDirection::Desc => Order::Desc,
    }
}
