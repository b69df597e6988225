pub mod page;
pub mod weather;

pub use page::{ListOptions, Page, SortDirection};
pub use weather::{Condition, CurrentConditions, SnapshotLocation, WeatherSnapshot};
