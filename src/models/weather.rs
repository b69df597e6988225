use serde::{Deserialize, Serialize};

/// Normalized current-conditions snapshot for one city.
///
/// Only these fields survive from the provider payload; anything else the
/// provider sends is dropped during deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherSnapshot {
    pub location: SnapshotLocation,
    pub current: CurrentConditions,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapshotLocation {
    pub name: String,
    pub region: String,
    pub country: String,
    pub localtime: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentConditions {
    pub temp_c: f64,
    pub temp_f: f64,
    pub condition: Condition,
    pub wind_kph: f64,
    pub humidity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Condition {
    pub text: String,
}

impl WeatherSnapshot {
    #[must_use]
    pub fn country(&self) -> &str {
        &self.location.country
    }

    #[must_use]
    pub fn region(&self) -> &str {
        &self.location.region
    }
}
