use chrono::{DateTime, Utc};
use serde::Serialize;

/// A US location as reported by the geocoding dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Location {
    pub city: String,
    pub state: String,
    pub zip: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Latest reading from an observation station.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observation {
    pub station: String,
    /// Degrees Celsius; 0 when the station did not report one.
    pub temperature: f64,
    pub observed_at: Option<DateTime<Utc>>,
}

impl Observation {
    pub fn new(station: impl Into<String>) -> Self {
        Self { station: station.into(), ..Default::default() }
    }
}

/// What a page shows for a single zip code lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookupResult {
    pub zip_code: String,
    pub city: String,
    pub state: String,
    pub temperature: f64,
    pub station: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<DateTime<Utc>>,
}

impl LookupResult {
    pub fn new(location: Location, observation: Observation) -> Self {
        Self {
            zip_code: location.zip,
            city: location.city,
            state: location.state,
            temperature: observation.temperature,
            station: observation.station,
            observed_at: observation.observed_at,
        }
    }

    pub fn temperature_fahrenheit(&self) -> f64 {
        self.temperature * 9.0 / 5.0 + 32.0
    }
}
