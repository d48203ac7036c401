//! api.weather.gov: nearest station for a point, latest observation for a station.
//!
//! - `/points/{lat},{lon}/stations` returns `.observationStations`, a list of
//!   station URLs ordered nearest first.
//! - `/stations/{id}/observations/latest` returns
//!   `.properties.temperature.{unitCode,value}` (value in Celsius, may be null)
//!   and `.properties.timestamp`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    error::{LookupError, Result},
    extract,
    fetch::{JsonFetcher, endpoint},
    model::Observation,
};

/// Station identifiers are the trailing characters of the station URL.
pub const STATION_CODE_LEN: usize = 4;

#[derive(Debug, Clone)]
pub struct StationResolver {
    base_url: String,
    fetcher: Arc<dyn JsonFetcher>,
}

impl StationResolver {
    pub fn new(base_url: impl Into<String>, fetcher: Arc<dyn JsonFetcher>) -> Self {
        Self { base_url: base_url.into(), fetcher }
    }

    /// Identifier of the station nearest to the point, or an empty string
    /// when the service lists none.
    pub async fn resolve(&self, latitude: f64, longitude: f64) -> Result<String> {
        let url = endpoint(&self.base_url, &format!("points/{latitude},{longitude}/stations"))?;
        let body = self.fetcher.fetch(&url).await?;
        let station = nearest_station(&body)?;

        debug!(latitude, longitude, %station, "resolved nearest station");
        Ok(station)
    }
}

/// Take the first entry of `observationStations` and cut its station code.
pub fn nearest_station(body: &Value) -> Result<String> {
    let root = extract::as_object(body, "")?;

    let Some(first) = extract::array(root, "", "observationStations")?.and_then(|s| s.first())
    else {
        return Ok(String::new());
    };

    let station_url = first
        .as_str()
        .ok_or_else(|| LookupError::malformed("observationStations[0]", "a string"))?;

    station_code(station_url)
        .map(str::to_string)
        .ok_or_else(|| {
            LookupError::malformed("observationStations[0]", "a station URL ending in a station code")
        })
}

/// The last [`STATION_CODE_LEN`] characters of a station URL.
pub fn station_code(station_url: &str) -> Option<&str> {
    let (start, _) = station_url.char_indices().rev().nth(STATION_CODE_LEN - 1)?;
    Some(&station_url[start..])
}

#[derive(Debug, Clone)]
pub struct ObservationFetcher {
    base_url: String,
    fetcher: Arc<dyn JsonFetcher>,
}

impl ObservationFetcher {
    pub fn new(base_url: impl Into<String>, fetcher: Arc<dyn JsonFetcher>) -> Self {
        Self { base_url: base_url.into(), fetcher }
    }

    pub async fn resolve(&self, station: &str) -> Result<Observation> {
        let url = endpoint(&self.base_url, &format!("stations/{station}/observations/latest"))?;
        let body = self.fetcher.fetch(&url).await?;
        let observation = latest_observation(station, &body)?;

        debug!(
            station,
            temperature = observation.temperature,
            observed_at = ?observation.observed_at,
            "fetched latest observation"
        );
        Ok(observation)
    }
}

/// Read `properties.temperature.value` and `properties.timestamp`.
///
/// Missing pieces leave the defaults in place (0 degrees, no timestamp).
/// Only the temperature path can fail the observation.
pub fn latest_observation(station: &str, body: &Value) -> Result<Observation> {
    let mut obs = Observation::new(station);

    let root = extract::as_object(body, "")?;
    let Some(props) = extract::object(root, "", "properties")? else {
        return Ok(obs);
    };

    if let Some(temperature) = extract::object(props, "properties", "temperature")? {
        if let Some(value) =
            extract::nullable_number(temperature, "properties.temperature", "value")?
        {
            obs.temperature = value;
        }
    }

    obs.observed_at = observation_time(props.get("timestamp"));

    Ok(obs)
}

/// `properties.timestamp` is informational: anything but an RFC 3339 string is dropped.
fn observation_time(value: Option<&Value>) -> Option<DateTime<Utc>> {
    match value? {
        Value::Null => None,
        Value::String(ts) => match DateTime::parse_from_rfc3339(ts) {
            Ok(parsed) => Some(parsed.with_timezone(&Utc)),
            Err(e) => {
                warn!(timestamp = %ts, error = %e, "ignoring unparseable observation timestamp");
                None
            }
        },
        other => {
            warn!(timestamp = %other, "ignoring non-string observation timestamp");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn station_code_is_trailing_four_chars() {
        assert_eq!(station_code("https://api.weather.gov/stations/KDCA"), Some("KDCA"));
        assert_eq!(station_code("KBOS"), Some("KBOS"));
        assert_eq!(station_code("BOS"), None);
        assert_eq!(station_code(""), None);
    }

    #[test]
    fn station_code_is_idempotent() {
        let url = "https://api.weather.gov/stations/KJFK";
        let once = station_code(url).unwrap();
        assert_eq!(station_code(url), Some(once));
        assert_eq!(station_code(once), Some(once));
    }

    #[test]
    fn station_code_counts_characters_not_bytes() {
        assert_eq!(station_code("stations/ÅBCD"), Some("ÅBCD"));
    }

    #[test]
    fn nearest_station_takes_the_first_entry() {
        let body = json!({"observationStations": [
            "https://api.weather.gov/stations/KDCA",
            "https://api.weather.gov/stations/KADW"
        ]});
        assert_eq!(nearest_station(&body).unwrap(), "KDCA");
    }

    #[test]
    fn empty_station_list_is_empty_string() {
        assert_eq!(nearest_station(&json!({"observationStations": []})).unwrap(), "");
    }

    #[test]
    fn missing_station_list_is_empty_string() {
        // Shape of api.weather.gov's problem document for points outside coverage.
        let body = json!({"title": "Data Unavailable For Requested Point", "status": 404});
        assert_eq!(nearest_station(&body).unwrap(), "");
    }

    #[test]
    fn short_or_non_string_station_is_malformed() {
        assert!(nearest_station(&json!({"observationStations": ["abc"]})).is_err());
        assert!(nearest_station(&json!({"observationStations": [7]})).is_err());
        assert!(nearest_station(&json!({"observationStations": "KDCA"})).is_err());
    }

    #[test]
    fn reads_temperature_and_timestamp() {
        let body = json!({"properties": {
            "timestamp": "2024-05-01T14:52:00+00:00",
            "temperature": {"unitCode": "wmoUnit:degC", "value": 21.1}
        }});

        let obs = latest_observation("KDCA", &body).unwrap();
        assert_eq!(obs.station, "KDCA");
        assert_eq!(obs.temperature, 21.1);
        assert_eq!(obs.observed_at, Some(Utc.with_ymd_and_hms(2024, 5, 1, 14, 52, 0).unwrap()));
    }

    #[test]
    fn absent_temperature_defaults_to_zero() {
        for body in [
            json!({}),
            json!({"properties": {}}),
            json!({"properties": {"temperature": {}}}),
            json!({"properties": {"temperature": {"value": null}}}),
        ] {
            let obs = latest_observation("KBOS", &body).unwrap();
            assert_eq!(obs.temperature, 0.0, "body: {body}");
            assert_eq!(obs.station, "KBOS");
        }
    }

    #[test]
    fn bad_timestamp_does_not_lose_the_reading() {
        for ts in [json!(null), json!("2024-05-01 14:52:00"), json!("yesterday"), json!(1714575120)] {
            let body = json!({"properties": {"timestamp": ts.clone(), "temperature": {"value": 21.1}}});

            let obs = latest_observation("KDCA", &body).unwrap();
            assert_eq!(obs.temperature, 21.1, "timestamp: {ts}");
            assert_eq!(obs.station, "KDCA");
            assert!(obs.observed_at.is_none());
        }
    }

    #[test]
    fn wrong_shapes_are_malformed() {
        for body in [
            json!([]),
            json!({"properties": "x"}),
            json!({"properties": {"temperature": 21.1}}),
            json!({"properties": {"temperature": {"value": "21.1"}}}),
        ] {
            let err = latest_observation("KBOS", &body).unwrap_err();
            assert!(matches!(err, LookupError::MalformedResponse { .. }), "body: {body}");
        }
    }
}
