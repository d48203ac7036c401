use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::{
    error::{LookupError, Result},
    extract,
    fetch::{JsonFetcher, endpoint},
    model::Location,
};

const SEARCH_PATH: &str = "api/records/1.0/search/";
const DATASET: &str = "us-zip-code-latitude-and-longitude";

/// Resolves a zip code through the OpenDataSoft zip code dataset.
#[derive(Debug, Clone)]
pub struct Geocoder {
    base_url: String,
    fetcher: Arc<dyn JsonFetcher>,
}

impl Geocoder {
    pub fn new(base_url: impl Into<String>, fetcher: Arc<dyn JsonFetcher>) -> Self {
        Self { base_url: base_url.into(), fetcher }
    }

    pub async fn resolve(&self, zip: &str) -> Result<Location> {
        let mut url = endpoint(&self.base_url, SEARCH_PATH)?;
        url.query_pairs_mut().append_pair("dataset", DATASET).append_pair("q", zip);

        let body = self.fetcher.fetch(&url).await?;
        let location = location_from_search(zip, &body)?;

        debug!(
            zip,
            city = %location.city,
            state = %location.state,
            lat = location.latitude,
            lon = location.longitude,
            "geocoded zip code"
        );
        Ok(location)
    }
}

/// Pull a [`Location`] out of the first record of a dataset search response.
pub fn location_from_search(zip: &str, body: &Value) -> Result<Location> {
    let root = extract::as_object(body, "")?;

    let first = extract::array(root, "", "records")?
        .and_then(|records| records.first())
        .ok_or_else(|| LookupError::NoRecords { zip: zip.to_string() })?;
    let record = extract::as_object(first, "records[0]")?;

    let mut loc = Location::default();

    let Some(fields) = extract::object(record, "records[0]", "fields")? else {
        return Ok(loc);
    };
    let path = "records[0].fields";

    if let Some(city) = extract::string(fields, path, "city")? {
        loc.city = city;
    }
    if let Some(state) = extract::string(fields, path, "state")? {
        loc.state = state;
    }
    if let Some(zip) = extract::string(fields, path, "zip")? {
        loc.zip = zip;
    }
    if let Some(lat) = extract::number(fields, path, "latitude")? {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(LookupError::malformed(
                "records[0].fields.latitude",
                "a latitude within [-90, 90]",
            ));
        }
        loc.latitude = lat;
    }
    if let Some(lon) = extract::number(fields, path, "longitude")? {
        if !(-180.0..=180.0).contains(&lon) {
            return Err(LookupError::malformed(
                "records[0].fields.longitude",
                "a longitude within [-180, 180]",
            ));
        }
        loc.longitude = lon;
    }

    Ok(loc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_first_record_fields() {
        let body = json!({
            "nhits": 2,
            "records": [
                {"fields": {"city": "Washington", "state": "DC", "zip": "20500",
                            "latitude": 38.9, "longitude": -77.03, "timezone": -5}},
                {"fields": {"city": "Elsewhere", "state": "VA", "zip": "20501",
                            "latitude": 1.0, "longitude": 1.0}}
            ]
        });

        let loc = location_from_search("20500", &body).unwrap();
        assert_eq!(
            loc,
            Location {
                city: "Washington".into(),
                state: "DC".into(),
                zip: "20500".into(),
                latitude: 38.9,
                longitude: -77.03,
            }
        );
    }

    #[test]
    fn missing_fields_keep_zero_values() {
        let body = json!({"records": [{"fields": {"zip": "99999", "city": "Nowhere"}}]});
        let loc = location_from_search("99999", &body).unwrap();
        assert_eq!(loc.zip, "99999");
        assert_eq!(loc.city, "Nowhere");
        assert_eq!(loc.state, "");
        assert_eq!(loc.latitude, 0.0);
    }

    #[test]
    fn record_without_fields_is_default_location() {
        let body = json!({"records": [{"recordid": "abc"}]});
        assert_eq!(location_from_search("1", &body).unwrap(), Location::default());
    }

    #[test]
    fn empty_records_is_no_records() {
        let err = location_from_search("00000", &json!({"records": []})).unwrap_err();
        assert!(matches!(err, LookupError::NoRecords { ref zip } if zip == "00000"));
    }

    #[test]
    fn absent_records_is_no_records() {
        let err = location_from_search("00000", &json!({"error": "Unknown dataset"})).unwrap_err();
        assert!(matches!(err, LookupError::NoRecords { .. }));
    }

    #[test]
    fn string_latitude_is_malformed() {
        let body = json!({"records": [{"fields": {"latitude": "38.9"}}]});
        let err = location_from_search("20500", &body).unwrap_err();
        assert!(
            matches!(err, LookupError::MalformedResponse { ref path, .. } if path == "records[0].fields.latitude")
        );
    }

    #[test]
    fn out_of_range_coordinates_are_malformed() {
        let body = json!({"records": [{"fields": {"latitude": 91.0, "longitude": 0.0}}]});
        assert!(location_from_search("1", &body).is_err());

        let body = json!({"records": [{"fields": {"latitude": 0.0, "longitude": -180.5}}]});
        assert!(location_from_search("1", &body).is_err());
    }

    #[test]
    fn non_object_shapes_are_malformed() {
        assert!(matches!(
            location_from_search("1", &Value::Null).unwrap_err(),
            LookupError::MalformedResponse { .. }
        ));
        assert!(matches!(
            location_from_search("1", &json!({"records": "none"})).unwrap_err(),
            LookupError::MalformedResponse { .. }
        ));
        assert!(matches!(
            location_from_search("1", &json!({"records": [42]})).unwrap_err(),
            LookupError::MalformedResponse { .. }
        ));
        assert!(matches!(
            location_from_search("1", &json!({"records": [{"fields": []}]})).unwrap_err(),
            LookupError::MalformedResponse { .. }
        ));
    }
}
