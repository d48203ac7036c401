use std::time::Duration;

use thiserror::Error;

/// Everything that can go wrong while turning a zip code into a reading.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Lookup did not complete within {after:?}")]
    LookupTimeout { after: Duration },

    #[error("Response from {url} is not valid JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not build request URL from '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A field was present but had the wrong shape.
    #[error("Malformed upstream response at '{path}': expected {expected}")]
    MalformedResponse { path: String, expected: &'static str },

    #[error("No location found for zip code '{zip}'")]
    NoRecords { zip: String },

    #[error("No observation station found near ({latitude}, {longitude})")]
    NoStation { latitude: f64, longitude: f64 },
}

impl LookupError {
    pub(crate) fn malformed(path: impl Into<String>, expected: &'static str) -> Self {
        LookupError::MalformedResponse { path: path.into(), expected }
    }

    /// True when the upstream services simply have nothing for this input,
    /// as opposed to the upstream call itself going wrong.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupError::NoRecords { .. } | LookupError::NoStation { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, LookupError::Timeout { .. } | LookupError::LookupTimeout { .. })
    }
}

pub type Result<T> = std::result::Result<T, LookupError>;
