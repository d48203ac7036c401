use std::sync::Arc;

use crate::{
    Config,
    fetch::JsonFetcher,
    provider::{
        nws::{ObservationFetcher, StationResolver},
        opendatasoft::Geocoder,
    },
};

pub mod nws;
pub mod opendatasoft;

/// The three upstream clients a lookup walks through, sharing one fetcher.
#[derive(Debug, Clone)]
pub struct Providers {
    pub geocoder: Geocoder,
    pub stations: StationResolver,
    pub observations: ObservationFetcher,
}

impl Providers {
    pub fn new(config: &Config, fetcher: Arc<dyn JsonFetcher>) -> Self {
        Self {
            geocoder: Geocoder::new(&config.geocoder_base_url, Arc::clone(&fetcher)),
            stations: StationResolver::new(&config.weather_base_url, Arc::clone(&fetcher)),
            observations: ObservationFetcher::new(&config.weather_base_url, fetcher),
        }
    }
}
