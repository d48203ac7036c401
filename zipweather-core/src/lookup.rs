use std::{sync::Arc, time::Duration};

use tracing::{info, instrument};

use crate::{
    Config,
    error::{LookupError, Result},
    fetch::{HttpJsonFetcher, JsonFetcher},
    model::LookupResult,
    provider::Providers,
};

/// Zip code in, latest temperature out.
///
/// Holds no per-lookup state; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct LookupService {
    providers: Providers,
    timeout: Duration,
}

impl LookupService {
    pub fn new(config: &Config, fetcher: Arc<dyn JsonFetcher>) -> Self {
        Self { providers: Providers::new(config, fetcher), timeout: config.lookup_timeout() }
    }

    /// Service talking to the real upstream APIs described by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = HttpJsonFetcher::from_config(config)?;
        Ok(Self::new(config, Arc::new(fetcher)))
    }

    /// Geocode, find the nearest station, read its latest observation.
    ///
    /// Bounded by the configured lookup timeout; dropping the returned future
    /// abandons whichever upstream request is in flight.
    #[instrument(skip(self))]
    pub async fn lookup(&self, zip: &str) -> Result<LookupResult> {
        let result = tokio::time::timeout(self.timeout, self.run(zip))
            .await
            .map_err(|_| LookupError::LookupTimeout { after: self.timeout })??;

        info!(
            zip = %result.zip_code,
            station = %result.station,
            temperature = result.temperature,
            "lookup complete"
        );
        Ok(result)
    }

    async fn run(&self, zip: &str) -> Result<LookupResult> {
        let location = self.providers.geocoder.resolve(zip).await?;

        let station =
            self.providers.stations.resolve(location.latitude, location.longitude).await?;
        if station.is_empty() {
            return Err(LookupError::NoStation {
                latitude: location.latitude,
                longitude: location.longitude,
            });
        }

        let observation = self.providers.observations.resolve(&station).await?;

        Ok(LookupResult::new(location, observation))
    }
}
