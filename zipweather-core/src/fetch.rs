use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    Config,
    error::{LookupError, Result},
};

/// Source of untyped JSON documents.
///
/// Every upstream call goes through this, so tests can swap the network out.
#[async_trait]
pub trait JsonFetcher: Send + Sync + Debug {
    async fn fetch(&self, url: &Url) -> Result<Value>;
}

/// [`JsonFetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpJsonFetcher {
    http: Client,
}

impl HttpJsonFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(LookupError::Client)?;

        Ok(Self { http })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.user_agent, config.request_timeout())
    }
}

#[async_trait]
impl JsonFetcher for HttpJsonFetcher {
    async fn fetch(&self, url: &Url) -> Result<Value> {
        debug!(%url, "GET");

        let res = self.http.get(url.clone()).send().await.map_err(|e| transport_error(url, e))?;

        // Error statuses from these APIs still carry a JSON body; extraction decides.
        let status = res.status();
        if !status.is_success() {
            warn!(%url, %status, "upstream returned non-success status");
        }

        let body = res.bytes().await.map_err(|e| transport_error(url, e))?;

        serde_json::from_slice(&body).map_err(|source| {
            warn!(%url, error = %source, "could not decode upstream JSON");
            LookupError::Decode { url: url.to_string(), source }
        })
    }
}

fn transport_error(url: &Url, source: reqwest::Error) -> LookupError {
    if source.is_timeout() {
        warn!(%url, "upstream request timed out");
        LookupError::Timeout { url: url.to_string() }
    } else {
        warn!(%url, error = %source, "upstream request failed");
        LookupError::Transport { url: url.to_string(), source }
    }
}

/// Join `path` onto `base`, keeping any path prefix `base` already has.
pub(crate) fn endpoint(base: &str, path: &str) -> Result<Url> {
    let joined = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
    Url::parse(&joined).map_err(|source| LookupError::InvalidUrl { url: joined, source })
}
