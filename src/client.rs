use crate::config::Config;
use crate::errors::ApiError;
use crate::models::{FilterSet, StatsSummary, TripRecord};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// Where trip data comes from.
#[async_trait]
pub trait TripSource: Send + Sync {
    async fn fetch_stats(&self) -> Result<StatsSummary, ApiError>;

    async fn fetch_trips(&self, filters: &FilterSet) -> Result<Vec<TripRecord>, ApiError>;

    async fn fetch_trip(&self, id: &str) -> Result<TripRecord, ApiError>;
}

/// [`TripSource`] backed by the trip HTTP API.
#[derive(Debug, Clone)]
pub struct HttpTripSource {
    client: Client,
    base_url: String,
}

impl HttpTripSource {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self::with_client(client, &config.api_base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        debug!(%url, "requesting");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl TripSource for HttpTripSource {
    async fn fetch_stats(&self) -> Result<StatsSummary, ApiError> {
        let url = self.endpoint(&["api", "stats"])?;
        self.get_json(url).await
    }

    async fn fetch_trips(&self, filters: &FilterSet) -> Result<Vec<TripRecord>, ApiError> {
        let mut url = self.endpoint(&["api", "trips"])?;
        let query = filters.query_string();
        if !query.is_empty() {
            url.set_query(Some(&query));
        }
        self.get_json(url).await
    }

    async fn fetch_trip(&self, id: &str) -> Result<TripRecord, ApiError> {
        let url = self.endpoint(&["api", "trips", id])?;
        self.get_json(url).await
    }
}
