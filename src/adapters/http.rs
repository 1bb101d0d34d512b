use crate::domain::ports::OlympiadDataSource;
use crate::domain::record::OlympiadRecord;
use crate::utils::error::{CatalogError, SourceError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Remote data source backed by the catalog's REST endpoints.
#[derive(Debug, Clone)]
pub struct HttpDataSource {
    client: Client,
    base_url: String,
}

impl HttpDataSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn olympiads_url(&self) -> String {
        format!("{}/olympiads", self.base_url)
    }

    fn olympiad_url(&self, id: i64) -> String {
        format!("{}/olympiads/{}", self.base_url, id)
    }

    async fn failure_from(response: reqwest::Response) -> SourceError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = Some(body.trim().to_string()).filter(|m| !m.is_empty());
        SourceError::Status { status, message }
    }
}

#[async_trait]
impl OlympiadDataSource for HttpDataSource {
    async fn fetch_all(&self) -> Result<Vec<OlympiadRecord>, SourceError> {
        let url = self.olympiads_url();
        tracing::debug!("Making API request to: {}", url);

        let response = self.client.get(&url).send().await?;
        tracing::debug!("API response status: {}", response.status());

        if !response.status().is_success() {
            return Err(Self::failure_from(response).await);
        }

        let records: Vec<OlympiadRecord> = response.json().await?;
        Ok(records)
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Option<OlympiadRecord>, SourceError> {
        let url = self.olympiad_url(id);
        tracing::debug!("Making API request to: {}", url);

        let response = self.client.get(&url).send().await?;
        tracing::debug!("API response status: {}", response.status());

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::failure_from(response).await);
        }

        let record: OlympiadRecord = response.json().await?;
        Ok(Some(record))
    }
}
