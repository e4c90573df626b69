use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::{fmt::Debug, time::Duration};
use thiserror::Error;
use tracing::debug;

use crate::{
    config::ServiceConfig,
    model::{DateInput, PredictionRequest, PredictionResult, SeriesEntry},
};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Invalid prediction service URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Failed to set up the HTTP client: {0}")]
    ClientSetup(#[source] reqwest::Error),

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}: {body}")]
    Status { url: String, status: StatusCode, body: String },

    #[error("Failed to parse response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ServiceError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ServiceError::Transport { source, .. } if source.is_timeout())
    }
}

/// The remote prediction service.
#[async_trait]
pub trait PredictionService: Send + Sync + Debug {
    /// `POST /predict` for a single date.
    async fn predict(&self, date: &DateInput) -> Result<PredictionResult, ServiceError>;

    /// `GET /predictions`, the stored series used for charting.
    async fn series(&self) -> Result<Vec<SeriesEntry>, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct HttpPredictionService {
    base_url: Url,
    http: Client,
}

impl HttpPredictionService {
    pub fn from_config(config: &ServiceConfig) -> Result<Self, ServiceError> {
        Self::new(&config.base_url, config.timeout())
    }

    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let parsed = parse_base_url(base_url)?;

        let http = Client::builder().timeout(timeout).build().map_err(ServiceError::ClientSetup)?;

        Ok(Self { base_url: parsed, http })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path)
    }
}

#[async_trait]
impl PredictionService for HttpPredictionService {
    async fn predict(&self, date: &DateInput) -> Result<PredictionResult, ServiceError> {
        let url = self.endpoint("predict");
        debug!(%url, date = %date, "sending prediction request");

        let res = self
            .http
            .post(&url)
            .json(&PredictionRequest::from(date))
            .send()
            .await
            .map_err(|source| ServiceError::Transport { url: url.clone(), source })?;

        read_json(&url, res).await
    }

    async fn series(&self) -> Result<Vec<SeriesEntry>, ServiceError> {
        let url = self.endpoint("predictions");
        debug!(%url, "fetching prediction series");

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| ServiceError::Transport { url: url.clone(), source })?;

        read_json(&url, res).await
    }
}

/// Accepts only absolute `http`/`https` URLs.
pub fn parse_base_url(base_url: &str) -> Result<Url, ServiceError> {
    let parsed = Url::parse(base_url).map_err(|e| ServiceError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
        return Err(ServiceError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: "expected an http(s) origin".to_string(),
        });
    }

    Ok(parsed)
}

async fn read_json<T: DeserializeOwned>(
    url: &str,
    res: reqwest::Response,
) -> Result<T, ServiceError> {
    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|source| ServiceError::Transport { url: url.to_string(), source })?;

    if !status.is_success() {
        return Err(ServiceError::Status {
            url: url.to_string(),
            status,
            body: truncate_body(&body),
        });
    }

    serde_json::from_str(&body)
        .map_err(|source| ServiceError::Parse { url: url.to_string(), source })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
