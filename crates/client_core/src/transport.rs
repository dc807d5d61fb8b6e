//! Outbound calls to the prediction service.

use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{
    error::ApiError,
    protocol::{HealthStatus, PredictionRequest, PredictionResult},
};
use tracing::debug;

use crate::{config::Settings, error::SubmissionError};

#[async_trait]
pub trait PredictionTransport: Send + Sync {
    async fn predict(&self, request: &PredictionRequest)
        -> Result<PredictionResult, SubmissionError>;
    async fn health(&self) -> Result<HealthStatus, SubmissionError>;
}

pub struct HttpPredictionTransport {
    http: Client,
    predict_url: String,
    health_url: String,
}

impl HttpPredictionTransport {
    pub fn new(predict_url: impl Into<String>, health_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            predict_url: predict_url.into(),
            health_url: health_url.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.predict_url.clone(), settings.health_url())
    }

    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }
}

#[async_trait]
impl PredictionTransport for HttpPredictionTransport {
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResult, SubmissionError> {
        debug!(url = %self.predict_url, "posting prediction request");
        let res = self
            .http
            .post(&self.predict_url)
            .json(request)
            .send()
            .await
            .map_err(SubmissionError::Transport)?;
        let res = ensure_success(res).await?;
        res.json().await.map_err(SubmissionError::Decode)
    }

    async fn health(&self) -> Result<HealthStatus, SubmissionError> {
        let res = self
            .http
            .get(&self.health_url)
            .send()
            .await
            .map_err(SubmissionError::Transport)?;
        let res = ensure_success(res).await?;
        res.json().await.map_err(SubmissionError::Decode)
    }
}

async fn ensure_success(res: Response) -> Result<Response, SubmissionError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = res.text().await.unwrap_or_default();
    let detail = match serde_json::from_str::<ApiError>(&body) {
        Ok(api_error) => api_error.summary(),
        Err(_) if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string(),
        Err(_) => body,
    };
    Err(SubmissionError::Rejected {
        status: status.as_u16(),
        detail,
    })
}
