//! HTTP client for the remote classification endpoint.
//!
//! The classifier is an opaque remote service: one `POST <endpoint>/predict`
//! with the raw image bytes in a multipart `image` field, answered by a JSON
//! object describing the identified species. The response is treated as an
//! untyped payload and validated into [`Identification`] at this boundary.

use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A successful species identification returned by the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identification {
    /// Species or genus name.
    pub name: String,
    /// Short description of the species.
    pub desc: String,
    /// Where the species typically occurs.
    pub region: String,
    /// Safety classification (e.g. edible, toxic, unknown).
    pub edibility: String,
    /// Model confidence in the range 0.0..=1.0.
    pub confidence: f64,
}

/// Error type for classification requests.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The endpoint could not be reached at all.
    #[error("could not reach the classifier service: {0}")]
    Transport(#[source] reqwest::Error),

    /// The endpoint answered with a non-2xx status.
    #[error("the classifier rejected the request (HTTP {status})")]
    Status { status: StatusCode },

    /// The endpoint answered 2xx but the body was not a valid identification.
    #[error("the classifier returned an unexpected response: {0}")]
    MalformedResponse(String),
}

/// Client for the remote classification endpoint.
#[derive(Debug, Clone)]
pub struct Classifier {
    http: reqwest::Client,
    endpoint: String,
}

impl Classifier {
    /// Create a classifier client for the given base URL.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// The base URL this client submits to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submit raw image bytes for classification.
    ///
    /// Issues exactly one request; no retries are attempted. Any failure mode
    /// (transport, status, malformed body) is terminal for the attempt.
    pub async fn predict(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<Identification, ClassifyError> {
        let url = format!("{}/predict", self.endpoint.trim_end_matches('/'));
        log::debug!("submitting {} bytes to {}", bytes.len(), url);

        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("image", part);

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(ClassifyError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifyError::Status { status });
        }

        let body = response.text().await.map_err(ClassifyError::Transport)?;
        parse_identification(&body)
    }
}

/// Validate a raw response body into an [`Identification`].
fn parse_identification(body: &str) -> Result<Identification, ClassifyError> {
    let identification: Identification = serde_json::from_str(body)
        .map_err(|e| ClassifyError::MalformedResponse(e.to_string()))?;

    if !(0.0..=1.0).contains(&identification.confidence) {
        return Err(ClassifyError::MalformedResponse(format!(
            "confidence {} is outside 0.0..=1.0",
            identification.confidence
        )));
    }

    Ok(identification)
}
