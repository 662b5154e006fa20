//! HTTP client for a processing service exposing the `/process` route.

use crate::engine::{EngineArtifact, EngineRequest, ProcessingEngine};
use crate::error::EngineError;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use std::sync::Arc;

const PROCESS_ROUTE: &str = "/process";
const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// A [`ProcessingEngine`] that posts one multipart request per run: a `file`
/// part with the source bytes and an `operations` part with the JSON-encoded
/// descriptor list. The response body is taken as the artifact.
#[derive(Debug, Clone)]
pub struct HttpEngine {
    client: reqwest::Client,
    base_url: String,
}

impl HttpEngine {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Uses a caller-configured client (timeouts, proxies, TLS settings).
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, PROCESS_ROUTE)
    }
}

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        EngineError::Transport(err.to_string())
    }
}

#[async_trait]
impl ProcessingEngine for HttpEngine {
    async fn process(&self, request: EngineRequest) -> Result<EngineArtifact, EngineError> {
        let operations = request
            .operations_json()
            .map_err(|e| EngineError::Rejected(format!("could not encode operations: {}", e)))?;

        let file = Part::bytes(request.source.bytes.to_vec())
            .file_name(request.source.file_name.clone())
            .mime_str(&request.source.media_type)
            .map_err(|e| EngineError::Rejected(format!("invalid source media type: {}", e)))?;
        let form = Form::new().part("file", file).text("operations", operations);

        let response = self
            .client
            .post(self.endpoint())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(EngineError::Rejected(format!(
                "status {}: {}",
                status,
                detail.trim()
            )));
        }

        let media_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(FALLBACK_MEDIA_TYPE)
            .to_string();
        let bytes = response.bytes().await?;

        Ok(EngineArtifact {
            bytes: Arc::from(bytes.as_ref()),
            media_type,
        })
    }
}
