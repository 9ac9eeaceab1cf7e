//! Record source backed by a Google Apps Script web app

use super::protocol::{ScriptRequest, ScriptResponse};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use votegate_application::{RecordSource, RecordSourceError};
use votegate_domain::{ApplicationRecord, RecordStatus, RowId};

/// Errors creating the adapter
#[derive(Error, Debug)]
pub enum AppsScriptError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// HTTP client for the application sheet's web app
pub struct AppsScriptRecordSource {
    client: reqwest::Client,
    url: String,
    secret: String,
}

impl AppsScriptRecordSource {
    pub fn new(
        url: impl Into<String>,
        secret: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AppsScriptError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("votegate/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
            secret: secret.into(),
        })
    }

    async fn call(&self, request: &ScriptRequest<'_>) -> Result<ScriptResponse, RecordSourceError> {
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| RecordSourceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RecordSourceError::Transport(format!(
                "HTTP error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RecordSourceError::Transport(format!("Failed to read response body: {}", e)))?;

        serde_json::from_str(&body).map_err(|e| {
            debug!("Undecodable record source body: {}", body);
            RecordSourceError::Malformed(e.to_string())
        })
    }
}

#[async_trait]
impl RecordSource for AppsScriptRecordSource {
    async fn fetch_next(&self) -> Result<Option<ApplicationRecord>, RecordSourceError> {
        let request = ScriptRequest::Next {
            token: &self.secret,
        };
        self.call(&request).await?.into_result()
    }

    async fn report_status(
        &self,
        row: RowId,
        status: RecordStatus,
    ) -> Result<(), RecordSourceError> {
        let request = ScriptRequest::Report {
            token: &self.secret,
            row,
            decision: status,
        };
        self.call(&request).await?.into_result()?;
        debug!(row = %row, %status, "Record source acknowledged status");
        Ok(())
    }
}
