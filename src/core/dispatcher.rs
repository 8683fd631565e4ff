//! Action dispatcher: user commands sent to the engine
//!
//! Commands bypass the polling loop. Whatever they change on the engine side
//! shows up in a later snapshot; the dispatcher never touches the view-model.

use std::path::Path;
use reqwest::multipart::{Form, Part};
use tokio::task::JoinHandle;

use crate::types::EngineError;

/// Sends upload and reset commands
#[derive(Debug, Clone)]
pub struct ActionDispatcher {
    http: reqwest::Client,
    upload_url: String,
    reset_url: String,
}

impl ActionDispatcher {
    pub fn new(http: reqwest::Client, upload_url: impl Into<String>, reset_url: impl Into<String>) -> Self {
        Self {
            http,
            upload_url: upload_url.into(),
            reset_url: reset_url.into(),
        }
    }

    /// Upload a video file as multipart field `file`
    pub async fn upload_video(&self, path: &Path) -> Result<(), EngineError> {
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.bin".to_string());
        tracing::info!("uploading {} ({} bytes)", file_name, data.len());

        let form = Form::new().part("file", Part::bytes(data).file_name(file_name));
        let response = self
            .http
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| EngineError::command("upload", e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::command("upload", format!("HTTP {}", status)));
        }
        Ok(())
    }

    /// Ask the engine to switch back to its camera
    pub async fn send_reset(&self) -> Result<(), EngineError> {
        let response = self
            .http
            .post(&self.reset_url)
            .send()
            .await
            .map_err(|e| EngineError::command("reset_camera", e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::command("reset_camera", format!("HTTP {}", status)));
        }
        Ok(())
    }

    /// Fire-and-forget reset; failures are only logged
    pub fn reset_camera(&self) -> JoinHandle<()> {
        let dispatcher = self.clone();
        tokio::spawn(async move {
            match dispatcher.send_reset().await {
                Ok(()) => tracing::info!("camera reset requested"),
                Err(e) => tracing::warn!("[{}] {}", e.code(), e),
            }
        })
    }
}
