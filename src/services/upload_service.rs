use async_trait::async_trait;
use serde::Deserialize;

use crate::config;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Upload request failed: {0}")]
    Transport(String),
    #[error("Asset host rejected upload: {0}")]
    Rejected(String),
}

/// Contract for the external asset host. Given binary image content and a
/// destination folder (plus optional bounding dimensions), the host returns
/// a public reference URL.
#[async_trait]
pub trait ImageStorage: Send + Sync {
    async fn upload_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        folder: &str,
        max_width: Option<u32>,
        max_height: Option<u32>,
    ) -> Result<String, UploadError>;
}

/// Cloudinary-style unsigned upload client. Posts the image as multipart
/// form data to `<base>/image/upload` and reads back the hosted URL.
pub struct CloudinaryClient {
    http: reqwest::Client,
    base_url: String,
    upload_preset: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

impl CloudinaryClient {
    pub fn from_config() -> Self {
        let storage = &config::config().storage;
        Self {
            http: reqwest::Client::new(),
            base_url: storage.upload_base_url.clone(),
            upload_preset: storage.upload_preset.clone(),
        }
    }
}

#[async_trait]
impl ImageStorage for CloudinaryClient {
    async fn upload_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        folder: &str,
        max_width: Option<u32>,
        max_height: Option<u32>,
    ) -> Result<String, UploadError> {
        let file_part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());

        let mut form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("upload_preset", self.upload_preset.clone())
            .text("folder", folder.to_string());

        // The host applies a bounding-box transformation when dimensions are given.
        if let (Some(w), Some(h)) = (max_width, max_height) {
            form = form.text("transformation", format!("c_limit,w_{},h_{}", w, h));
        }

        let url = format!("{}/image/upload", self.base_url);
        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Asset upload failed ({}): {}", status, body);
            return Err(UploadError::Rejected(format!("{}", status)));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        Ok(uploaded.secure_url)
    }
}
