// src/ai/upload_client.rs
use async_trait::async_trait;
use log::{error, info, warn};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use std::time::Duration;

use super::connector::DishExtractor;
use super::dish::{normalize_response, DishList};
use crate::capture::ImageRef;
use crate::error::ProcessingError;

pub const EXTRACT_PATH: &str = "/extract-dishes";

//Client for the menu recognition service
pub struct UploadClient {
    base_url: String,
    client: Client,
}

impl UploadClient {
    /// No request timeout is set; the upload waits as long as the transport does.
    pub fn new(base_url: &str) -> Result<Self, ProcessingError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        info!("Recognition service at {}", base_url);

        let client = Client::builder().build()?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, EXTRACT_PATH)
    }

    /// Reachability check. Any HTTP answer counts, even an error status.
    pub async fn check_service(&self) -> Result<StatusCode, ProcessingError> {
        let response = self
            .client
            .get(&self.base_url)
            .timeout(Duration::from_secs(10))
            .send()
            .await?;
        if !response.status().is_success() {
            warn!("Recognition service responded with status: {}", response.status());
        }
        Ok(response.status())
    }

    async fn build_form(image: &ImageRef) -> Result<Form, ProcessingError> {
        let bytes = image.read_bytes().await?;
        let part = Part::bytes(bytes)
            .file_name(ImageRef::FILE_NAME)
            .mime_str(ImageRef::MIME_TYPE)?;
        Ok(Form::new().part("file", part))
    }
}

#[async_trait]
impl DishExtractor for UploadClient {
    async fn submit(&self, image: &ImageRef) -> Result<DishList, ProcessingError> {
        let form = Self::build_form(image).await?;
        let url = self.endpoint();

        info!("Uploading {} to {}", image.uri(), url);

        let response = self.client.post(&url).multipart(form).send().await.map_err(|e| {
            error!("Upload to {} failed: {}", url, e);
            ProcessingError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            error!("Recognition service returned {}: {}", status, detail);
            return Err(ProcessingError::request_failed(format!("HTTP {}", status)));
        }

        let body = response.bytes().await?;
        let data: serde_json::Value = serde_json::from_slice(&body)?;
        let dishes = normalize_response(&data);

        info!("Recognition service found {} dish(es)", dishes.len());
        Ok(dishes)
    }
}
