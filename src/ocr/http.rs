// HTTP OCR backend.
//
// POSTs the image path to an OCR service endpoint and expects the same JSON
// object the process backend prints: recognized fields, optionally a `text`
// field, or an `error` field on failure.

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use super::traits::{OcrOutput, OcrService};

/// OCR backed by a remote HTTP service.
pub struct HttpOcr {
    client: Client,
    url: String,
}

impl HttpOcr {
    pub fn new(url: String) -> Self {
        Self {
            client: Client::new(),
            url,
        }
    }
}

#[derive(Serialize)]
struct OcrRequest<'a> {
    image_path: &'a str,
}

#[async_trait]
impl OcrService for HttpOcr {
    async fn extract(&self, image: &Path) -> Result<OcrOutput> {
        let image_path = image.to_string_lossy();

        let response = self
            .client
            .post(&self.url)
            .json(&OcrRequest {
                image_path: &image_path,
            })
            .send()
            .await
            .context("Failed to call OCR service")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("OCR service returned {}: {}", status, body);
        }

        let value: serde_json::Value = response
            .json()
            .await
            .context("Failed to parse OCR service response")?;

        debug!(image = %image_path, "OCR service responded");

        OcrOutput::from_value(value)
    }
}
