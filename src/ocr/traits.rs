// OCR service trait: the boundary to whatever reads package photos.
//
// Text recognition itself is an external service. This trait is the one
// seam the lookup pipeline talks to; the process and HTTP backends are
// interchangeable behind it.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

/// Fields recognized in one image.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OcrOutput {
    /// Every field the service returned, as-is
    pub fields: BTreeMap<String, serde_json::Value>,
    /// Recognized text used for keyword extraction
    pub text: String,
}

impl OcrOutput {
    /// Build from a JSON object returned by an OCR service.
    ///
    /// The recognized text comes from `text`, then `raw_text`, and otherwise
    /// from every string field joined in key order. An object carrying an
    /// `error` key is a failure.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let serde_json::Value::Object(map) = value else {
            anyhow::bail!("OCR output is not a JSON object");
        };

        if let Some(error) = map.get("error") {
            let message = error.as_str().map(str::to_string).unwrap_or_else(|| error.to_string());
            anyhow::bail!("OCR service reported an error: {message}");
        }

        let fields: BTreeMap<String, serde_json::Value> = map.into_iter().collect();

        let text = ["text", "raw_text"]
            .iter()
            .find_map(|key| fields.get(*key).and_then(|v| v.as_str()))
            .map(str::to_string)
            .unwrap_or_else(|| {
                fields
                    .values()
                    .filter_map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            });

        Ok(Self { fields, text })
    }
}

/// Trait for reading text from a package photo. Async because every real
/// backend waits on another process or a network call.
#[async_trait]
pub trait OcrService: Send + Sync {
    /// Recognize text in one image.
    async fn extract(&self, image: &Path) -> Result<OcrOutput>;
}
