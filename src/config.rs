use std::env;
use std::path::PathBuf;

use anyhow::Result;

use crate::matching::selector::DEFAULT_THRESHOLD;

/// Which OCR backend to use.
#[derive(Debug, Clone, PartialEq)]
pub enum OcrBackend {
    /// Run a local OCR command (default)
    Process,
    /// Call a remote OCR service: requires SALTMATCH_OCR_URL
    Http,
}

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Nothing
/// here is global: the binary builds one Config and passes it down.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON array of branded medicines
    pub medicines_path: PathBuf,
    /// JSON array of generic candidates
    pub generics_path: PathBuf,
    /// Which OCR backend `scan` uses (default: Process)
    pub ocr_backend: OcrBackend,
    /// Command line for the process backend; the image path is appended
    pub ocr_command: String,
    /// Endpoint for the HTTP backend
    pub ocr_url: String,
    /// Acceptance threshold for reporting a match as confident
    pub threshold: f64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every setting has a default; validation happens in the `require_*`
    /// methods, right before a command needs the setting.
    pub fn load() -> Result<Self> {
        let ocr_backend = match env::var("SALTMATCH_OCR").as_deref() {
            Ok("http") => OcrBackend::Http,
            // "process" or unset both default to the local command
            _ => OcrBackend::Process,
        };

        let threshold = match env::var("SALTMATCH_THRESHOLD") {
            Ok(raw) => raw.trim().parse::<f64>().map_err(|_| {
                anyhow::anyhow!("SALTMATCH_THRESHOLD must be a number, got {raw:?}")
            })?,
            Err(_) => DEFAULT_THRESHOLD,
        };

        Ok(Self {
            medicines_path: env::var("SALTMATCH_MEDICINES")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_data_dir().join("medicines.json")),
            generics_path: env::var("SALTMATCH_GENERICS")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_data_dir().join("generics.json")),
            ocr_backend,
            ocr_command: env::var("SALTMATCH_OCR_COMMAND")
                .unwrap_or_else(|_| "python ocr/main.py".to_string()),
            ocr_url: env::var("SALTMATCH_OCR_URL").unwrap_or_default(),
            threshold,
        })
    }

    /// Check that both catalog files exist.
    /// Call this before any operation that reads the catalog.
    pub fn require_catalog(&self) -> Result<()> {
        for (label, path) in [
            ("SALTMATCH_MEDICINES", &self.medicines_path),
            ("SALTMATCH_GENERICS", &self.generics_path),
        ] {
            if !path.exists() {
                anyhow::bail!(
                    "Catalog file not found: {}\n\
                     Set {label} in your .env file to point at the JSON export.",
                    path.display()
                );
            }
        }
        Ok(())
    }

    /// Validate that the chosen OCR backend has what it needs.
    pub fn require_ocr(&self) -> Result<()> {
        match self.ocr_backend {
            OcrBackend::Process => {
                if self.ocr_command.trim().is_empty() {
                    anyhow::bail!(
                        "SALTMATCH_OCR_COMMAND is empty. Set it to the OCR command line,\n\
                         e.g. `python ocr/main.py`."
                    );
                }
                Ok(())
            }
            OcrBackend::Http => {
                if self.ocr_url.is_empty() {
                    anyhow::bail!(
                        "SALTMATCH_OCR_URL not set. Add it to your .env file,\n\
                         or set SALTMATCH_OCR=process to run a local OCR command."
                    );
                }
                Ok(())
            }
        }
    }
}

/// Platform data directory: ~/.local/share/saltmatch/ on Linux.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("saltmatch")
}
