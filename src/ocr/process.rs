// External-process OCR backend.
//
// Runs a configured command (by default a Python OCR script) with the image
// path as its last argument. The script may print diagnostics on stdout
// before its result, so the first stdout line that parses as JSON is taken
// as the answer.

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use super::traits::{OcrOutput, OcrService};

/// OCR backed by a child process.
pub struct ProcessOcr {
    program: String,
    args: Vec<String>,
}

impl ProcessOcr {
    /// Build from a command line such as `python ocr/main.py`.
    pub fn from_command_line(command: &str) -> Result<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .context("OCR command is empty. Set SALTMATCH_OCR_COMMAND.")?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }
}

#[async_trait]
impl OcrService for ProcessOcr {
    async fn extract(&self, image: &Path) -> Result<OcrOutput> {
        if !image.exists() {
            anyhow::bail!("Image file not found: {}", image.display());
        }

        info!(image = %image.display(), program = %self.program, "Running OCR process");

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(image)
            .output()
            .await
            .with_context(|| format!("Failed to start OCR process `{}`", self.program))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
            debug!(line, "OCR stderr");
        }

        if !output.status.success() {
            anyhow::bail!(
                "OCR process failed ({}): {}",
                output.status,
                stderr.trim()
            );
        }

        parse_stdout(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Take the first stdout line that is valid JSON.
pub fn parse_stdout(stdout: &str) -> Result<OcrOutput> {
    let value = stdout
        .lines()
        .find_map(|line| serde_json::from_str::<serde_json::Value>(line.trim()).ok())
        .with_context(|| {
            format!(
                "No valid JSON found in OCR output: {}",
                crate::output::truncate_chars(stdout.trim(), 200)
            )
        })?;
    OcrOutput::from_value(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_diagnostic_lines() {
        let stdout = "[DEBUG] loading model\n{\"text\": \"Dolo 650\"}\n";
        let output = parse_stdout(stdout).unwrap();
        assert_eq!(output.text, "Dolo 650");
    }

    #[test]
    fn test_no_json_is_an_error() {
        assert!(parse_stdout("[ERROR] File not found\n").is_err());
    }

    #[test]
    fn test_empty_command_rejected() {
        assert!(ProcessOcr::from_command_line("   ").is_err());
    }
}
