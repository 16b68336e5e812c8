// System status display: catalog files, record counts, OCR backend.

use std::path::Path;

use anyhow::Result;

use crate::catalog::Catalog;
use crate::config::{Config, OcrBackend};

/// Display system status to the terminal.
pub fn show(config: &Config) -> Result<()> {
    let medicines_ok = print_file("Medicines", &config.medicines_path);
    let generics_ok = print_file("Generics", &config.generics_path);

    if medicines_ok && generics_ok {
        let catalog = Catalog::load(&config.medicines_path, &config.generics_path)?;
        println!("Branded products: {}", catalog.medicines.len());
        println!(
            "Generic candidates: {} ({} with a name)",
            catalog.generics.len(),
            catalog.named_generic_count()
        );
    } else {
        println!("\nSet SALTMATCH_MEDICINES and SALTMATCH_GENERICS in your .env file.");
    }

    match config.ocr_backend {
        OcrBackend::Process => println!("OCR: process (`{}`)", config.ocr_command),
        OcrBackend::Http if config.ocr_url.is_empty() => println!("OCR: http (URL not set)"),
        OcrBackend::Http => println!("OCR: http ({})", config.ocr_url),
    }
    println!("Acceptance threshold: {:.2}", config.threshold);

    Ok(())
}

fn print_file(label: &str, path: &Path) -> bool {
    match std::fs::metadata(path) {
        Ok(meta) => {
            println!("{label}: {} ({})", path.display(), format_bytes(meta.len()));
            true
        }
        Err(_) => {
            println!("{label}: {} (not found)", path.display());
            false
        }
    }
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
