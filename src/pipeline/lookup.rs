// Lookup pipeline: identify a branded medicine -> find its generic.
//
// Two entry points feed the same matching step:
// 1. By name: case-insensitive catalog search for the branded product
// 2. By photo: OCR the package, reduce the text to keywords, and pick the
//    catalog product those keywords describe
//
// Either way the product's salt composition is cleaned up and matched
// against every generic candidate. The best candidate is always reported;
// `confident` says whether it clears the acceptance threshold.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::models::BrandedProduct;
use crate::catalog::Catalog;
use crate::identify::{extract_keywords, identify_product, prepare_salt_composition};
use crate::matching::selector::{select_best, select_best_parallel, MatchResult};
use crate::ocr::traits::OcrService;

/// Generic catalogs at least this large are scored on the rayon pool.
const PARALLEL_CANDIDATES: usize = 5_000;

/// The generic half of a lookup report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenericMatch {
    pub generic_name: String,
    pub unit_size: String,
    pub price: f64,
    pub similarity_score: f64,
}

/// Branded product details merged with its best generic match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookupReport {
    pub name: String,
    pub salt_composition: String,
    pub manufacturer: String,
    pub description: String,
    pub side_effects: String,
    /// Branded price; 0 when the catalog has none
    pub price: f64,
    pub pack_size: String,
    pub generic: Option<GenericMatch>,
    /// Whether the generic match clears the acceptance threshold
    pub confident: bool,
    pub generated_at: DateTime<Utc>,
}

impl LookupReport {
    /// Merge a branded product with a match result.
    pub fn build(product: &BrandedProduct, result: &MatchResult, threshold: f64) -> Self {
        let generic = result.candidate.as_ref().map(|c| GenericMatch {
            generic_name: c.generic_name.clone().unwrap_or_default(),
            unit_size: c.unit_size.clone().unwrap_or_default(),
            price: c.price.unwrap_or(0.0),
            similarity_score: result.score,
        });

        Self {
            name: product.name.clone(),
            salt_composition: product.salt().to_string(),
            manufacturer: product.manufacturer_name.clone().unwrap_or_default(),
            description: product.medicine_desc.clone().unwrap_or_default(),
            side_effects: product.side_effects.clone().unwrap_or_default(),
            price: product.price.unwrap_or(0.0),
            pack_size: product.pack_size_label.clone().unwrap_or_default(),
            generic,
            confident: result.is_confident(threshold),
            generated_at: Utc::now(),
        }
    }
}

/// Outcome of one image in a batch lookup.
#[derive(Debug)]
pub struct ImageLookup {
    pub image: PathBuf,
    pub outcome: Result<Option<LookupReport>>,
}

/// Match a known branded product against the generic catalog.
pub fn match_product(catalog: &Catalog, product: &BrandedProduct, threshold: f64) -> LookupReport {
    let salt = prepare_salt_composition(product.salt());
    info!(product = %product.name, salt = %salt, "Searching for generic alternatives");

    let result = if catalog.generics.len() >= PARALLEL_CANDIDATES {
        select_best_parallel(&salt, &catalog.generics)
    } else {
        select_best(&salt, &catalog.generics)
    };

    match &result.candidate {
        Some(candidate) => info!(
            generic = candidate.generic_name.as_deref().unwrap_or(""),
            score = result.score,
            confident = result.is_confident(threshold),
            "Best generic alternative found"
        ),
        None => info!("No generic candidates to compare"),
    }

    LookupReport::build(product, &result, threshold)
}

/// Find a branded product by name and match it.
pub fn lookup_by_name(catalog: &Catalog, name: &str, threshold: f64) -> Option<LookupReport> {
    let product = catalog.search_by_name(name)?;
    Some(match_product(catalog, product, threshold))
}

/// OCR a package photo, identify the product, and match it.
///
/// Returns `Ok(None)` when the text does not point at any catalog product.
pub async fn lookup_image(
    ocr: &dyn OcrService,
    catalog: &Catalog,
    image: &Path,
    threshold: f64,
) -> Result<Option<LookupReport>> {
    let output = ocr.extract(image).await?;
    let keywords = extract_keywords(&output.text);

    info!(
        image = %image.display(),
        keywords = keywords.len(),
        "Extracted keywords from OCR text"
    );

    let Some(identified) = identify_product(&keywords, &catalog.medicines) else {
        info!(image = %image.display(), "No catalog product matched the OCR text");
        return Ok(None);
    };

    Ok(Some(match_product(catalog, identified.product, threshold)))
}

/// Look up several images, at most `concurrency` OCR calls in flight.
/// Results come back in input order; a failed image does not stop the batch.
pub async fn lookup_images(
    ocr: &dyn OcrService,
    catalog: &Catalog,
    images: &[PathBuf],
    threshold: f64,
    concurrency: usize,
) -> Vec<ImageLookup> {
    let pb = ProgressBar::new(images.len() as u64);
    if let Ok(style) = ProgressStyle::default_bar().template("  Reading [{bar:30}] {pos}/{len} ({eta})") {
        pb.set_style(style);
    }

    let results: Vec<ImageLookup> = stream::iter(images.iter().map(|image| {
        let pb = &pb;
        async move {
            let outcome = lookup_image(ocr, catalog, image, threshold).await;
            if let Err(e) = &outcome {
                warn!(image = %image.display(), error = %e, "Lookup failed, skipping");
            }
            pb.inc(1);
            ImageLookup {
                image: image.clone(),
                outcome,
            }
        }
    }))
    .buffered(concurrency.max(1))
    .collect()
    .await;

    pb.finish_and_clear();
    results
}
