// Product identification from OCR text.
//
// A photographed package yields a soup of recognized words: the brand name,
// the manufacturer, the salt composition, and a lot of noise. This module
// filters that soup down to keywords and picks the catalog medicine those
// keywords describe best. A keyword found in the product name counts most
// (3), then the salt composition (2), then the manufacturer (1).

use std::sync::LazyLock;

use regex_lite::Regex;
use tracing::debug;

use crate::catalog::models::BrandedProduct;

/// Fragments OCR commonly produces from package artwork.
const OCR_NOISE_WORDS: [&str; 13] = [
    "tablets", "mg", "p", "i", "a", "es", "seers", "cu", "lh", "ts", "sol", "r", "sere",
];

/// Keywords this short match too many catalog entries to be useful.
const MIN_KEYWORD_LEN: usize = 4;

const NAME_HIT: u32 = 3;
const SALT_HIT: u32 = 2;
const MANUFACTURER_HIT: u32 = 1;

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-z0-9-]+\b").expect("word pattern is valid"));

/// A catalog medicine picked from OCR keywords, with its keyword score.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifiedProduct<'a> {
    pub product: &'a BrandedProduct,
    pub score: u32,
}

/// Reduce OCR text to matchable keywords.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD_RE
        .find_iter(&lowered)
        .map(|m| clean_field(m.as_str()))
        .filter(|word| !OCR_NOISE_WORDS.contains(&word.as_str()))
        .filter(|word| word.chars().count() >= MIN_KEYWORD_LEN)
        .collect()
}

/// Pick the medicine whose name, salt composition or manufacturer contains
/// the most keywords. Ties go to the earlier catalog entry.
pub fn identify_product<'a>(
    keywords: &[String],
    medicines: &'a [BrandedProduct],
) -> Option<IdentifiedProduct<'a>> {
    if keywords.is_empty() {
        return None;
    }

    let mut best: Option<IdentifiedProduct<'a>> = None;
    let mut hits = 0usize;

    for product in medicines {
        let name = clean_field(&product.name.to_lowercase());
        let salt = clean_field(&product.salt().to_lowercase());
        let manufacturer = clean_field(
            &product
                .manufacturer_name
                .as_deref()
                .unwrap_or("")
                .to_lowercase(),
        );

        let mut score = 0;
        let mut matched = false;
        for word in keywords {
            if name.contains(word.as_str()) {
                score += NAME_HIT;
            } else if salt.contains(word.as_str()) {
                score += SALT_HIT;
            } else if manufacturer.contains(word.as_str()) {
                score += MANUFACTURER_HIT;
            } else {
                continue;
            }
            matched = true;
        }

        if !matched {
            continue;
        }
        hits += 1;

        if best.as_ref().map_or(true, |b| score > b.score) {
            best = Some(IdentifiedProduct { product, score });
        }
    }

    debug!(
        keywords = keywords.len(),
        matching_rows = hits,
        best = best.as_ref().map(|b| b.product.name.as_str()),
        "Identified product from keywords"
    );

    best
}

/// Turn a salt composition like "Amoxycillin (500mg) + Clavulanic Acid
/// (125mg)" into plain text for the matcher.
pub fn prepare_salt_composition(salt: &str) -> String {
    salt.replace('+', " ").replace(['(', ')'], "")
}

/// Hyphens to spaces, whitespace collapsed.
fn clean_field(text: &str) -> String {
    text.replace('-', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
