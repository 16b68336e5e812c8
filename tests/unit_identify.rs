// Unit tests for product identification from OCR text.
//
// Tests keyword extraction noise filtering, the name/salt/manufacturer
// weighting, tie-breaking, and salt composition cleanup.

use saltmatch::catalog::models::BrandedProduct;
use saltmatch::identify::{extract_keywords, identify_product, prepare_salt_composition};

fn product(name: &str, salt: &str, manufacturer: &str) -> BrandedProduct {
    BrandedProduct {
        name: name.to_string(),
        salt_composition: Some(salt.to_string()),
        manufacturer_name: Some(manufacturer.to_string()),
        ..Default::default()
    }
}

fn medicines() -> Vec<BrandedProduct> {
    vec![
        product("Crocin Advance Tablet", "Paracetamol (500mg)", "GlaxoSmithKline"),
        product("Dolo 650 Tablet", "Paracetamol (650mg)", "Micro Labs Ltd"),
        product("Augmentin 625 Duo Tablet", "Amoxycillin (500mg) + Clavulanic Acid (125mg)", "GlaxoSmithKline"),
        product("Calpol Tablet", "Paracetamol (500mg)", "GlaxoSmithKline"),
    ]
}

// ============================================================
// Keyword extraction
// ============================================================

#[test]
fn keywords_are_lowercase() {
    let words = extract_keywords("AUGMENTIN DUO");
    assert_eq!(words, vec!["augmentin"]);
}

#[test]
fn keywords_drop_short_words() {
    let words = extract_keywords("Dolo ip 650 x");
    assert_eq!(words, vec!["dolo"]);
}

#[test]
fn keywords_drop_ocr_noise() {
    let words = extract_keywords("tablets seers sere");
    assert!(words.is_empty());
}

#[test]
fn hyphenated_words_become_phrases() {
    let words = extract_keywords("Co-Amoxiclav");
    assert_eq!(words, vec!["co amoxiclav"]);
}

#[test]
fn empty_text_has_no_keywords() {
    assert!(extract_keywords("").is_empty());
}

// ============================================================
// Identification
// ============================================================

#[test]
fn name_hit_outweighs_salt_hits() {
    let meds = medicines();
    let keywords = vec!["dolo".to_string()];
    let found = identify_product(&keywords, &meds).expect("a product");
    assert_eq!(found.product.name, "Dolo 650 Tablet");
    assert_eq!(found.score, 3);
}

#[test]
fn scores_accumulate_across_keywords() {
    let meds = medicines();
    // augmentin in name (3), clavulanic in salt (2), glaxosmithkline in manufacturer (1)
    let keywords = vec![
        "augmentin".to_string(),
        "clavulanic".to_string(),
        "glaxosmithkline".to_string(),
    ];
    let found = identify_product(&keywords, &meds).expect("a product");
    assert_eq!(found.product.name, "Augmentin 625 Duo Tablet");
    assert_eq!(found.score, 6);
}

#[test]
fn keyword_counts_once_per_product() {
    // "paracetamol" is only in the salt, so it scores 2, not 2 + 1
    let meds = vec![product("Pacimol", "Paracetamol (500mg)", "Paracetamol Labs")];
    let found = identify_product(&["paracetamol".to_string()], &meds).expect("a product");
    assert_eq!(found.score, 2);
}

#[test]
fn tie_goes_to_first_catalog_entry() {
    let meds = medicines();
    // Crocin, Augmentin and Calpol all score 2 on the salt
    let found = identify_product(&["500mg".to_string()], &meds).expect("a product");
    assert_eq!(found.product.name, "Crocin Advance Tablet");
}

#[test]
fn no_hits_identifies_nothing() {
    let meds = medicines();
    assert!(identify_product(&["omeprazole".to_string()], &meds).is_none());
}

#[test]
fn empty_catalog_identifies_nothing() {
    assert!(identify_product(&["dolo".to_string()], &[]).is_none());
}

// ============================================================
// Salt composition cleanup
// ============================================================

#[test]
fn salt_plus_and_parentheses_removed() {
    let prepared = prepare_salt_composition("Amoxycillin (500mg) + Clavulanic Acid (125mg)");
    assert!(!prepared.contains('+'));
    assert!(!prepared.contains('('));
    assert!(!prepared.contains(')'));
}

#[test]
fn plain_salt_unchanged() {
    assert_eq!(prepare_salt_composition("Paracetamol 500mg"), "Paracetamol 500mg");
}
