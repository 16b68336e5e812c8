// Unit tests for label normalization.
//
// Tests the properties every label must satisfy: empty input, unit
// conversion, stop-word invariance, idempotent clean text, and
// non-negative doses over a spread of messy real-world labels.

use saltmatch::matching::normalize::{normalize, normalize_optional, DoseUnit, STOP_WORDS};

const MESSY_LABELS: [&str; 10] = [
    "Paracetamol Tablets IP 500mg",
    "Amoxycillin (500mg) + Clavulanic Acid (125mg)",
    "AZITHROMYCIN 250 MG TABLET",
    "Vitamin D3 60000 IU Capsule",
    "Cefixime Oral Suspension 50mg/5ml",
    "Insulin Injection 40 IU/ml",
    "Ondansetron Syrup 2mg/5ml",
    "  ---  ",
    "Levocetirizine 5 mcg",
    "Metformin 0.5 g SR",
];

// ============================================================
// Empty input
// ============================================================

#[test]
fn empty_string_yields_empty_label() {
    let label = normalize("");
    assert_eq!(label.clean_text(), "");
    assert!(label.tokens().is_empty());
    assert!(label.ingredients().is_empty());
}

#[test]
fn missing_label_yields_empty_label() {
    let label = normalize_optional(None);
    assert!(label.tokens().is_empty());
    assert!(label.ingredients().is_empty());
    assert_eq!(label, normalize(""));
}

#[test]
fn punctuation_only_yields_empty_label() {
    let label = normalize("  ---  ");
    assert!(label.is_empty());
    assert!(label.tokens().is_empty());
}

// ============================================================
// Unit conversion
// ============================================================

#[test]
fn grams_convert_to_mg() {
    let label = normalize("paracetamol 1g");
    assert_eq!(label.ingredients().get("paracetamol"), Some(&1000.0));
}

#[test]
fn micrograms_convert_to_mg() {
    let label = normalize("paracetamol 500mcg");
    assert_eq!(label.ingredients().get("paracetamol"), Some(&0.5));
}

#[test]
fn milligrams_unchanged() {
    let label = normalize("paracetamol 500mg");
    assert_eq!(label.ingredients().get("paracetamol"), Some(&500.0));
}

#[test]
fn spaced_unit_is_recognised() {
    let label = normalize("Azithromycin 250 MG");
    assert_eq!(label.ingredients().get("azithromycin"), Some(&250.0));
}

#[test]
fn decimal_grams() {
    let label = normalize("Metformin 0.5 g SR");
    assert_eq!(label.ingredients().get("metformin"), Some(&500.0));
}

#[test]
fn dose_unit_conversions() {
    assert_eq!(DoseUnit::parse(Some("g")).to_mg(2.0), 2000.0);
    assert_eq!(DoseUnit::parse(Some("mcg")).to_mg(250.0), 0.25);
    assert_eq!(DoseUnit::parse(Some("ml")).to_mg(5.0), 5.0);
    assert_eq!(DoseUnit::parse(None), DoseUnit::Milligram);
}

// ============================================================
// Stop words
// ============================================================

#[test]
fn stop_words_do_not_change_ingredients() {
    let with_noise = normalize("Paracetamol Tablets IP 500mg");
    let plain = normalize("Paracetamol 500mg");
    assert_eq!(with_noise.ingredients(), plain.ingredients());
    assert_eq!(with_noise.tokens(), plain.tokens());
}

#[test]
fn stop_words_removed_as_whole_words_only() {
    // "tablet" inside another word must survive
    let label = normalize("Tabletop Oral Solution 10mg");
    assert!(label.tokens().contains("tabletop"));
    assert!(!label.tokens().contains("oral"));
    assert!(!label.tokens().contains("solution"));
}

#[test]
fn every_stop_word_is_removed() {
    for word in STOP_WORDS {
        let label = normalize(&format!("Ibuprofen {} 400mg", word.to_uppercase()));
        assert_eq!(
            label.clean_text(),
            "ibuprofen 400mg",
            "stop word {word} should be removed"
        );
    }
}

#[test]
fn dotted_stop_word_is_removed_after_stripping() {
    let label = normalize("i.p 500");
    assert_eq!(label.clean_text(), "500");
    assert!(label.ingredients().is_empty());

    let label = normalize("Paracetamol I.P. 500mg");
    assert_eq!(label, normalize("Paracetamol 500mg"));
}

// ============================================================
// Tokens
// ============================================================

#[test]
fn tokens_exclude_pure_numbers() {
    let label = normalize("Azithromycin 250 MG");
    assert!(label.tokens().contains("azithromycin"));
    assert!(label.tokens().contains("mg"));
    assert!(!label.tokens().contains("250"));
}

#[test]
fn label_without_doses_keeps_tokens() {
    let label = normalize("Cough Relief Lozenges");
    assert!(label.ingredients().is_empty());
    assert_eq!(label.tokens().len(), 3);
}

// ============================================================
// Properties over messy labels
// ============================================================

#[test]
fn doses_are_never_negative() {
    for raw in MESSY_LABELS {
        for (name, dose) in normalize(raw).ingredients() {
            assert!(*dose >= 0.0, "{raw}: {name} has negative dose {dose}");
        }
    }
}

#[test]
fn clean_text_is_idempotent() {
    for raw in MESSY_LABELS {
        let once = normalize(raw);
        let twice = normalize(once.clean_text());
        assert_eq!(
            twice.clean_text(),
            once.clean_text(),
            "re-normalizing {raw:?} changed the clean text"
        );
    }
}

#[test]
fn clean_text_has_no_punctuation_or_double_spaces() {
    for raw in MESSY_LABELS {
        let label = normalize(raw);
        let clean = label.clean_text();
        assert!(
            clean.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' '),
            "{raw:?} -> {clean:?}"
        );
        assert!(!clean.contains("  "), "{raw:?} -> {clean:?}");
        assert_eq!(clean, clean.trim());
    }
}

#[test]
fn normalization_is_deterministic() {
    for raw in MESSY_LABELS {
        assert_eq!(normalize(raw), normalize(raw));
    }
}

#[test]
fn ingredient_list_matches_map() {
    let label = normalize("Amoxycillin (500mg) + Clavulanic Acid (125mg)");
    let list = label.ingredient_list();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].name, "acid");
    assert_eq!(list[0].dose_mg, 125.0);
    assert_eq!(list[1].name, "amoxycillin");
    assert_eq!(list[1].dose_mg, 500.0);
}
