// Label normalization: raw drug label text to structured ingredient data.
//
// Catalog labels are free text: "Paracetamol Tablets IP 500mg",
// "Amoxycillin (500mg) + Clavulanic Acid (125mg)", "Vitamin C 0.5g".
// Normalization lower-cases the label, drops dosage-form noise words,
// strips punctuation, and pulls out every "name <number><unit>" pair as an
// active ingredient with its dose converted to milligrams.
//
// Normalization is total: any input, including an empty one, produces a
// label. Downstream scoring copes with labels that carry no ingredients.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex_lite::Regex;

/// Dosage-form words that say nothing about the active compound.
pub const STOP_WORDS: [&str; 9] = [
    "ip",
    "tablet",
    "tablets",
    "capsule",
    "capsules",
    "oral",
    "solution",
    "injection",
    "syrup",
];

static STOP_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"\b(?:{})\b", STOP_WORDS.join("|"));
    Regex::new(&pattern).expect("stop word pattern is valid")
});

/// `name <number> <unit>` with optional whitespace between the parts.
static INGREDIENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([a-z]+)\s*(\d+(?:\.\d+)?)\s*(mcg|mg|ml|g)?")
        .expect("ingredient pattern is valid")
});

/// One active ingredient with its dose in milligrams.
#[derive(Debug, Clone, PartialEq)]
pub struct Ingredient {
    pub name: String,
    pub dose_mg: f64,
}

/// Dose units recognised on labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoseUnit {
    Milligram,
    Millilitre,
    Gram,
    Microgram,
}

impl DoseUnit {
    /// Parse a unit token. A missing unit means milligrams.
    pub fn parse(token: Option<&str>) -> Self {
        match token {
            Some("g") => DoseUnit::Gram,
            Some("mcg") => DoseUnit::Microgram,
            Some("ml") => DoseUnit::Millilitre,
            _ => DoseUnit::Milligram,
        }
    }

    /// Convert a dose in this unit to milligrams.
    ///
    /// Millilitres are compared as-is: labels rarely give a concentration,
    /// so there is nothing to convert them with.
    pub fn to_mg(self, value: f64) -> f64 {
        match self {
            DoseUnit::Gram => value * 1000.0,
            DoseUnit::Microgram => value / 1000.0,
            DoseUnit::Milligram | DoseUnit::Millilitre => value,
        }
    }
}

/// A label reduced to comparable parts. Built once by [`normalize`] and
/// read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedLabel {
    clean_text: String,
    tokens: BTreeSet<String>,
    ingredients: BTreeMap<String, f64>,
}

impl NormalizedLabel {
    /// Lower-cased label with noise words and punctuation removed.
    pub fn clean_text(&self) -> &str {
        &self.clean_text
    }

    /// Non-numeric words of the clean text.
    pub fn tokens(&self) -> &BTreeSet<String> {
        &self.tokens
    }

    /// Active ingredient name -> dose in mg.
    pub fn ingredients(&self) -> &BTreeMap<String, f64> {
        &self.ingredients
    }

    /// Ingredients as records, ordered by name.
    pub fn ingredient_list(&self) -> Vec<Ingredient> {
        self.ingredients
            .iter()
            .map(|(name, dose)| Ingredient {
                name: name.clone(),
                dose_mg: *dose,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.clean_text.is_empty()
    }
}

/// Normalize a raw label.
///
/// Stop words are dropped twice: once on the lowercased text, and again per
/// word after punctuation is stripped. The second pass catches forms like
/// `i.p` that only become `ip` once the dot is gone, so `"i.p 500"` yields
/// clean text `"500"` and no ingredients rather than `ip: 500`.
/// Re-normalizing a clean text therefore returns the same clean text.
pub fn normalize(raw: &str) -> NormalizedLabel {
    let lowered = raw.trim().to_lowercase();
    if lowered.is_empty() {
        return NormalizedLabel::default();
    }

    let without_stop_words = STOP_WORD_RE.replace_all(&lowered, " ");

    // Keep decimal points for dose extraction only; "0.5g" must not become 5g.
    let dose_text = strip_punctuation(&without_stop_words, true);
    let clean_text = dose_text.replace('.', "");

    let ingredients = extract_ingredients(&dose_text);

    let tokens = clean_text
        .split_whitespace()
        .filter(|word| !word.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
        .collect();

    NormalizedLabel {
        clean_text,
        tokens,
        ingredients,
    }
}

/// Normalize a label that may be missing. `None` yields an empty label.
pub fn normalize_optional(raw: Option<&str>) -> NormalizedLabel {
    raw.map(normalize).unwrap_or_default()
}

/// Drop every character other than ASCII letters, digits and whitespace,
/// then collapse whitespace. Removing punctuation can glue fragments into a
/// stop word ("i.p." -> "ip"), so stop words are filtered again per word.
///
/// With `keep_decimal_points`, a '.' between two digits survives.
fn strip_punctuation(text: &str, keep_decimal_points: bool) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut stripped = String::with_capacity(text.len());

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            stripped.push(c);
        } else if c.is_whitespace() {
            stripped.push(' ');
        } else if c == '.' && keep_decimal_points {
            let prev_digit = i > 0 && chars[i - 1].is_ascii_digit();
            let next_digit = chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
            if prev_digit && next_digit {
                stripped.push(c);
            }
        }
    }

    stripped
        .split_whitespace()
        .filter(|word| !STOP_WORDS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Scan for `name dose unit` triples. Later occurrences of a name overwrite
/// earlier ones.
fn extract_ingredients(text: &str) -> BTreeMap<String, f64> {
    let mut ingredients = BTreeMap::new();

    for caps in INGREDIENT_RE.captures_iter(text) {
        let (Some(name), Some(value)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let Ok(value) = value.as_str().parse::<f64>() else {
            continue;
        };
        let unit = DoseUnit::parse(caps.get(3).map(|m| m.as_str()));
        ingredients.insert(name.as_str().to_string(), unit.to_mg(value));
    }

    ingredients
}
