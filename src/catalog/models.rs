// Catalog records: typed views over the medicine and generic catalogs.
//
// The upstream catalogs are loosely shaped JSON documents. The fields the
// lookup uses get named, typed slots; anything else a provider sends is kept
// verbatim in `extra` and never read by the matching code.

use std::collections::BTreeMap;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Provider-specific fields with no typed slot.
pub type ExtraAttributes = BTreeMap<String, serde_json::Value>;

/// A branded medicine from the medicine catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrandedProduct {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt_composition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medicine_desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_effects: Option<String>,
    /// Stored as `price(₹)` in the source catalog, sometimes as a string.
    #[serde(
        default,
        alias = "price(₹)",
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack_size_label: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraAttributes,
}

impl BrandedProduct {
    /// Salt composition, or an empty string when the record has none.
    pub fn salt(&self) -> &str {
        self.salt_composition.as_deref().unwrap_or("")
    }
}

/// A generic medicine that may substitute for a branded one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenericCandidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_size: Option<String>,
    /// Maximum retail price; `mrp` in the source catalog.
    #[serde(
        default,
        alias = "mrp",
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<f64>,
    /// Set by the selector for the run that produced it. A stored value is
    /// discarded on load so it never resurfaces through `extra`.
    #[serde(
        default,
        deserialize_with = "discard_score",
        skip_serializing_if = "Option::is_none"
    )]
    pub similarity_score: Option<f64>,
    #[serde(flatten)]
    pub extra: ExtraAttributes,
}

impl GenericCandidate {
    /// The generic name if it is present and non-empty. Whitespace-only
    /// names still count and simply score 0.
    pub fn label(&self) -> Option<&str> {
        self.generic_name.as_deref().filter(|name| !name.is_empty())
    }
}

/// Accept a JSON number, a numeric string, or null. Anything else reads as
/// absent rather than failing the whole catalog.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// Consume a persisted score and keep nothing.
fn discard_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    IgnoredAny::deserialize(deserializer)?;
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branded_price_alias_and_string() {
        let json = r#"{"name": "Crocin 500", "price(₹)": "15.5", "salt_composition": "Paracetamol (500mg)"}"#;
        let product: BrandedProduct = serde_json::from_str(json).unwrap();
        assert_eq!(product.price, Some(15.5));
        assert_eq!(product.salt(), "Paracetamol (500mg)");
        assert!(product.extra.is_empty());
    }

    #[test]
    fn test_unparseable_price_is_absent() {
        let json = r#"{"name": "X", "price": "n/a"}"#;
        let product: BrandedProduct = serde_json::from_str(json).unwrap();
        assert_eq!(product.price, None);
    }

    #[test]
    fn test_generic_extra_attributes_kept() {
        let json = r#"{"_id": "abc", "generic_name": "Paracetamol 500mg", "mrp": 9, "similarity_score": 0.9}"#;
        let generic: GenericCandidate = serde_json::from_str(json).unwrap();
        assert_eq!(generic.price, Some(9.0));
        assert_eq!(generic.similarity_score, None);
        assert_eq!(generic.extra["_id"], "abc");
        assert!(!generic.extra.contains_key("similarity_score"));
    }

    #[test]
    fn test_stored_score_not_serialized_twice() {
        let json = r#"{"generic_name": "P 5mg", "similarity_score": 0.9}"#;
        let mut generic: GenericCandidate = serde_json::from_str(json).unwrap();
        generic.similarity_score = Some(0.1);
        let out = serde_json::to_string(&generic).unwrap();
        assert_eq!(out.matches("similarity_score").count(), 1);
        assert!(out.contains("0.1"));
        assert!(!out.contains("0.9"));
    }

    #[test]
    fn test_empty_generic_name_has_no_label() {
        let generic = GenericCandidate {
            generic_name: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(generic.label(), None);
    }

    #[test]
    fn test_whitespace_generic_name_is_a_label() {
        let generic = GenericCandidate {
            generic_name: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(generic.label(), Some("   "));
    }
}
