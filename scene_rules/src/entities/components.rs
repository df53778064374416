//! Trait values and the trait table attached to every character.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// A single trait value.
///
/// Hand-authored profiles mix textual traits ("emotion") with numeric ones
/// ("intelligence") under the same map, so the value is untagged on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TraitValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl TraitValue {
    /// The value as text, if it is textual.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TraitValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The value as a number, if it is numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            TraitValue::Int(n) => Some(*n as f64),
            TraitValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// The value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TraitValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl std::fmt::Display for TraitValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraitValue::Bool(b) => write!(f, "{}", b),
            TraitValue::Int(n) => write!(f, "{}", n),
            TraitValue::Float(n) => write!(f, "{}", n),
            TraitValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for TraitValue {
    fn from(value: &str) -> Self {
        TraitValue::Text(value.to_string())
    }
}

impl From<String> for TraitValue {
    fn from(value: String) -> Self {
        TraitValue::Text(value)
    }
}

impl From<i64> for TraitValue {
    fn from(value: i64) -> Self {
        TraitValue::Int(value)
    }
}

impl From<f64> for TraitValue {
    fn from(value: f64) -> Self {
        TraitValue::Float(value)
    }
}

impl From<bool> for TraitValue {
    fn from(value: bool) -> Self {
        TraitValue::Bool(value)
    }
}

/// Named traits of a character, kept sorted so saved profiles are stable.
///
/// A `null` trait in the source is read as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Traits(BTreeMap<String, TraitValue>);

impl<'de> Deserialize<'de> for Traits {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<BTreeMap<String, Option<TraitValue>>>::deserialize(deserializer)?;
        Ok(raw
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name, v)))
            .collect())
    }
}

impl Traits {
    /// Create an empty trait table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a trait, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<TraitValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Builder-style variant of [`Traits::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<TraitValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Look up a trait by name.
    ///
    /// An exact match wins; otherwise the first case-insensitive match in
    /// sorted key order is returned.
    pub fn get(&self, name: &str) -> Option<&TraitValue> {
        self.0.get(name).or_else(|| {
            self.0
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value)
        })
    }

    /// Text value of a trait, or `default` when absent or not textual.
    pub fn text_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).and_then(TraitValue::as_text).unwrap_or(default)
    }

    /// Numeric value of a trait, or `default` when absent or not numeric.
    pub fn number_or(&self, name: &str, default: f64) -> f64 {
        self.get(name).and_then(TraitValue::as_number).unwrap_or(default)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over all traits in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &TraitValue)> {
        self.0.iter()
    }
}

impl FromIterator<(String, TraitValue)> for Traits {
    fn from_iter<I: IntoIterator<Item = (String, TraitValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_trait_values() {
        let traits: Traits = serde_json::from_str(
            r#"{"intelligence": 8, "agility": 2.5, "brave": true, "emotion": "wary"}"#,
        )
        .unwrap();

        assert_eq!(traits.get("intelligence"), Some(&TraitValue::Int(8)));
        assert_eq!(traits.get("agility"), Some(&TraitValue::Float(2.5)));
        assert_eq!(traits.get("brave"), Some(&TraitValue::Bool(true)));
        assert_eq!(traits.get("emotion"), Some(&TraitValue::Text("wary".into())));
    }

    #[test]
    fn test_null_traits_are_absent() {
        let traits: Traits =
            serde_json::from_str(r#"{"intelligence": 3, "emotion": null}"#).unwrap();
        assert_eq!(traits.len(), 1);
        assert!(!traits.contains("emotion"));
        assert_eq!(traits.text_or("emotion", "neutral"), "neutral");

        let traits: Traits = serde_json::from_str("null").unwrap();
        assert!(traits.is_empty());
    }

    #[test]
    fn test_accessors_with_defaults() {
        let traits = Traits::new()
            .with("emotion", "hopeful")
            .with("motivation", 3_i64)
            .with("dexterity", 7_i64);

        assert_eq!(traits.text_or("emotion", "neutral"), "hopeful");
        // Numeric value under a textual name falls back.
        assert_eq!(traits.text_or("motivation", "none"), "none");
        assert_eq!(traits.text_or("missing", "neutral"), "neutral");
        assert_eq!(traits.number_or("dexterity", 0.0), 7.0);
        assert_eq!(traits.number_or("emotion", 0.0), 0.0);
    }

    #[test]
    fn test_case_insensitive_lookup_prefers_exact() {
        let traits = Traits::new()
            .with("Intelligence", 4_i64)
            .with("intelligence", 9_i64);
        assert_eq!(traits.get("intelligence"), Some(&TraitValue::Int(9)));

        let traits = Traits::new().with("Charisma", 6_i64);
        assert_eq!(traits.get("charisma"), Some(&TraitValue::Int(6)));
        assert!(traits.contains("CHARISMA"));
    }

    #[test]
    fn test_display() {
        assert_eq!(TraitValue::Int(5).to_string(), "5");
        assert_eq!(TraitValue::Float(1.5).to_string(), "1.5");
        assert_eq!(TraitValue::Bool(false).to_string(), "false");
        assert_eq!(TraitValue::from("calm").to_string(), "calm");
    }
}
