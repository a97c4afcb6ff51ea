//! Core value types for the siteweaver engine

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single attribute value as it appears in the wire JSON.
///
/// Attribute bags are loosely typed on the wire: strings, booleans and
/// numbers all occur. Values only reach the live tree when truthy, so the
/// exact variant mostly matters for the falsy-drop rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
}

impl AttrValue {
    /// JavaScript-style truthiness.
    ///
    /// Falsy: null, false, 0, 0.0, NaN and the empty string. Only truthy
    /// values are ever applied to a node (the deliberate falsy-drop quirk).
    pub fn is_truthy(&self) -> bool {
        match self {
            AttrValue::Null => false,
            AttrValue::Bool(b) => *b,
            AttrValue::Int(i) => *i != 0,
            AttrValue::Float(f) => *f != 0.0 && !f.is_nan(),
            AttrValue::String(s) => !s.is_empty(),
        }
    }

    /// Render the value the way `setAttribute` would coerce it to a string.
    pub fn render(&self) -> String {
        match self {
            AttrValue::Null => "null".to_string(),
            AttrValue::Bool(b) => b.to_string(),
            AttrValue::Int(i) => i.to_string(),
            AttrValue::Float(f) => f.to_string(),
            AttrValue::String(s) => s.clone(),
        }
    }

    /// Try to get the value as a string reference
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl Default for AttrValue {
    fn default() -> Self {
        AttrValue::Null
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

impl From<i64> for AttrValue {
    fn from(i: i64) -> Self {
        AttrValue::Int(i)
    }
}

impl From<f64> for AttrValue {
    fn from(f: f64) -> Self {
        AttrValue::Float(f)
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::String(s)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::String(s.to_string())
    }
}

/// Ordered attribute bag of an element descriptor.
///
/// Insertion order is preserved: attributes are applied to the live tree
/// in the order they appear in the source JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(IndexMap<String, AttrValue>);

impl Attributes {
    /// Create an empty attribute bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries (including falsy ones)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the bag has no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Set an attribute, replacing an existing entry of the same name
    /// while keeping its original position.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Look up an attribute value by name
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.0.get(name)
    }

    /// Look up a string attribute value by name
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(AttrValue::as_str)
    }

    /// Iterate over all entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate over the entries that survive the falsy-drop rule,
    /// rendered to their string form, in insertion order.
    pub fn truthy(&self) -> impl Iterator<Item = (&str, String)> {
        self.0
            .iter()
            .filter(|(_, v)| v.is_truthy())
            .map(|(k, v)| (k.as_str(), v.render()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(AttrValue::Bool(true).is_truthy());
        assert!(!AttrValue::Bool(false).is_truthy());
        assert!(!AttrValue::Null.is_truthy());
        assert!(AttrValue::Int(1).is_truthy());
        assert!(!AttrValue::Int(0).is_truthy());
        assert!(AttrValue::String("x".to_string()).is_truthy());
        assert!(!AttrValue::String(String::new()).is_truthy());
        assert!(!AttrValue::Float(0.0).is_truthy());
        assert!(!AttrValue::Float(f64::NAN).is_truthy());
        assert!(AttrValue::Float(1.5).is_truthy());
    }

    #[test]
    fn test_render_coercion() {
        assert_eq!(AttrValue::Bool(true).render(), "true");
        assert_eq!(AttrValue::Int(65535).render(), "65535");
        assert_eq!(AttrValue::String("number".to_string()).render(), "number");
    }

    #[test]
    fn test_attributes_preserve_insertion_order() {
        let json = r#"{"type": "number", "min": 0, "max": 65535, "disabled": false}"#;
        let attrs: Attributes = serde_json::from_str(json).unwrap();

        let names: Vec<&str> = attrs.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["type", "min", "max", "disabled"]);
    }

    #[test]
    fn test_truthy_drops_falsy_entries() {
        let json = r#"{"placeholder": "x", "disabled": "", "min": 0, "required": true}"#;
        let attrs: Attributes = serde_json::from_str(json).unwrap();

        let applied: Vec<(&str, String)> = attrs.truthy().collect();
        assert_eq!(
            applied,
            vec![
                ("placeholder", "x".to_string()),
                ("required", "true".to_string())
            ]
        );
    }

    #[test]
    fn test_set_and_get() {
        let mut attrs = Attributes::new();
        attrs.set("type", "password");
        attrs.set("value", "");

        assert_eq!(attrs.get_str("type"), Some("password"));
        assert_eq!(attrs.get("value"), Some(&AttrValue::String(String::new())));
        assert_eq!(attrs.get("missing"), None);
        assert_eq!(attrs.len(), 2);
    }
}
