//! Site plan loading and construction
//!
//! Handles the JSON plan document a device serves to describe its
//! configuration page: a flat list of element descriptors plus page
//! metadata. The same structures are used in both directions — the device
//! side builds a plan and serializes it, the portal side parses it and
//! hands the elements to the tree builder.
//!
//! # Security Considerations
//!
//! Plans are untrusted input. Loading enforces:
//! - **Document size limits**: max 1 MB (see [`crate::config::MAX_PLAN_SIZE`])
//! - **Element count limits**: max 1000 descriptors
//! - **Attribute count limits**: max 100 per descriptor

use crate::config;
use crate::error::{BuildError, Result};
use crate::types::Attributes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One element of the configuration page.
///
/// Descriptors are flat: nesting is expressed through the `parent`
/// selector, not through the JSON structure. A descriptor is immutable
/// once parsed from the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDescriptor {
    /// Element kind to create (any renderable tag name)
    #[serde(rename = "element")]
    pub kind: String,
    /// Element id; empty means no id attribute is set
    #[serde(default)]
    pub id: String,
    /// Text content; for inputs a non-empty content doubles as the label
    #[serde(default)]
    pub content: String,
    /// Attribute bag, applied under the falsy-drop rule
    #[serde(default)]
    pub attributes: Attributes,
    /// Selector of the intended parent; unresolvable selectors fall back
    /// to the default root container
    #[serde(default)]
    pub parent: String,
}

impl ElementDescriptor {
    /// Shorthand used by the plan builder
    fn new(id: &str, kind: &str, content: &str, parent: &str) -> Self {
        Self {
            kind: kind.to_string(),
            id: id.to_string(),
            content: content.to_string(),
            attributes: Attributes::new(),
            parent: parent.to_string(),
        }
    }
}

/// Page metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    /// Page title, applied to the document on load
    #[serde(default)]
    pub title: String,
}

/// The full plan document: elements plus metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SitePlan {
    /// Flat descriptor list in source order
    #[serde(default)]
    pub elements: Vec<ElementDescriptor>,
    /// Page metadata
    #[serde(default)]
    pub meta: Meta,
}

impl SitePlan {
    /// Create an empty plan
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty plan with a page title
    pub fn with_title(title: &str) -> Self {
        Self {
            elements: Vec::new(),
            meta: Meta {
                title: title.to_string(),
            },
        }
    }

    // =======================================================================
    // Loading
    // =======================================================================

    /// Parse a plan from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Content exceeds the size limit
    /// - The JSON is invalid (a descriptor missing its `element` field
    ///   surfaces here as a parse error)
    /// - Element or attribute counts exceed their limits
    pub fn from_json_str(content: &str) -> Result<Self> {
        if content.len() > config::MAX_PLAN_SIZE {
            tracing::warn!(
                size = content.len(),
                max = config::MAX_PLAN_SIZE,
                "Plan content exceeds size limit"
            );
            return Err(BuildError::LoadError(format!(
                "Plan exceeds maximum size limit ({} bytes)",
                config::MAX_PLAN_SIZE
            )));
        }

        let plan: Self = serde_json::from_str(content).map_err(BuildError::JsonError)?;
        plan.validate_limits()?;

        tracing::debug!(
            elements = plan.elements.len(),
            title = %plan.meta.title,
            "Parsed site plan"
        );
        Ok(plan)
    }

    /// Load a plan from a JSON file.
    ///
    /// Error messages are sanitized to not expose full paths.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        tracing::debug!(path = %path_ref.display(), "Loading site plan from file");

        let metadata = fs::metadata(path_ref)
            .map_err(|_| BuildError::LoadError("Failed to access plan file".to_string()))?;
        if metadata.len() as usize > config::MAX_PLAN_SIZE {
            return Err(BuildError::LoadError(format!(
                "File exceeds maximum size limit ({} bytes)",
                config::MAX_PLAN_SIZE
            )));
        }

        let content = fs::read_to_string(path_ref)
            .map_err(|_| BuildError::LoadError("Failed to read plan file".to_string()))?;
        Self::from_json_str(&content)
    }

    /// Serialize the plan to wire-format JSON.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(self).map_err(BuildError::JsonError)
    }

    fn validate_limits(&self) -> Result<()> {
        if self.elements.len() > config::MAX_ELEMENTS {
            return Err(BuildError::LoadError(format!(
                "Too many elements ({}, max {})",
                self.elements.len(),
                config::MAX_ELEMENTS
            )));
        }
        for element in &self.elements {
            if element.attributes.len() > config::MAX_ATTRIBUTES {
                return Err(BuildError::LoadError(format!(
                    "Too many attributes on element '{}' ({}, max {})",
                    element.id,
                    element.attributes.len(),
                    config::MAX_ATTRIBUTES
                )));
            }
        }
        Ok(())
    }

    // =======================================================================
    // Device-side construction
    // =======================================================================

    /// Append a plain element to the plan.
    pub fn add_element(&mut self, id: &str, kind: &str, content: &str, parent: &str) {
        self.elements
            .push(ElementDescriptor::new(id, kind, content, parent));
    }

    /// Append a form field bound to a configuration key.
    ///
    /// The element is tagged with the configuration marker attribute so
    /// the submitter can find it later. An empty `config_key` adds a
    /// plain element.
    pub fn add_config_element(
        &mut self,
        id: &str,
        kind: &str,
        content: &str,
        parent: &str,
        config_key: &str,
    ) {
        let mut descriptor = ElementDescriptor::new(id, kind, content, parent);
        if !config_key.is_empty() {
            descriptor
                .attributes
                .set(config::CONFIG_MARKER_ATTR, config_key);
        }
        self.elements.push(descriptor);
    }

    /// Set an attribute on a previously added element.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::UnknownElement` if no element carries the id.
    pub fn set_element_attribute(
        &mut self,
        id: &str,
        name: &str,
        value: impl Into<crate::types::AttrValue>,
    ) -> Result<()> {
        let element = self
            .elements
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| BuildError::UnknownElement(id.to_string()))?;
        element.attributes.set(name, value);
        Ok(())
    }

    /// Drop all elements, keeping the metadata.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Prefill form fields from stored configuration values.
    ///
    /// Every element tagged with the configuration marker gets its `value`
    /// attribute set from `values` (missing keys prefill with an empty
    /// string, which the falsy-drop rule later discards). Password fields
    /// are never echoed back: they get an empty value and an explanatory
    /// placeholder instead.
    pub fn apply_stored_values(&mut self, values: &HashMap<String, String>) {
        for element in &mut self.elements {
            let Some(key) = element.attributes.get_str(config::CONFIG_MARKER_ATTR) else {
                continue;
            };
            if element.attributes.get_str("type") == Some("password") {
                element
                    .attributes
                    .set("placeholder", config::PASSWORD_PLACEHOLDER);
                element.attributes.set("value", "");
            } else {
                let stored = values.get(key).cloned().unwrap_or_default();
                element.attributes.set("value", stored);
            }
        }
    }
}
