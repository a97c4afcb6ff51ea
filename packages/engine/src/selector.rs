//! Selector parsing for parent references
//!
//! Descriptors name their intended parent with a tiny selector language:
//!
//! 1. **Id selector**: `#id` — the element carrying this id
//! 2. **Tag selector**: a bare tag name (e.g. `body`, `head`) — the first
//!    element with this tag in document order
//!
//! Compound CSS selectors are not supported; the portal page contract only
//! ever uses the two forms above.
//!
//! # Examples
//!
//! ```
//! use siteweaver_engine::selector::Selector;
//!
//! let sel = Selector::parse("#configform").unwrap();
//! assert_eq!(sel, Selector::Id("configform".to_string()));
//!
//! let sel = Selector::parse("body").unwrap();
//! assert_eq!(sel, Selector::Tag("body".to_string()));
//! assert_eq!(sel.to_string(), "body");
//! ```

use crate::error::{BuildError, Result};
use std::fmt;

/// Parsed parent selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `#id` — the element carrying this id
    Id(String),
    /// Bare tag name — first element with this tag in document order
    Tag(String),
}

impl Selector {
    /// Parse a selector string into its components.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::InvalidSelector` if the string is empty, the
    /// id part after `#` is empty, or the selector uses compound CSS
    /// syntax (combinators, classes, attribute filters).
    pub fn parse(selector: &str) -> Result<Self> {
        if let Some(id) = selector.strip_prefix('#') {
            if id.is_empty() {
                return Err(BuildError::InvalidSelector(
                    "Id selector cannot be empty".to_string(),
                ));
            }
            if id.contains(|c: char| c.is_whitespace() || "#.[>+~".contains(c)) {
                return Err(BuildError::InvalidSelector(format!(
                    "Compound selectors are not supported, got: {selector}"
                )));
            }
            return Ok(Selector::Id(id.to_string()));
        }

        if selector.is_empty() {
            return Err(BuildError::InvalidSelector(
                "Selector cannot be empty".to_string(),
            ));
        }
        if selector.contains(|c: char| c.is_whitespace() || "#.[>+~".contains(c)) {
            return Err(BuildError::InvalidSelector(format!(
                "Compound selectors are not supported, got: {selector}"
            )));
        }

        Ok(Selector::Tag(selector.to_string()))
    }

    /// Build an id selector for the given element id
    pub fn for_id(id: &str) -> Self {
        Selector::Id(id.to_string())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Id(id) => write!(f, "#{id}"),
            Selector::Tag(tag) => write!(f, "{tag}"),
        }
    }
}
