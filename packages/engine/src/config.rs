//! Configuration constants for the siteweaver engine
//!
//! Centralized values used throughout the engine:
//! - Well-known selectors and attribute names of the portal page contract
//! - Security limits applied when parsing untrusted site plans
//!
//! # Security Considerations
//!
//! The limits prevent:
//! - JSON bombs (very large plan documents)
//! - Memory exhaustion (plans with huge element or attribute counts)
//!
//! # Customization
//!
//! Currently these are compile-time constants. Future versions may
//! support runtime configuration.

/// Selector of the default root container.
///
/// Every descriptor whose parent selector cannot be resolved against the
/// live tree is attached here instead. The container is seeded into every
/// fresh [`crate::dom::Document`].
pub const DEFAULT_ROOT_SELECTOR: &str = "#wrapper";

/// Prefix used to synthesize label ids for labelled inputs.
///
/// An input descriptor with id `email` and non-empty content gets a label
/// with id `labelforemail`, and the input itself is nested inside it.
pub const LABEL_ID_PREFIX: &str = "labelfor";

/// Marker attribute that tags a node as a configuration form field.
///
/// Its value names the configuration key the field maps to.
pub const CONFIG_MARKER_ATTR: &str = "data-config";

/// Placeholder text shown on password fields whose stored value is masked.
pub const PASSWORD_PLACEHOLDER: &str = "Password unchanged";

/// Resource path of the site plan document served by the device.
pub const PLAN_ENDPOINT: &str = "data.json";

/// Endpoint the configuration form payload is POSTed to.
pub const SUBMIT_ENDPOINT: &str = "/submitconfig";

/// Maximum site plan document size in bytes (1 MB).
///
/// Prevents JSON bomb attacks and excessive memory usage during parsing.
/// 1 MB is far beyond any reasonable configuration page (typical plans
/// are 1-10 KB).
pub const MAX_PLAN_SIZE: usize = 1_000_000;

/// Maximum number of element descriptors in a plan.
///
/// Prevents DoS via plans with extremely long element lists. 1000 elements
/// is sufficient for any reasonable configuration page.
pub const MAX_ELEMENTS: usize = 1_000;

/// Maximum number of attributes on a single element descriptor.
pub const MAX_ATTRIBUTES: usize = 100;
