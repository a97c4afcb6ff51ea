//! Siteweaver Engine
//!
//! A declarative UI builder for device configuration portals.
//! This library provides functionality for:
//! - Loading and parsing site plans (JSON descriptor lists + metadata)
//! - Materializing descriptors into a live document tree with
//!   parent-availability ordering and implicit label wrapping for inputs
//! - Collecting and submitting the configuration form back to the device
//!
//! # Example
//!
//! ```
//! use siteweaver_engine::{Document, SiteBuilder, SitePlan};
//!
//! let plan = SitePlan::from_json_str(r##"{
//!     "elements": [
//!         {"element": "input", "id": "email", "content": "Email", "parent": "#wrapper"}
//!     ],
//!     "meta": {"title": "My Device"}
//! }"##).unwrap();
//!
//! let mut doc = Document::new();
//! SiteBuilder::new(&mut doc).build(&plan.elements);
//! doc.set_title(&plan.meta.title);
//!
//! assert!(doc.get_element_by_id("labelforemail").is_some());
//! ```

pub mod builder;
pub mod config;
pub mod dom;
pub mod error;
pub mod plan;
pub mod selector;
pub mod service;
pub mod types;

// Re-export commonly used items
pub use builder::SiteBuilder;
pub use dom::{Document, ElementData, Node, NodeData, NodeId};
pub use error::{BuildError, Result};
pub use plan::{ElementDescriptor, Meta, SitePlan};
pub use selector::Selector;
pub use service::{collect_configuration, FetchResponse, FormPayload, SiteService, Transport};
pub use types::{AttrValue, Attributes};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
