//! Portal service layer: plan loading and configuration submission
//!
//! Glue between the tree builder and the device. The actual wire protocol
//! lives behind the [`Transport`] trait so the engine stays independent of
//! any HTTP client; hosts plug in their own implementation, tests use an
//! in-memory fake.
//!
//! # Example
//!
//! ```ignore
//! use siteweaver_engine::{Document, SiteService, collect_configuration};
//!
//! let service = SiteService::new(transport);
//! let mut doc = Document::new();
//! let meta = service.load(&mut doc)?;
//!
//! // ... user fills in the form ...
//! let payload = collect_configuration(&doc)?;
//! service.submit(&payload)?;
//! ```

use crate::builder::SiteBuilder;
use crate::config;
use crate::dom::Document;
use crate::error::{BuildError, Result};
use crate::plan::{Meta, SitePlan};
use crate::types::Attributes;
use indexmap::IndexMap;

/// Response from fetching the plan resource
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// HTTP-style status code
    pub status: u16,
    /// Response body (expected: plan JSON)
    pub body: String,
}

/// Transport seam towards the device.
///
/// Implement this to provide the actual fetch/POST mechanics. The
/// endpoints are fixed by the page contract ([`config::PLAN_ENDPOINT`]
/// and [`config::SUBMIT_ENDPOINT`]) and passed in by [`SiteService`].
pub trait Transport {
    /// Fetch the site plan JSON resource at `endpoint`.
    fn fetch_plan(&self, endpoint: &str) -> Result<FetchResponse>;

    /// POST the form payload to `endpoint`.
    ///
    /// # Returns
    /// The response status code.
    fn submit(&self, endpoint: &str, form: &FormPayload) -> Result<u16>;
}

impl<T: Transport> Transport for &T {
    fn fetch_plan(&self, endpoint: &str) -> Result<FetchResponse> {
        T::fetch_plan(self, endpoint)
    }

    fn submit(&self, endpoint: &str, form: &FormPayload) -> Result<u16> {
        T::submit(self, endpoint, form)
    }
}

/// Ordered form payload with set-semantics per key.
///
/// Setting a key that already exists overwrites its value but keeps its
/// original position, mirroring `FormData.set`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormPayload {
    entries: IndexMap<String, String>,
}

impl FormPayload {
    /// Create an empty payload
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a key, overwriting any existing value
    pub fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    /// Look up a value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries are set
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Loader and submitter for one portal page.
pub struct SiteService<T: Transport> {
    transport: T,
}

impl<T: Transport> SiteService<T> {
    /// Create a service over the given transport
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Fetch the plan, build the page into `doc` and set its title.
    ///
    /// On transport failure, a non-success status or an unparsable plan,
    /// a user-visible error heading (kind `h1`, id `error`, red-styled)
    /// is appended under the root container and the error is returned.
    /// Nodes built before a failure stay in the tree; there is no
    /// rollback.
    pub fn load(&self, doc: &mut Document) -> Result<Meta> {
        let response = match self.transport.fetch_plan(config::PLAN_ENDPOINT) {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(error = %err, "Plan fetch failed");
                render_error(doc, "Could not load configuration");
                return Err(err);
            }
        };

        if response.status != 200 {
            tracing::warn!(status = response.status, "Plan fetch returned non-success status");
            render_error(
                doc,
                &format!("Could not load configuration: {}", response.status),
            );
            return Err(BuildError::FetchRejected(response.status));
        }

        let plan = match SitePlan::from_json_str(&response.body) {
            Ok(plan) => plan,
            Err(err) => {
                tracing::warn!(error = %err, "Plan body is not a valid site plan");
                render_error(doc, "Could not load configuration");
                return Err(err);
            }
        };

        SiteBuilder::new(doc).build(&plan.elements);
        doc.set_title(&plan.meta.title);
        Ok(plan.meta)
    }

    /// POST a collected payload to the configuration endpoint.
    ///
    /// # Errors
    ///
    /// `BuildError::SubmitRejected` when the device answers with a
    /// non-2xx status.
    pub fn submit(&self, payload: &FormPayload) -> Result<u16> {
        tracing::debug!(fields = payload.len(), "Sending configuration");
        let status = self.transport.submit(config::SUBMIT_ENDPOINT, payload)?;
        if !(200..300).contains(&status) {
            return Err(BuildError::SubmitRejected(status));
        }
        Ok(status)
    }
}

/// Append the red error heading under the root container.
fn render_error(doc: &mut Document, message: &str) {
    let mut attrs = Attributes::new();
    attrs.set("style", "color:red");
    SiteBuilder::new(doc).add_node("h1", "error", message, &attrs, config::DEFAULT_ROOT_SELECTOR);
}

/// Collect the configuration form from the live tree.
///
/// Scans `body` for nodes tagged with the configuration marker attribute
/// in reverse document order and reads their `value` attribute (tagged
/// nodes outside `body`, e.g. under `head`, are out of scope). A tagged
/// node that carries `required` but holds an empty value aborts the
/// collection. Entries with an empty key or value are skipped; on
/// duplicate keys the reverse scan means the node earliest in document
/// order wins.
pub fn collect_configuration(doc: &Document) -> Result<FormPayload> {
    let mut payload = FormPayload::new();
    let scope = doc.first_by_tag("body").unwrap_or(doc.root());
    let nodes = doc.descendants(scope);
    for &node in nodes.iter().rev() {
        let Some(key) = doc.attr(node, config::CONFIG_MARKER_ATTR) else {
            continue;
        };
        let value = doc.attr(node, "value").unwrap_or("");
        if doc.attr(node, "required").is_some() && value.is_empty() {
            return Err(BuildError::MissingRequiredField(key.to_string()));
        }
        if !value.is_empty() && !key.is_empty() {
            payload.set(key, value);
        }
    }
    Ok(payload)
}
