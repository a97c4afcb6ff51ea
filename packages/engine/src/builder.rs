//! Element materialization and parent-ordered tree building
//!
//! [`SiteBuilder`] turns a flat descriptor list into live nodes. Two
//! layers:
//!
//! - [`SiteBuilder::configure`] materializes one descriptor, deciding how
//!   many nodes it yields (labelled inputs yield two) — the element
//!   configurator.
//! - [`SiteBuilder::build`] drives a whole list in parent-availability
//!   order: descriptors are grouped by parent selector and processed
//!   breadth-first from the root container, so a node always exists
//!   before anything asks to be placed under it. Within a group, source
//!   order is kept.
//!
//! The breadth-first pass terminates on all input: when no discovered
//! parent key matches a pending group, the queue is re-seeded with the
//! parent named by the earliest remaining descriptor, which drains at
//! least one group per re-seed. Descriptors whose parent never
//! materializes still get placed, falling back to the root container at
//! attachment time.

use crate::config;
use crate::dom::{Document, NodeId};
use crate::plan::ElementDescriptor;
use crate::types::Attributes;
use indexmap::IndexMap;
use std::collections::VecDeque;

/// Materializes descriptors into a [`Document`].
pub struct SiteBuilder<'a> {
    doc: &'a mut Document,
}

impl<'a> SiteBuilder<'a> {
    /// Create a builder over the given document
    pub fn new(doc: &'a mut Document) -> Self {
        Self { doc }
    }

    /// Node creation primitive.
    ///
    /// Creates one element of `kind`; a non-empty `content` becomes its
    /// only text child; a non-empty `id` becomes its id attribute; only
    /// truthy attributes are applied (falsy-drop rule); the parent
    /// selector resolves with silent fallback to the root container.
    ///
    /// # Returns
    /// The id of the created node.
    pub fn add_node(
        &mut self,
        kind: &str,
        id: &str,
        content: &str,
        attributes: &Attributes,
        parent_selector: &str,
    ) -> NodeId {
        let node = self.doc.create_element(kind);
        if !content.is_empty() {
            let text = self.doc.create_text(content);
            self.doc.append_child(node, text);
        }
        if !id.is_empty() {
            self.doc.set_attribute(node, "id", id);
        }
        for (name, value) in attributes.truthy() {
            self.doc.set_attribute(node, name, &value);
        }
        let parent = self.doc.resolve_or_root(parent_selector);
        self.doc.append_child(parent, node);
        node
    }

    /// Materialize one descriptor.
    ///
    /// An `input` with non-empty content is treated as a labelled form
    /// field: a label with the synthesized id `labelfor{id}` and a `for`
    /// attribute is created under the descriptor's parent, and the input
    /// itself is nested inside that label (the implicit-label-wrapping
    /// pattern). Every other kind — including an input without content —
    /// yields exactly one node.
    pub fn configure(&mut self, descriptor: &ElementDescriptor) {
        match descriptor.kind.as_str() {
            "input" if !descriptor.content.is_empty() => {
                let label_id = format!("{}{}", config::LABEL_ID_PREFIX, descriptor.id);
                let mut label_attrs = Attributes::new();
                label_attrs.set("for", descriptor.id.as_str());
                self.add_node(
                    "label",
                    &label_id,
                    &descriptor.content,
                    &label_attrs,
                    &descriptor.parent,
                );
                self.add_node(
                    &descriptor.kind,
                    &descriptor.id,
                    "",
                    &descriptor.attributes,
                    &format!("#{label_id}"),
                );
            }
            _ => {
                self.add_node(
                    &descriptor.kind,
                    &descriptor.id,
                    &descriptor.content,
                    &descriptor.attributes,
                    &descriptor.parent,
                );
            }
        }
    }

    /// Materialize a whole descriptor list in parent-availability order.
    ///
    /// Calling `build` twice on the same list duplicates every node; the
    /// builder holds no memo of what it already placed.
    pub fn build(&mut self, descriptors: &[ElementDescriptor]) {
        // Index descriptors by parent key; groups keep source order.
        let mut groups: IndexMap<&str, VecDeque<usize>> = IndexMap::new();
        for (idx, descriptor) in descriptors.iter().enumerate() {
            groups
                .entry(descriptor.parent.as_str())
                .or_default()
                .push_back(idx);
        }

        let mut queue: VecDeque<String> = VecDeque::new();
        queue.push_back(config::DEFAULT_ROOT_SELECTOR.to_string());

        let mut placed = 0;
        while placed < descriptors.len() {
            let key = match queue.pop_front() {
                Some(key) => key,
                None => match self.earliest_pending_parent(&groups) {
                    Some(key) => key,
                    None => break,
                },
            };

            let Some(group) = groups.get_mut(key.as_str()) else {
                continue;
            };
            while let Some(idx) = group.pop_front() {
                let descriptor = &descriptors[idx];
                self.configure(descriptor);
                placed += 1;

                // The new node's id (and a labelled input's synthesized
                // label id) become valid parent keys for later groups.
                if !descriptor.id.is_empty() {
                    queue.push_back(format!("#{}", descriptor.id));
                    if descriptor.kind == "input" && !descriptor.content.is_empty() {
                        queue.push_back(format!(
                            "#{}{}",
                            config::LABEL_ID_PREFIX,
                            descriptor.id
                        ));
                    }
                }
            }
        }

        tracing::debug!(elements = placed, "Site build complete");
    }

    /// Parent key of the earliest descriptor not yet placed.
    ///
    /// Re-seed key for groups breadth-first discovery never reaches, e.g.
    /// subtrees rooted at `head` or `body` instead of the root container.
    fn earliest_pending_parent(&self, groups: &IndexMap<&str, VecDeque<usize>>) -> Option<String> {
        groups
            .iter()
            .filter_map(|(key, group)| group.front().map(|&idx| (idx, *key)))
            .min_by_key(|&(idx, _)| idx)
            .map(|(_, key)| key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::SitePlan;

    fn build_plan(plan: &SitePlan) -> Document {
        let mut doc = Document::new();
        SiteBuilder::new(&mut doc).build(&plan.elements);
        doc
    }

    fn tag_of(doc: &Document, id: NodeId) -> String {
        doc.element(id).map(|e| e.tag.clone()).unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Node creation primitive
    // -------------------------------------------------------------------------

    #[test]
    fn test_add_node_basic() {
        let mut doc = Document::new();
        let mut builder = SiteBuilder::new(&mut doc);
        let mut attrs = Attributes::new();
        attrs.set("class", "fat-border");
        let node = builder.add_node("h1", "heading", "Device", &attrs, "#wrapper");

        assert_eq!(doc.attr(node, "id"), Some("heading"));
        assert_eq!(doc.attr(node, "class"), Some("fat-border"));
        let text = doc.children(node)[0];
        assert_eq!(doc.text(text), Some("Device"));

        let wrapper = doc.get_element_by_id("wrapper").unwrap();
        assert_eq!(doc.children(wrapper), &[node]);
    }

    #[test]
    fn test_add_node_falsy_attributes_dropped() {
        let mut doc = Document::new();
        let mut builder = SiteBuilder::new(&mut doc);
        let mut attrs = Attributes::new();
        attrs.set("placeholder", "x");
        attrs.set("disabled", "");
        let node = builder.add_node("input", "age", "", &attrs, "#wrapper");

        assert_eq!(doc.attr(node, "placeholder"), Some("x"));
        assert_eq!(doc.attr(node, "disabled"), None);
    }

    #[test]
    fn test_add_node_missing_parent_falls_back_to_root() {
        let mut doc = Document::new();
        let mut builder = SiteBuilder::new(&mut doc);
        let node = builder.add_node("p", "note", "hi", &Attributes::new(), "#nowhere");

        let wrapper = doc.get_element_by_id("wrapper").unwrap();
        assert_eq!(doc.children(wrapper), &[node]);
    }

    // -------------------------------------------------------------------------
    // Configurator dispatch
    // -------------------------------------------------------------------------

    #[test]
    fn test_configure_input_with_content_synthesizes_label() {
        let mut plan = SitePlan::new();
        plan.add_element("email", "input", "Email", "#wrapper");
        let doc = build_plan(&plan);

        let wrapper = doc.get_element_by_id("wrapper").unwrap();
        let label = doc.get_element_by_id("labelforemail").unwrap();
        assert_eq!(doc.children(wrapper), &[label]);
        assert_eq!(tag_of(&doc, label), "label");
        assert_eq!(doc.attr(label, "for"), Some("email"));

        // Label carries the text, and the input nests inside the label
        let label_children = doc.children(label);
        assert_eq!(doc.text(label_children[0]), Some("Email"));
        let input = doc.get_element_by_id("email").unwrap();
        assert_eq!(label_children[1], input);
        assert_eq!(tag_of(&doc, input), "input");
        // No text child on the input itself
        assert!(doc.children(input).is_empty());
    }

    #[test]
    fn test_configure_input_without_content_is_generic() {
        let mut plan = SitePlan::new();
        plan.add_element("age", "input", "", "#wrapper");
        plan.set_element_attribute("age", "type", "number").unwrap();
        let doc = build_plan(&plan);

        assert_eq!(doc.get_element_by_id("labelforage"), None);
        let input = doc.get_element_by_id("age").unwrap();
        assert_eq!(doc.attr(input, "type"), Some("number"));
        let wrapper = doc.get_element_by_id("wrapper").unwrap();
        assert_eq!(doc.children(wrapper), &[input]);
    }

    #[test]
    fn test_configure_unknown_kind_creates_generic_node() {
        let mut plan = SitePlan::new();
        plan.add_element("custom", "blink", "hi", "#wrapper");
        let doc = build_plan(&plan);

        let node = doc.get_element_by_id("custom").unwrap();
        assert_eq!(tag_of(&doc, node), "blink");
    }

    // -------------------------------------------------------------------------
    // Build ordering
    // -------------------------------------------------------------------------

    #[test]
    fn test_build_siblings_keep_source_order() {
        let mut plan = SitePlan::new();
        plan.add_element("a", "p", "A", "#wrapper");
        plan.add_element("b", "p", "B", "#wrapper");
        plan.add_element("c", "p", "C", "#wrapper");
        let doc = build_plan(&plan);

        let wrapper = doc.get_element_by_id("wrapper").unwrap();
        let ids: Vec<Option<&str>> = doc
            .children(wrapper)
            .iter()
            .map(|&c| doc.element(c).and_then(|e| e.id.as_deref()))
            .collect();
        assert_eq!(ids, vec![Some("a"), Some("b"), Some("c")]);
    }

    #[test]
    fn test_build_child_listed_before_parent() {
        // The child's group is only discovered after the parent
        // materializes; list order must not matter.
        let mut plan = SitePlan::new();
        plan.add_element("inner", "span", "x", "#box");
        plan.add_element("box", "div", "", "#wrapper");
        let doc = build_plan(&plan);

        let boxed = doc.get_element_by_id("box").unwrap();
        let inner = doc.get_element_by_id("inner").unwrap();
        assert_eq!(doc.children(boxed), &[inner]);
    }

    #[test]
    fn test_build_nested_form() {
        let mut plan = SitePlan::new();
        plan.add_element("configform", "form", "", "#wrapper");
        plan.add_element("WifiEssid", "input", "WIFI SSID:", "#configform");
        plan.add_element("WifiPassword", "input", "WIFI Password:", "#configform");
        let doc = build_plan(&plan);

        let form = doc.get_element_by_id("configform").unwrap();
        let labels: Vec<Option<&str>> = doc
            .children(form)
            .iter()
            .map(|&c| doc.element(c).and_then(|e| e.id.as_deref()))
            .collect();
        assert_eq!(
            labels,
            vec![Some("labelforWifiEssid"), Some("labelforWifiPassword")]
        );
        // Inputs sit inside their labels
        let essid = doc.get_element_by_id("WifiEssid").unwrap();
        let label = doc.get_element_by_id("labelforWifiEssid").unwrap();
        assert_eq!(doc.children(label).last(), Some(&essid));
    }

    #[test]
    fn test_build_subtree_under_tag_selector() {
        // "head" and "body" parents are never discovered from #wrapper;
        // the re-seed path must pick them up.
        let mut plan = SitePlan::new();
        plan.add_element("title", "title", "Device", "head");
        plan.add_element("footer", "footer", "Powered by", "body");
        plan.add_element("heading", "h1", "Hello", "#wrapper");
        let doc = build_plan(&plan);

        let head = doc.first_by_tag("head").unwrap();
        let title = doc.get_element_by_id("title").unwrap();
        assert_eq!(doc.children(head), &[title]);

        let body = doc.first_by_tag("body").unwrap();
        let footer = doc.get_element_by_id("footer").unwrap();
        assert!(doc.children(body).contains(&footer));

        let wrapper = doc.get_element_by_id("wrapper").unwrap();
        let heading = doc.get_element_by_id("heading").unwrap();
        assert_eq!(doc.children(wrapper), &[heading]);
    }

    #[test]
    fn test_build_attach_under_synthesized_label() {
        // A descriptor may name a synthesized label id as its parent.
        let mut plan = SitePlan::new();
        plan.add_element("email", "input", "Email", "#wrapper");
        plan.add_element("hint", "small", "required", "#labelforemail");
        let doc = build_plan(&plan);

        let label = doc.get_element_by_id("labelforemail").unwrap();
        let hint = doc.get_element_by_id("hint").unwrap();
        assert_eq!(doc.children(label).last(), Some(&hint));
    }

    #[test]
    fn test_build_twice_duplicates_nodes() {
        // No hidden memoization: a second pass appends everything again.
        let mut plan = SitePlan::new();
        plan.add_element("a", "p", "A", "#wrapper");
        let mut doc = Document::new();
        SiteBuilder::new(&mut doc).build(&plan.elements);
        SiteBuilder::new(&mut doc).build(&plan.elements);

        let wrapper = doc.get_element_by_id("wrapper").unwrap();
        assert_eq!(doc.children(wrapper).len(), 2);
    }

    #[test]
    fn test_build_terminates_on_unsatisfiable_parents() {
        // Both parents point at ids that never exist; everything falls
        // back to the root container instead of looping.
        let mut plan = SitePlan::new();
        plan.add_element("a", "p", "A", "#ghost1");
        plan.add_element("b", "p", "B", "#ghost2");
        let doc = build_plan(&plan);

        let wrapper = doc.get_element_by_id("wrapper").unwrap();
        assert_eq!(doc.children(wrapper).len(), 2);
    }

    #[test]
    fn test_build_cyclic_parents_terminate() {
        // a names b as parent and b names a. Neither exists when first
        // needed; the re-seed path places the earliest one under the root
        // container, after which the other resolves normally.
        let mut plan = SitePlan::new();
        plan.add_element("a", "div", "", "#b");
        plan.add_element("b", "div", "", "#a");
        let doc = build_plan(&plan);

        let a = doc.get_element_by_id("a").unwrap();
        let b = doc.get_element_by_id("b").unwrap();
        let wrapper = doc.get_element_by_id("wrapper").unwrap();
        assert_eq!(doc.children(wrapper), &[a]);
        assert_eq!(doc.children(a), &[b]);
    }

    #[test]
    fn test_build_empty_list() {
        let doc = build_plan(&SitePlan::new());
        let wrapper = doc.get_element_by_id("wrapper").unwrap();
        assert!(doc.children(wrapper).is_empty());
    }
}
