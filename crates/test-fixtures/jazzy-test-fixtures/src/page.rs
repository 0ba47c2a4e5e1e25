//! In-memory page implementing `Host` for tests and benches.
//!
//! Geometry is one-dimensional: every element has a document-relative top and
//! a height, and the page has a scroll position and a viewport height.

use std::collections::BTreeMap;

use serde::Deserialize;

use jazzy_reveal_core::{
    is_eligible, AddedNode, Capabilities, Host, IntersectionEntry, MutationRecord, ObserveOptions,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

/// Declarative element description, used by JSON page fixtures and `insert`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ElementSpec {
    pub attrs: BTreeMap<String, String>,
    pub classes: Vec<String>,
    pub text: Option<String>,
    /// Document-relative top in px.
    pub top: f64,
    pub height: f64,
    pub children: Vec<ElementSpec>,
}

impl ElementSpec {
    pub fn new(top: f64) -> Self {
        Self {
            top,
            height: 40.0,
            ..Default::default()
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    /// Shorthand for the `data-jazzy` marker with `tag` as behavior.
    pub fn jazzy(self, tag: &str) -> Self {
        self.attr(jazzy_reveal_core::markers::MARKER_ATTR, tag)
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct PageSpec {
    #[serde(default = "default_viewport")]
    pub viewport_height: f64,
    #[serde(default)]
    pub capabilities: Capabilities,
    #[serde(default)]
    pub elements: Vec<ElementSpec>,
}

fn default_viewport() -> f64 {
    800.0
}

#[derive(Clone, Debug)]
struct Node {
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    text: Option<String>,
    style: BTreeMap<String, String>,
    top: f64,
    height: f64,
}

/// Handle for one simulated intersection observer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FakeObserver(pub u32);

#[derive(Clone, Debug)]
struct ObserverRecord {
    element: ElementId,
    options: ObserveOptions,
    connected: bool,
}

#[derive(Debug, Default)]
pub struct FakePage {
    nodes: Vec<Node>,
    roots: Vec<ElementId>,
    capabilities: Capabilities,
    viewport_height: f64,
    scroll_y: f64,
    observers: Vec<ObserverRecord>,
    observer_failure: bool,
    watching: bool,
    watch_calls: u32,
    mutations: Vec<MutationRecord<ElementId>>,
    text_writes: BTreeMap<ElementId, Vec<String>>,
}

impl FakePage {
    pub fn new(capabilities: Capabilities, viewport_height: f64) -> Self {
        Self {
            capabilities,
            viewport_height,
            ..Default::default()
        }
    }

    /// Page with intersection observers and no orientation signal.
    pub fn observing(viewport_height: f64) -> Self {
        Self::new(
            Capabilities {
                intersection_observer: true,
                device_orientation: false,
            },
            viewport_height,
        )
    }

    /// Page without intersection observers (polling fallback).
    pub fn polling(viewport_height: f64) -> Self {
        Self::new(Capabilities::default(), viewport_height)
    }

    pub fn from_spec(spec: PageSpec) -> Self {
        let mut page = Self::new(spec.capabilities, spec.viewport_height);
        for el in spec.elements {
            page.build(None, el);
        }
        page
    }

    pub fn set_capabilities(&mut self, capabilities: Capabilities) {
        self.capabilities = capabilities;
    }

    /// Make every following `observe` call fail, like a browser that refuses
    /// to construct an `IntersectionObserver`.
    pub fn fail_observers(&mut self, fail: bool) {
        self.observer_failure = fail;
    }

    fn build(&mut self, parent: Option<ElementId>, spec: ElementSpec) -> ElementId {
        let id = ElementId(self.nodes.len() as u32);
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            attrs: spec.attrs,
            classes: spec.classes,
            text: spec.text,
            style: BTreeMap::new(),
            top: spec.top,
            height: spec.height,
        });
        match parent {
            Some(p) => self.nodes[p.0 as usize].children.push(id),
            None => self.roots.push(id),
        }
        for child in spec.children {
            self.build(Some(id), child);
        }
        id
    }

    /// Append an element subtree. While the document is watched this queues
    /// one mutation record whose only added node is the subtree root.
    pub fn insert(&mut self, parent: Option<ElementId>, spec: ElementSpec) -> ElementId {
        let id = self.build(parent, spec);
        if self.watching {
            self.mutations.push(MutationRecord::added([id]));
        }
        id
    }

    /// Record a text node insertion (non-element added node).
    pub fn insert_text(&mut self, _parent: Option<ElementId>) {
        if self.watching {
            self.mutations.push(MutationRecord {
                added_nodes: vec![AddedNode::Other],
            });
        }
    }

    /// Queued mutation records, as one delivered batch.
    pub fn take_mutations(&mut self) -> Vec<MutationRecord<ElementId>> {
        std::mem::take(&mut self.mutations)
    }

    pub fn scroll_to(&mut self, y: f64) {
        self.scroll_y = y;
    }

    pub fn resize(&mut self, viewport_height: f64) {
        self.viewport_height = viewport_height;
    }

    /// First element whose `id` attribute equals `name`.
    pub fn find(&self, name: &str) -> Option<ElementId> {
        self.nodes
            .iter()
            .position(|n| n.attrs.get("id").map(String::as_str) == Some(name))
            .map(|i| ElementId(i as u32))
    }

    pub fn get(&self, name: &str) -> ElementId {
        self.find(name)
            .unwrap_or_else(|| panic!("no element with id '{name}'"))
    }

    pub fn classes(&self, id: ElementId) -> &[String] {
        &self.node(id).classes
    }

    pub fn style(&self, id: ElementId, property: &str) -> Option<&str> {
        self.node(id).style.get(property).map(String::as_str)
    }

    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.node(id).text.as_deref()
    }

    /// Every text value written through `Host::set_text_content`, in order.
    pub fn text_writes(&self, id: ElementId) -> &[String] {
        self.text_writes.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_watching(&self) -> bool {
        self.watching
    }

    pub fn watch_calls(&self) -> u32 {
        self.watch_calls
    }

    pub fn connected_observers(&self) -> usize {
        self.observers.iter().filter(|o| o.connected).count()
    }

    pub fn observer_options(&self, id: ElementId) -> Option<&ObserveOptions> {
        self.observers
            .iter()
            .rev()
            .find(|o| o.element == id)
            .map(|o| &o.options)
    }

    /// One entry per connected observer, computed from current geometry and
    /// each observer's bottom margin.
    pub fn intersections(&self) -> Vec<IntersectionEntry<ElementId>> {
        self.observers
            .iter()
            .filter(|o| o.connected)
            .map(|o| {
                let node = self.node(o.element);
                let top = node.top - self.scroll_y;
                let bottom_edge = self.viewport_height + bottom_margin(&o.options);
                let visible = (top + node.height).min(bottom_edge) - top.max(0.0);
                let intersection_ratio = if node.height > 0.0 {
                    (visible / node.height).clamp(0.0, 1.0)
                } else if top >= 0.0 && top < bottom_edge {
                    1.0
                } else {
                    0.0
                };
                IntersectionEntry {
                    target: o.element,
                    intersection_ratio,
                    top,
                }
            })
            .collect()
    }

    fn node(&self, id: ElementId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    fn node_mut(&mut self, id: ElementId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    fn descendants(&self, id: ElementId, out: &mut Vec<ElementId>) {
        for &child in &self.node(id).children {
            out.push(child);
            self.descendants(child, out);
        }
    }
}

/// Bottom component of a `top right bottom left` px margin.
fn bottom_margin(options: &ObserveOptions) -> f64 {
    options
        .root_margin
        .split_whitespace()
        .nth(2)
        .and_then(|s| s.trim_end_matches("px").parse().ok())
        .unwrap_or(0.0)
}

impl Host for FakePage {
    type Element = ElementId;
    type Observer = FakeObserver;

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn query_eligible(&self, scope: Option<&ElementId>) -> Vec<ElementId> {
        let mut all = Vec::new();
        match scope {
            Some(root) => self.descendants(*root, &mut all),
            None => {
                for &root in &self.roots {
                    all.push(root);
                    self.descendants(root, &mut all);
                }
            }
        }
        all.retain(|id| is_eligible(self, id));
        all
    }

    fn attribute(&self, element: &ElementId, name: &str) -> Option<String> {
        self.node(*element).attrs.get(name).cloned()
    }

    fn has_class(&self, element: &ElementId, class: &str) -> bool {
        self.node(*element).classes.iter().any(|c| c == class)
    }

    fn add_class(&mut self, element: &ElementId, class: &str) {
        let node = self.node_mut(*element);
        if !node.classes.iter().any(|c| c == class) {
            node.classes.push(class.to_string());
        }
    }

    fn text_content(&self, element: &ElementId) -> Option<String> {
        self.node(*element).text.clone()
    }

    fn set_text_content(&mut self, element: &ElementId, text: &str) {
        self.node_mut(*element).text = Some(text.to_string());
        self.text_writes
            .entry(*element)
            .or_default()
            .push(text.to_string());
    }

    fn set_style(&mut self, element: &ElementId, property: &str, value: &str) {
        self.node_mut(*element)
            .style
            .insert(property.to_string(), value.to_string());
    }

    fn bounding_top(&self, element: &ElementId) -> f64 {
        self.node(*element).top - self.scroll_y
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn observe(&mut self, element: &ElementId, options: &ObserveOptions) -> Option<FakeObserver> {
        if self.observer_failure {
            return None;
        }
        let handle = FakeObserver(self.observers.len() as u32);
        self.observers.push(ObserverRecord {
            element: *element,
            options: options.clone(),
            connected: true,
        });
        Some(handle)
    }

    fn disconnect(&mut self, observer: FakeObserver) {
        if let Some(rec) = self.observers.get_mut(observer.0 as usize) {
            rec.connected = false;
        }
    }

    fn watch_mutations(&mut self) {
        self.watching = true;
        self.watch_calls += 1;
    }

    fn unwatch_mutations(&mut self) {
        self.watching = false;
        self.mutations.clear();
    }
}
