//! `Host` over the browser DOM.

use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, MutationObserver, MutationObserverInit, Node, Window,
};

use jazzy_reveal_core::markers::ELIGIBLE_SELECTOR;
use jazzy_reveal_core::{AddedNode, Capabilities, Host, IntersectionEntry, MutationRecord, ObserveOptions};

fn has_key(target: &Object, key: &str) -> bool {
    Reflect::has(target, &JsValue::from_str(key)).unwrap_or(false)
}

/// Probe the window once for intersection observation (including
/// `intersectionRatio` on the entry prototype) and an orientation signal.
pub fn detect_capabilities(window: &Window) -> Capabilities {
    let ratio_supported = Reflect::get(window, &JsValue::from_str("IntersectionObserverEntry"))
        .and_then(|entry| Reflect::get(&entry, &JsValue::from_str("prototype")))
        .map(|proto| proto.is_object() && has_key(proto.unchecked_ref(), "intersectionRatio"))
        .unwrap_or(false);
    Capabilities {
        intersection_observer: has_key(window, "IntersectionObserver")
            && has_key(window, "IntersectionObserverEntry")
            && ratio_supported,
        device_orientation: has_key(window, "orientation"),
    }
}

fn collect_elements(list: Result<web_sys::NodeList, JsValue>) -> Vec<Element> {
    match list {
        Ok(list) => (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect(),
        Err(e) => {
            log::warn!("querySelectorAll failed: {e:?}");
            Vec::new()
        }
    }
}

/// Convert one intersection observer callback batch.
pub fn convert_entries(entries: &Array) -> Vec<IntersectionEntry<Element>> {
    entries
        .iter()
        .map(|v| v.unchecked_into::<IntersectionObserverEntry>())
        .map(|entry| IntersectionEntry {
            target: entry.target(),
            intersection_ratio: entry.intersection_ratio(),
            top: entry.bounding_client_rect().top(),
        })
        .collect()
}

/// Convert one mutation observer callback batch.
pub fn convert_records(records: &Array) -> Vec<MutationRecord<Element>> {
    records
        .iter()
        .map(|v| v.unchecked_into::<web_sys::MutationRecord>())
        .map(|record| {
            let added = record.added_nodes();
            let added_nodes = (0..added.length())
                .filter_map(|i| added.get(i))
                .map(|node| {
                    if node.node_type() == Node::ELEMENT_NODE {
                        node.dyn_into::<Element>()
                            .map(AddedNode::Element)
                            .unwrap_or(AddedNode::Other)
                    } else {
                        AddedNode::Other
                    }
                })
                .collect();
            MutationRecord { added_nodes }
        })
        .collect()
}

pub struct WebHost {
    window: Window,
    document: Document,
    capabilities: Capabilities,
    /// Shared callback for every per-element intersection observer.
    on_intersect: Function,
    mutations: MutationObserver,
}

impl WebHost {
    pub fn new(
        window: Window,
        document: Document,
        on_intersect: Function,
        mutations: MutationObserver,
    ) -> Self {
        Self {
            capabilities: detect_capabilities(&window),
            window,
            document,
            on_intersect,
            mutations,
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }
}

impl Host for WebHost {
    type Element = Element;
    type Observer = IntersectionObserver;

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn query_eligible(&self, scope: Option<&Element>) -> Vec<Element> {
        match scope {
            Some(root) => collect_elements(root.query_selector_all(ELIGIBLE_SELECTOR)),
            None => collect_elements(self.document.query_selector_all(ELIGIBLE_SELECTOR)),
        }
    }

    fn attribute(&self, element: &Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn has_class(&self, element: &Element, class: &str) -> bool {
        element.class_list().contains(class)
    }

    fn add_class(&mut self, element: &Element, class: &str) {
        if let Err(e) = element.class_list().add_1(class) {
            log::warn!("classList.add({class}) failed: {e:?}");
        }
    }

    fn text_content(&self, element: &Element) -> Option<String> {
        element.text_content()
    }

    fn set_text_content(&mut self, element: &Element, text: &str) {
        element.set_text_content(Some(text));
    }

    fn set_style(&mut self, element: &Element, property: &str, value: &str) {
        let Some(html) = element.dyn_ref::<HtmlElement>() else {
            log::trace!("{property} not set on non-HTML element");
            return;
        };
        if let Err(e) = html.style().set_property(property, value) {
            log::warn!("style.{property} = {value} failed: {e:?}");
        }
    }

    fn bounding_top(&self, element: &Element) -> f64 {
        element.get_bounding_client_rect().top()
    }

    fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
    }

    fn observe(&mut self, element: &Element, options: &ObserveOptions) -> Option<IntersectionObserver> {
        let init = IntersectionObserverInit::new();
        init.set_root_margin(&options.root_margin);
        init.set_threshold(&JsValue::from_f64(options.threshold));
        match IntersectionObserver::new_with_options(&self.on_intersect, &init) {
            Ok(observer) => {
                observer.observe(element);
                Some(observer)
            }
            Err(e) => {
                log::warn!("IntersectionObserver construction failed: {e:?}");
                None
            }
        }
    }

    fn disconnect(&mut self, observer: IntersectionObserver) {
        observer.disconnect();
    }

    fn watch_mutations(&mut self) {
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        if let Err(e) = self.mutations.observe_with_options(&self.document, &init) {
            log::warn!("MutationObserver.observe failed: {e:?}");
        }
    }

    fn unwatch_mutations(&mut self) {
        self.mutations.disconnect();
    }
}
