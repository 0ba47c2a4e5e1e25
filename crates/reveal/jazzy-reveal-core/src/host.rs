//! Host trait and the callback payloads the host feeds back into the engine.
//!
//! The core never touches a DOM directly. Adapters (wasm/web_sys, the test
//! fixtures' in-memory page) implement [`Host`] and translate browser callbacks
//! into [`IntersectionEntry`] and [`MutationRecord`] batches.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::markers::{DONE_CLASS, MARKER_ATTR};

/// Platform capabilities, probed once at engine construction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Standards-based intersection observation with `intersectionRatio` support.
    pub intersection_observer: bool,
    /// Touch/orientation-capable device. Forces the engine offset to 0.
    pub device_orientation: bool,
}

/// Options for one per-element intersection observer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObserveOptions {
    pub root_margin: String,
    pub threshold: f64,
}

impl ObserveOptions {
    /// Negative bottom margin: a positive offset requires the element to sit
    /// further up the page before it triggers.
    pub fn for_offset(offset_px: i32) -> Self {
        Self {
            root_margin: format!("0px 0px {}px 0px", -i64::from(offset_px)),
            threshold: 0.0,
        }
    }
}

/// One intersection observer entry delivered by the host.
#[derive(Clone, Debug)]
pub struct IntersectionEntry<E> {
    pub target: E,
    pub intersection_ratio: f64,
    /// Bounding client rect top, relative to the viewport top edge.
    pub top: f64,
}

/// A node reported in a mutation record's `addedNodes`.
#[derive(Clone, Debug)]
pub enum AddedNode<E> {
    Element(E),
    /// Text, comment and other non-element nodes.
    Other,
}

/// One `childList` mutation record.
#[derive(Clone, Debug)]
pub struct MutationRecord<E> {
    pub added_nodes: Vec<AddedNode<E>>,
}

impl<E> MutationRecord<E> {
    pub fn added(elements: impl IntoIterator<Item = E>) -> Self {
        Self {
            added_nodes: elements.into_iter().map(AddedNode::Element).collect(),
        }
    }
}

/// Everything the engine needs from the page.
pub trait Host {
    /// Opaque element handle. Equality is node identity.
    type Element: Clone + PartialEq + Debug;
    /// Handle for one live intersection observer.
    type Observer;

    fn capabilities(&self) -> Capabilities;

    /// Elements matching [`ELIGIBLE_SELECTOR`](crate::markers::ELIGIBLE_SELECTOR).
    /// `None` searches the whole document; `Some(root)` only its descendants
    /// (the root itself excluded).
    fn query_eligible(&self, scope: Option<&Self::Element>) -> Vec<Self::Element>;

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;
    fn has_class(&self, element: &Self::Element, class: &str) -> bool;
    fn add_class(&mut self, element: &Self::Element, class: &str);
    fn text_content(&self, element: &Self::Element) -> Option<String>;
    fn set_text_content(&mut self, element: &Self::Element, text: &str);
    fn set_style(&mut self, element: &Self::Element, property: &str, value: &str);

    /// Bounding client rect top in px, relative to the viewport top edge.
    fn bounding_top(&self, element: &Self::Element) -> f64;
    fn viewport_height(&self) -> f64;

    /// Start a dedicated intersection observer for `element`. Entries are
    /// delivered back through `Engine::on_intersections`. `None` means the
    /// observer could not be created; the element is then revealed on the next
    /// frame.
    fn observe(
        &mut self,
        element: &Self::Element,
        options: &ObserveOptions,
    ) -> Option<Self::Observer>;
    fn disconnect(&mut self, observer: Self::Observer);

    /// Start observing `childList` mutations over the whole document subtree.
    /// Records are delivered back through `Engine::on_mutations`.
    fn watch_mutations(&mut self);
    fn unwatch_mutations(&mut self);
}

/// Has the marker attribute and lacks the completion class.
pub fn is_eligible<H: Host + ?Sized>(host: &H, element: &H::Element) -> bool {
    host.attribute(element, MARKER_ATTR).is_some() && !host.has_class(element, DONE_CLASS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn margin_negates_offset() {
        assert_eq!(ObserveOptions::for_offset(50).root_margin, "0px 0px -50px 0px");
        assert_eq!(ObserveOptions::for_offset(-20).root_margin, "0px 0px 20px 0px");
        assert_eq!(ObserveOptions::for_offset(0).root_margin, "0px 0px 0px 0px");
        assert_eq!(ObserveOptions::for_offset(0).threshold, 0.0);
    }
}
