//! Detection strategies: when does a tracked element count as "in view".
//!
//! Both variants resolve per-element config and apply transition timing in
//! `add_element`, and hand back elements that fired (already removed from
//! tracking) so the engine activates each exactly once.

pub mod observer;
pub mod polling;

use serde::{Deserialize, Serialize};

use crate::config::Defaults;
use crate::host::{Host, IntersectionEntry};
use crate::ids::TrackId;
use crate::trackable::Trackable;

pub use observer::ObserverStrategy;
pub use polling::PollingStrategy;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Observer,
    Polling,
}

impl StrategyKind {
    /// Observer when the host has intersection observation, polling otherwise.
    pub fn select(intersection_observer: bool) -> Self {
        if intersection_observer {
            StrategyKind::Observer
        } else {
            StrategyKind::Polling
        }
    }
}

pub trait DetectionStrategy<H: Host> {
    fn kind(&self) -> StrategyKind;

    /// Start tracking `element` under `id`. Returns `false` if it is already
    /// tracked.
    fn add_element(&mut self, host: &mut H, id: TrackId, element: &H::Element) -> bool;

    fn is_tracking(&self, element: &H::Element) -> bool;

    /// Elements still waiting for viewport entry.
    fn pending(&self) -> usize;

    /// Whether `evaluate` has work on the next frame.
    fn needs_frames(&self) -> bool {
        false
    }

    /// Per-frame evaluation. Returns the elements that fired.
    fn evaluate(&mut self, _host: &mut H) -> Vec<Trackable<H::Element>> {
        Vec::new()
    }

    /// One batch of intersection entries.
    fn on_intersections(
        &mut self,
        _host: &mut H,
        _entries: &[IntersectionEntry<H::Element>],
    ) -> Vec<Trackable<H::Element>> {
        Vec::new()
    }

    fn on_resize(&mut self, _host: &H) {}

    /// Stop tracking everything and release host resources.
    fn dispose(&mut self, host: &mut H);
}

/// Build the strategy for `kind`.
pub fn create<H: Host + 'static>(
    kind: StrategyKind,
    host: &H,
    defaults: Defaults,
) -> Box<dyn DetectionStrategy<H>> {
    match kind {
        StrategyKind::Observer => Box::new(ObserverStrategy::<H>::new(defaults)),
        StrategyKind::Polling => Box::new(PollingStrategy::<H::Element>::new(
            defaults,
            host.viewport_height(),
        )),
    }
}
