//! Poll-based fallback: re-check every pending element once per frame.

use crate::config::Defaults;
use crate::host::Host;
use crate::ids::TrackId;
use crate::strategy::{DetectionStrategy, StrategyKind};
use crate::trackable::Trackable;

/// Inclusive trigger test: the element's top, shifted by its offset, has
/// reached the viewport bottom.
#[inline]
pub fn in_view(top: f64, offset_px: i32, viewport_bottom: f64) -> bool {
    top + f64::from(offset_px) <= viewport_bottom
}

pub struct PollingStrategy<E> {
    defaults: Defaults,
    viewport_height: f64,
    pending: Vec<Trackable<E>>,
}

impl<E> PollingStrategy<E> {
    pub fn new(defaults: Defaults, viewport_height: f64) -> Self {
        Self {
            defaults,
            viewport_height,
            pending: Vec::new(),
        }
    }
}

impl<H: Host> DetectionStrategy<H> for PollingStrategy<H::Element> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Polling
    }

    fn add_element(&mut self, host: &mut H, id: TrackId, element: &H::Element) -> bool {
        if self.pending.iter().any(|p| &p.element == element) {
            return false;
        }
        let item = Trackable::resolve(host, id, element, &self.defaults);
        item.apply_timing(host);
        self.pending.push(item);
        true
    }

    fn is_tracking(&self, element: &H::Element) -> bool {
        self.pending.iter().any(|p| &p.element == element)
    }

    fn pending(&self) -> usize {
        self.pending.len()
    }

    fn needs_frames(&self) -> bool {
        true
    }

    fn evaluate(&mut self, host: &mut H) -> Vec<Trackable<H::Element>> {
        if self.pending.is_empty() {
            return Vec::new();
        }
        let bottom = self.viewport_height;
        let host = &*host;
        // Single pass over a taken snapshot: every pending element is checked
        // exactly once, fired ones leave the set.
        let (fired, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|item| {
                in_view(
                    host.bounding_top(&item.element),
                    item.viewport_offset_px,
                    bottom,
                )
            });
        self.pending = kept;
        log::trace!("polling pass: {} fired, {} pending", fired.len(), self.pending.len());
        fired
    }

    fn on_resize(&mut self, host: &H) {
        self.viewport_height = host.viewport_height();
    }

    fn dispose(&mut self, _host: &mut H) {
        self.pending.clear();
    }
}
