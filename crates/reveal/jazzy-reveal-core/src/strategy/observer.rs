//! Push-based detection: one host intersection observer per element.

use crate::config::Defaults;
use crate::host::{Host, IntersectionEntry, ObserveOptions};
use crate::ids::TrackId;
use crate::strategy::{DetectionStrategy, StrategyKind};
use crate::trackable::Trackable;

/// True when an entry means the element has entered (or is already past) the
/// viewport.
#[inline]
pub fn entry_fires<E>(entry: &IntersectionEntry<E>) -> bool {
    entry.intersection_ratio > 0.0 || entry.top <= 0.0
}

struct Watched<H: Host> {
    item: Trackable<H::Element>,
    observer: H::Observer,
}

pub struct ObserverStrategy<H: Host> {
    defaults: Defaults,
    watched: Vec<Watched<H>>,
    /// Elements the host could not observe; released on the next frame.
    unobserved: Vec<Trackable<H::Element>>,
}

impl<H: Host> ObserverStrategy<H> {
    pub fn new(defaults: Defaults) -> Self {
        Self {
            defaults,
            watched: Vec::new(),
            unobserved: Vec::new(),
        }
    }

    fn position(&self, element: &H::Element) -> Option<usize> {
        self.watched.iter().position(|w| &w.item.element == element)
    }

    fn tracks(&self, element: &H::Element) -> bool {
        self.position(element).is_some() || self.unobserved.iter().any(|u| &u.element == element)
    }
}

impl<H: Host> DetectionStrategy<H> for ObserverStrategy<H> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Observer
    }

    fn add_element(&mut self, host: &mut H, id: TrackId, element: &H::Element) -> bool {
        if self.tracks(element) {
            return false;
        }
        let item = Trackable::resolve(host, id, element, &self.defaults);
        item.apply_timing(host);
        match host.observe(element, &ObserveOptions::for_offset(item.viewport_offset_px)) {
            Some(observer) => self.watched.push(Watched { item, observer }),
            None => {
                log::warn!("no intersection observer for {element:?}; revealing on next frame");
                self.unobserved.push(item);
            }
        }
        true
    }

    fn is_tracking(&self, element: &H::Element) -> bool {
        self.tracks(element)
    }

    fn pending(&self) -> usize {
        self.watched.len() + self.unobserved.len()
    }

    fn needs_frames(&self) -> bool {
        !self.unobserved.is_empty()
    }

    fn evaluate(&mut self, _host: &mut H) -> Vec<Trackable<H::Element>> {
        std::mem::take(&mut self.unobserved)
    }

    fn on_intersections(
        &mut self,
        host: &mut H,
        entries: &[IntersectionEntry<H::Element>],
    ) -> Vec<Trackable<H::Element>> {
        let mut fired = Vec::new();
        for entry in entries.iter().filter(|e| entry_fires(e)) {
            // Unknown targets were already fired earlier in this batch or never tracked.
            let Some(idx) = self.position(&entry.target) else {
                continue;
            };
            let Watched { item, observer } = self.watched.swap_remove(idx);
            host.disconnect(observer);
            fired.push(item);
        }
        fired
    }

    fn dispose(&mut self, host: &mut H) {
        for w in self.watched.drain(..) {
            host.disconnect(w.observer);
        }
        self.unobserved.clear();
    }
}
