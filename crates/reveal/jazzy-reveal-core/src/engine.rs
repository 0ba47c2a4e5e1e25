//! Engine: composition root and the driver API adapters call into.
//!
//! Methods:
//! - new (capabilities → defaults → strategy → seed → watcher)
//! - on_frame, on_intersections, on_mutations, on_resize (host callbacks)
//! - wants_frame, drain_events, stats, dispose

use std::fmt;

use crate::activator::activate_once;
use crate::config::{Defaults, EngineConfig};
use crate::host::{Capabilities, Host, IntersectionEntry, MutationRecord};
use crate::ids::{IdAllocator, TrackId};
use crate::outputs::{Discovery, EngineStats, Events, RevealEvent};
use crate::ramp::{Ramp, RampStatus};
use crate::strategy::{self, DetectionStrategy, StrategyKind};
use crate::trackable::Trackable;
use crate::watcher::MutationWatcher;

pub struct Engine<H: Host + 'static> {
    config: EngineConfig,
    defaults: Defaults,
    capabilities: Capabilities,
    ids: IdAllocator,
    strategy: Box<dyn DetectionStrategy<H>>,
    watcher: MutationWatcher,
    ramps: Vec<(TrackId, Ramp<H::Element>)>,
    events: Events,
    activated: u32,
    running: bool,
}

impl<H: Host + 'static> Engine<H> {
    /// Build an engine over `host`: probe capabilities once, pick the strategy
    /// for good, track every eligible element already in the document and
    /// start watching for insertions.
    pub fn new(config: EngineConfig, host: &mut H) -> Self {
        let capabilities = host.capabilities();
        let defaults = config.resolve(capabilities.device_orientation);
        let kind = StrategyKind::select(capabilities.intersection_observer);
        log::debug!("jazzy engine: {kind:?} strategy, defaults {defaults:?}");

        let mut engine = Self {
            strategy: strategy::create(kind, host, defaults),
            config,
            defaults,
            capabilities,
            ids: IdAllocator::new(),
            watcher: MutationWatcher::new(),
            ramps: Vec::new(),
            events: Events::default(),
            activated: 0,
            running: true,
        };

        for element in host.query_eligible(None) {
            engine.register(host, &element, Discovery::Seed);
        }
        engine.watcher.install(host);
        engine
    }

    /// Start tracking `element`. Returns `false` if the engine is disposed or
    /// the element is already tracked.
    pub fn register(&mut self, host: &mut H, element: &H::Element, via: Discovery) -> bool {
        if !self.running || self.strategy.is_tracking(element) {
            return false;
        }
        let id = self.ids.alloc();
        if !self.strategy.add_element(host, id, element) {
            return false;
        }
        log::debug!("tracking {element:?} as {id:?} ({via:?})");
        self.events.push(RevealEvent::Tracked { id, via });
        true
    }

    /// One animation frame at host time `now_ms`.
    pub fn on_frame(&mut self, host: &mut H, now_ms: f64) {
        if !self.running {
            return;
        }
        if self.strategy.needs_frames() {
            let fired = self.strategy.evaluate(host);
            self.activate_all(host, fired);
        }
        self.step_ramps(host, now_ms);
    }

    /// One batch of intersection observer entries.
    pub fn on_intersections(&mut self, host: &mut H, entries: &[IntersectionEntry<H::Element>]) {
        if !self.running {
            return;
        }
        let fired = self.strategy.on_intersections(host, entries);
        self.activate_all(host, fired);
    }

    /// One batch of `childList` mutation records.
    pub fn on_mutations(&mut self, host: &mut H, records: &[MutationRecord<H::Element>]) {
        if !self.running {
            return;
        }
        for element in self.watcher.collect(host, records) {
            self.register(host, &element, Discovery::Mutation);
        }
    }

    pub fn on_resize(&mut self, host: &H) {
        if self.running {
            self.strategy.on_resize(host);
        }
    }

    /// Whether the adapter should request another animation frame.
    pub fn wants_frame(&self) -> bool {
        self.running && (self.strategy.needs_frames() || !self.ramps.is_empty())
    }

    /// Tear down: disconnect observers, stop the watcher and the frame loop.
    /// In-flight counters jump to their end value. Safe to call twice.
    pub fn dispose(&mut self, host: &mut H) {
        if !self.running {
            return;
        }
        self.running = false;
        self.strategy.dispose(host);
        self.watcher.uninstall(host);
        for (id, ramp) in self.ramps.drain(..) {
            host.set_text_content(&ramp.element, &ramp.end.to_string());
            self.events.push(RevealEvent::CountFinished {
                id,
                value: ramp.end,
            });
        }
        self.events.push(RevealEvent::Disposed);
        log::debug!("jazzy engine disposed after {} activations", self.activated);
    }

    pub fn drain_events(&mut self) -> Vec<RevealEvent> {
        self.events.take()
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            strategy: self.strategy.kind(),
            pending: self.strategy.pending(),
            activated: self.activated,
            running_ramps: self.ramps.len(),
            running: self.running,
        }
    }

    pub fn strategy_kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn is_tracking(&self, element: &H::Element) -> bool {
        self.strategy.is_tracking(element)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    fn activate_all(&mut self, host: &mut H, fired: Vec<Trackable<H::Element>>) {
        for mut item in fired {
            if item.activated {
                continue;
            }
            let ramp = activate_once(host, &mut item);
            self.activated += 1;
            log::debug!("activated {:?} ({:?})", item.element, item.id);
            self.events.push(RevealEvent::Activated {
                id: item.id,
                counting: ramp.is_some(),
            });
            if let Some(ramp) = ramp {
                self.ramps.push((item.id, ramp));
            }
        }
    }

    fn step_ramps(&mut self, host: &mut H, now_ms: f64) {
        let events = &mut self.events;
        self.ramps.retain_mut(|(id, ramp)| match ramp.step(&mut *host, now_ms) {
            RampStatus::Running => true,
            RampStatus::Finished => {
                events.push(RevealEvent::CountFinished {
                    id: *id,
                    value: ramp.end,
                });
                false
            }
        });
    }
}

impl<H: Host + 'static> fmt::Debug for Engine<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("defaults", &self.defaults)
            .field("capabilities", &self.capabilities)
            .field("stats", &self.stats())
            .finish()
    }
}
