//! Events and stats reported by the engine.
//!
//! Adapters drain events after driving the engine and forward them to the page.

use serde::{Deserialize, Serialize};

use crate::ids::TrackId;
use crate::strategy::StrategyKind;

/// How an element came to be tracked.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Discovery {
    /// Present when the engine was constructed.
    Seed,
    /// Inserted later and reported by the mutation watcher.
    Mutation,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum RevealEvent {
    Tracked {
        id: TrackId,
        via: Discovery,
    },
    Activated {
        id: TrackId,
        counting: bool,
    },
    CountFinished {
        id: TrackId,
        value: i64,
    },
    Disposed,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Events {
    #[serde(default)]
    pub events: Vec<RevealEvent>,
}

impl Events {
    #[inline]
    pub fn push(&mut self, event: RevealEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn take(&mut self) -> Vec<RevealEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Point-in-time engine counters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineStats {
    pub strategy: StrategyKind,
    /// Tracked and not yet activated.
    pub pending: usize,
    /// Total activations so far.
    pub activated: u32,
    /// Counters still stepping.
    pub running_ramps: usize,
    /// False once disposed.
    pub running: bool,
}
