//! jazzy reveal core (host-agnostic)
//!
//! Tracks elements carrying the `data-jazzy` marker, decides when each one
//! enters the viewport (intersection observers when the host has them,
//! per-frame polling otherwise), activates it exactly once and drives counters.
//! Adapters implement [`Host`] and forward frames, intersection batches,
//! mutation batches and resizes into [`Engine`].

pub mod activator;
pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod ids;
pub mod markers;
pub mod outputs;
pub mod ramp;
pub mod strategy;
pub mod trackable;
pub mod watcher;

// Re-exports for consumers (adapters)
pub use activator::{activate_once, count_bounds};
pub use config::{parse_int, Defaults, EngineConfig};
pub use engine::Engine;
pub use error::ConfigError;
pub use host::{is_eligible, AddedNode, Capabilities, Host, IntersectionEntry, MutationRecord, ObserveOptions};
pub use ids::TrackId;
pub use outputs::{Discovery, EngineStats, RevealEvent};
pub use ramp::{ramp_progress, ramp_value, Ramp, RampStatus};
pub use strategy::{DetectionStrategy, StrategyKind};
pub use trackable::Trackable;
pub use watcher::MutationWatcher;
