//! Per-element tracking record.

use crate::config::{parse_int, Defaults};
use crate::host::Host;
use crate::ids::TrackId;
use crate::markers::{DELAY_ATTR, OFFSET_ATTR, SPEED_ATTR, TRANSITION_DELAY, TRANSITION_DURATION};

/// An element plus its configuration, resolved once when it becomes tracked.
#[derive(Clone, Debug, PartialEq)]
pub struct Trackable<E> {
    pub id: TrackId,
    pub element: E,
    pub transition_duration_ms: f64,
    pub transition_delay_ms: f64,
    pub viewport_offset_px: i32,
    /// One-way: once set the element is never evaluated or activated again.
    pub activated: bool,
}

impl<E: Clone> Trackable<E> {
    /// Read element-level overrides, falling back to `defaults` for each
    /// attribute that is missing, unparseable or zero.
    pub fn resolve<H>(host: &H, id: TrackId, element: &E, defaults: &Defaults) -> Self
    where
        H: Host<Element = E> + ?Sized,
    {
        let read = |name: &str| {
            host.attribute(element, name)
                .and_then(|raw| parse_int(&raw))
                .filter(|v| *v != 0)
        };
        Self {
            id,
            element: element.clone(),
            transition_duration_ms: read(SPEED_ATTR).map_or(defaults.speed_ms, |v| v as f64),
            transition_delay_ms: read(DELAY_ATTR).map_or(defaults.delay_ms, |v| v as f64),
            viewport_offset_px: read(OFFSET_ATTR).map_or(defaults.offset_px, |v| {
                v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
            }),
            activated: false,
        }
    }

    /// Push the transition timing onto the element's inline style.
    pub fn apply_timing<H>(&self, host: &mut H)
    where
        H: Host<Element = E> + ?Sized,
    {
        host.set_style(
            &self.element,
            TRANSITION_DURATION,
            &format!("{}ms", self.transition_duration_ms),
        );
        host.set_style(
            &self.element,
            TRANSITION_DELAY,
            &format!("{}ms", self.transition_delay_ms),
        );
    }
}
