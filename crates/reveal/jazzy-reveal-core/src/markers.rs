//! Attribute, class and style names shared with page authors and stylesheets.

/// Presence makes an element eligible; the value is the behavior tag.
pub const MARKER_ATTR: &str = "data-jazzy";
/// Counter start value (integer, default 0).
pub const START_ATTR: &str = "data-jazzy-start";
/// Counter end value (integer, default: the element's text).
pub const END_ATTR: &str = "data-jazzy-end";
/// Per-element transition duration override in ms.
pub const SPEED_ATTR: &str = "data-jazzy-speed";
/// Per-element transition delay override in ms.
pub const DELAY_ATTR: &str = "data-jazzy-delay";
/// Per-element viewport offset override in px.
pub const OFFSET_ATTR: &str = "data-jazzy-offset";

/// Reserved substring of the behavior tag that selects counting.
pub const COUNT_TAG: &str = "count";

/// Completion class added once on activation; stylesheets key transitions off it.
pub const DONE_CLASS: &str = "jazzy-done";

/// CSS selector equivalent of [`is_eligible`](crate::host::is_eligible).
pub const ELIGIBLE_SELECTOR: &str = "[data-jazzy]:not(.jazzy-done)";

pub const TRANSITION_DURATION: &str = "transition-duration";
pub const TRANSITION_DELAY: &str = "transition-delay";

/// True when a behavior tag selects the numeric counter.
#[inline]
pub fn is_count_tag(tag: &str) -> bool {
    tag.contains(COUNT_TAG)
}
