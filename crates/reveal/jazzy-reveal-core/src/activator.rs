//! One-time activation of a tracked element.

use crate::config::parse_int;
use crate::host::Host;
use crate::markers::{is_count_tag, DONE_CLASS, END_ATTR, MARKER_ATTR, START_ATTR};
use crate::ramp::Ramp;
use crate::trackable::Trackable;

/// Start/end for a counting element, or `None` when it does not count or an
/// attribute (or the fallback text) is not an integer.
pub fn count_bounds<H: Host + ?Sized>(host: &H, element: &H::Element) -> Option<(i64, i64)> {
    let tag = host.attribute(element, MARKER_ATTR)?;
    if !is_count_tag(&tag) {
        return None;
    }
    let start = match host.attribute(element, START_ATTR) {
        Some(raw) => parse_int(&raw)?,
        None => 0,
    };
    let end = match host.attribute(element, END_ATTR) {
        Some(raw) => parse_int(&raw)?,
        None => parse_int(&host.text_content(element).unwrap_or_default())?,
    };
    Some((start, end))
}

/// Activate `item` unless it already was. Returns the ramp to drive when the
/// element counts. The completion class is added either way.
pub fn activate_once<H: Host + ?Sized>(
    host: &mut H,
    item: &mut Trackable<H::Element>,
) -> Option<Ramp<H::Element>> {
    if item.activated {
        return None;
    }
    item.activated = true;

    let ramp = match count_bounds(host, &item.element) {
        Some((start, end)) => Some(Ramp::new(
            item.element.clone(),
            start,
            end,
            item.transition_duration_ms,
        )),
        None => {
            let counts = host
                .attribute(&item.element, MARKER_ATTR)
                .is_some_and(|tag| is_count_tag(&tag));
            if counts {
                log::debug!("unreadable counter bounds on {:?}; revealing only", item.element);
            }
            None
        }
    };
    host.add_class(&item.element, DONE_CLASS);
    ramp
}
