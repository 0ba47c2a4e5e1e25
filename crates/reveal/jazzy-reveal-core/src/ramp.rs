//! Numeric ramp: frame-driven count from `start` to `end` on an element's text.

use crate::host::Host;

/// Displayed value for a given progress in `[0, 1]`. Computed in f64 so any
/// pair of bounds is safe; the endpoints are exactly `start` and `end`.
#[inline]
pub fn ramp_value(start: i64, end: i64, progress: f64) -> i64 {
    let p = progress.clamp(0.0, 1.0);
    if p <= 0.0 {
        return start;
    }
    if p >= 1.0 {
        return end;
    }
    (p * (end as f64 - start as f64) + start as f64).floor() as i64
}

/// Progress after `elapsed_ms` of a `duration_ms` run. Non-positive durations
/// are complete immediately.
#[inline]
pub fn ramp_progress(elapsed_ms: f64, duration_ms: f64) -> f64 {
    if duration_ms <= 0.0 {
        return 1.0;
    }
    (elapsed_ms / duration_ms).clamp(0.0, 1.0)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RampStatus {
    Running,
    Finished,
}

/// One in-flight count. The clock origin is the first frame it sees.
#[derive(Clone, Debug)]
pub struct Ramp<E> {
    pub element: E,
    pub start: i64,
    pub end: i64,
    pub duration_ms: f64,
    origin_ms: Option<f64>,
}

impl<E> Ramp<E> {
    pub fn new(element: E, start: i64, end: i64, duration_ms: f64) -> Self {
        Self {
            element,
            start,
            end,
            duration_ms,
            origin_ms: None,
        }
    }

    /// Advance to frame time `now_ms` and write the value into the element.
    pub fn step<H>(&mut self, host: &mut H, now_ms: f64) -> RampStatus
    where
        H: Host<Element = E> + ?Sized,
    {
        let origin = *self.origin_ms.get_or_insert(now_ms);
        let progress = ramp_progress(now_ms - origin, self.duration_ms);
        let value = ramp_value(self.start, self.end, progress);
        host.set_text_content(&self.element, &value.to_string());
        if progress < 1.0 {
            RampStatus::Running
        } else {
            RampStatus::Finished
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_exact() {
        assert_eq!(ramp_value(0, 100, ramp_progress(0.0, 800.0)), 0);
        assert_eq!(ramp_value(0, 100, ramp_progress(800.0, 800.0)), 100);
        assert_eq!(ramp_value(0, 100, ramp_progress(5000.0, 800.0)), 100);
        assert_eq!(ramp_value(-7, 13, 1.0), 13);
    }

    #[test]
    fn ascending_is_monotone_and_floored() {
        let mut prev = i64::MIN;
        for ms in 0..=800 {
            let v = ramp_value(0, 100, ramp_progress(ms as f64, 800.0));
            assert!(v >= prev, "dropped at {ms}ms: {prev} -> {v}");
            prev = v;
        }
        // 0.5 * 100 = 50 exactly, 0.505 * 100 floors to 50
        assert_eq!(ramp_value(0, 100, 0.505), 50);
    }

    #[test]
    fn descending_is_non_increasing() {
        let mut prev = i64::MAX;
        for ms in 0..=300 {
            let v = ramp_value(10, -5, ramp_progress(ms as f64, 300.0));
            assert!(v <= prev);
            prev = v;
        }
        assert_eq!(prev, -5);
    }

    #[test]
    fn extreme_bounds_do_not_overflow() {
        let (lo, hi) = (-i64::MAX, i64::MAX);
        assert_eq!(ramp_value(lo, hi, 0.0), lo);
        assert_eq!(ramp_value(lo, hi, 1.0), hi);
        assert_eq!(ramp_value(hi, lo, 1.0), lo);
        let mid = ramp_value(lo, hi, 0.5);
        assert!(mid.abs() < 1 << 20, "midpoint {mid}");
    }

    #[test]
    fn zero_duration_completes_at_once() {
        assert_eq!(ramp_progress(0.0, 0.0), 1.0);
        assert_eq!(ramp_progress(0.0, -10.0), 1.0);
    }
}
