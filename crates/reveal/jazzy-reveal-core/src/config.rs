//! Engine configuration and the default-merge rules.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_SPEED_MS: f64 = 500.0;
pub const DEFAULT_DELAY_MS: f64 = 0.0;
pub const DEFAULT_OFFSET_PX: i32 = 0;

/// Caller-supplied options. Every field is optional and unknown fields are
/// ignored. A present-but-zero value counts as unset and falls back to the
/// default, so `speed: 0` yields 500.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Transition duration in ms.
    pub speed: Option<f64>,
    /// Transition delay in ms.
    pub delay: Option<f64>,
    /// Viewport offset in px.
    pub offset: Option<f64>,
}

impl EngineConfig {
    /// Parse options from JSON. `null` and `{}` both mean "all defaults".
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let cfg: Option<EngineConfig> = serde_json::from_str(s)?;
        Ok(cfg.unwrap_or_default())
    }

    /// Merge with defaults. `mobile` forces the offset to 0 whatever was supplied.
    pub fn resolve(&self, mobile: bool) -> Defaults {
        let offset_px = if mobile {
            0
        } else {
            truthy(self.offset).map_or(DEFAULT_OFFSET_PX, |v| v.trunc() as i32)
        };
        Defaults {
            speed_ms: truthy(self.speed).unwrap_or(DEFAULT_SPEED_MS),
            delay_ms: truthy(self.delay).unwrap_or(DEFAULT_DELAY_MS),
            offset_px,
        }
    }
}

/// Effective engine-wide defaults for elements without their own overrides.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Defaults {
    pub speed_ms: f64,
    pub delay_ms: f64,
    pub offset_px: i32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            speed_ms: DEFAULT_SPEED_MS,
            delay_ms: DEFAULT_DELAY_MS,
            offset_px: DEFAULT_OFFSET_PX,
        }
    }
}

fn truthy(v: Option<f64>) -> Option<f64> {
    v.filter(|x| *x != 0.0 && !x.is_nan())
}

/// Integer prefix parse with `parseInt` semantics: leading whitespace, an
/// optional sign, then at least one decimal digit. Trailing junk is ignored.
pub fn parse_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (neg, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let mut value: i64 = 0;
    for b in rest[..digits].bytes() {
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }
    Some(if neg { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let d = EngineConfig::default().resolve(false);
        assert_eq!(d, Defaults::default());
        assert_eq!(d.speed_ms, 500.0);
        assert_eq!(d.delay_ms, 0.0);
        assert_eq!(d.offset_px, 0);
    }

    #[test]
    fn explicit_zero_speed_falls_back_to_default() {
        let cfg = EngineConfig {
            speed: Some(0.0),
            ..Default::default()
        };
        assert_eq!(cfg.resolve(false).speed_ms, 500.0);
    }

    #[test]
    fn mobile_forces_zero_offset() {
        let cfg = EngineConfig {
            speed: Some(300.0),
            delay: Some(100.0),
            offset: Some(50.0),
        };
        let d = cfg.resolve(true);
        assert_eq!(d.offset_px, 0);
        assert_eq!(d.speed_ms, 300.0);
        assert_eq!(d.delay_ms, 100.0);
        assert_eq!(cfg.resolve(false).offset_px, 50);
    }

    #[test]
    fn from_json_ignores_unknown_fields() {
        let cfg = EngineConfig::from_json(r#"{"speed": 800, "easing": "linear"}"#).unwrap();
        assert_eq!(cfg.speed, Some(800.0));
        assert_eq!(cfg.delay, None);
        assert_eq!(EngineConfig::from_json("null").unwrap(), EngineConfig::default());
        assert!(EngineConfig::from_json(r#"{"speed": "fast"}"#).is_err());
    }

    #[test]
    fn parse_int_prefix_semantics() {
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int("  -17px"), Some(-17));
        assert_eq!(parse_int("+8"), Some(8));
        assert_eq!(parse_int("3.9"), Some(3));
        assert_eq!(parse_int("abc"), None);
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("-"), None);
    }
}
