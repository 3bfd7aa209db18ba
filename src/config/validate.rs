// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{GaswConfig, MAX_NOTIFICATION_INTERVAL, RawGaswConfig};
use crate::errors::{GaswError, Result};

impl TryFrom<RawGaswConfig> for GaswConfig {
    type Error = GaswError;

    fn try_from(raw: RawGaswConfig) -> std::result::Result<Self, Self::Error> {
        let interval = validate_raw_config(&raw)?;
        Ok(GaswConfig::new_unchecked(raw, interval))
    }
}

/// Validate a raw config, returning the parsed notifier interval.
fn validate_raw_config(cfg: &RawGaswConfig) -> Result<Duration> {
    validate_default_target(cfg)?;
    validate_proxy(cfg)?;
    validate_notification_interval(cfg)
}

fn validate_default_target(cfg: &RawGaswConfig) -> Result<()> {
    if cfg.gasw.version.trim().is_empty() {
        return Err(GaswError::Configuration(
            "[gasw].version must not be empty".to_string(),
        ));
    }
    if cfg.gasw.target.trim().is_empty() {
        return Err(GaswError::Configuration(
            "[gasw].target must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_proxy(cfg: &RawGaswConfig) -> Result<()> {
    if cfg.proxy.lifetime_hours == 0 {
        return Err(GaswError::Configuration(
            "[proxy].lifetime_hours must be >= 1 (got 0)".to_string(),
        ));
    }
    if cfg.proxy.myproxy_port == 0 || cfg.proxy.voms_port == 0 {
        return Err(GaswError::Configuration(
            "[proxy] server ports must be non-zero".to_string(),
        ));
    }
    Ok(())
}

fn validate_notification_interval(cfg: &RawGaswConfig) -> Result<Duration> {
    let interval = parse_duration(&cfg.gasw.notification_interval).map_err(|e| {
        GaswError::Configuration(format!("[gasw].notification_interval: {e}"))
    })?;

    if interval.is_zero() {
        return Err(GaswError::Configuration(
            "[gasw].notification_interval must be greater than zero".to_string(),
        ));
    }
    if interval > MAX_NOTIFICATION_INTERVAL {
        return Err(GaswError::Configuration(format!(
            "[gasw].notification_interval must be at most {}h (got {:?})",
            MAX_NOTIFICATION_INTERVAL.as_secs() / 3600,
            interval
        )));
    }
    Ok(interval)
}

/// Parse a duration string like `"500ms"`, `"10s"`, `"2m"` or `"1h"`.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    let secs_per_unit = match unit.as_str() {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        _ => {
            return Err(format!(
                "unsupported duration unit '{}'; expected ms, s, m, or h",
                unit
            ));
        }
    };

    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration '{s}' is too large"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_units() {
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("10s").unwrap(), Duration::from_secs(10));
        assert_eq!(parse_duration(" 2m ").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
    }

    #[test]
    fn rejects_missing_or_unknown_units() {
        assert!(parse_duration("10").is_err());
        assert!(parse_duration("").is_err());
        assert!(parse_duration("3d").is_err());
        assert!(parse_duration("s").is_err());
    }

    #[test]
    fn oversized_values_are_errors() {
        let err = parse_duration("999999999999999999h").unwrap_err();
        assert!(err.contains("too large"), "got {err}");
        assert!(parse_duration("999999999999999999999s").is_err());
        assert_eq!(
            parse_duration("18446744073709551615s").unwrap(),
            Duration::from_secs(u64::MAX)
        );
    }

    #[test]
    fn oversized_interval_is_a_configuration_error() {
        let mut raw = RawGaswConfig::default();
        raw.gasw.notification_interval = "999999999999999999h".to_string();

        assert!(matches!(
            GaswConfig::try_from(raw),
            Err(GaswError::Configuration(_))
        ));
    }

    #[test]
    fn interval_longer_than_a_day_is_rejected() {
        let mut raw = RawGaswConfig::default();
        raw.gasw.notification_interval = "18446744073709551615s".to_string();

        match GaswConfig::try_from(raw) {
            Err(GaswError::Configuration(msg)) => assert!(msg.contains("at most"), "{msg}"),
            other => panic!("expected Configuration error, got {other:?}"),
        }

        let clamped = GaswConfig::default().with_notification_interval(Duration::MAX);
        assert_eq!(clamped.notification_interval(), MAX_NOTIFICATION_INTERVAL);
    }

    #[test]
    fn defaults_validate() {
        let cfg = GaswConfig::try_from(RawGaswConfig::default()).unwrap();
        assert_eq!(cfg.notification_interval(), Duration::from_secs(10));
        assert_eq!(cfg.default_target().version, "GRID");
        assert_eq!(cfg.default_target().target, "DIRAC");
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut raw = RawGaswConfig::default();
        raw.gasw.notification_interval = "0s".to_string();

        match GaswConfig::try_from(raw) {
            Err(GaswError::Configuration(msg)) => assert!(msg.contains("notification_interval")),
            other => panic!("expected configuration error, got {other:?}"),
        }
    }

    #[test]
    fn empty_target_is_rejected() {
        let mut raw = RawGaswConfig::default();
        raw.gasw.target = "  ".to_string();

        assert!(matches!(
            GaswConfig::try_from(raw),
            Err(GaswError::Configuration(_))
        ));
    }

    #[test]
    fn zero_proxy_lifetime_is_rejected() {
        let mut raw = RawGaswConfig::default();
        raw.proxy.lifetime_hours = 0;

        match GaswConfig::try_from(raw) {
            Err(GaswError::Configuration(msg)) => assert!(msg.contains("lifetime_hours")),
            other => panic!("expected configuration error, got {other:?}"),
        }
    }
}
