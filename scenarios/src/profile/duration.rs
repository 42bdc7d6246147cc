//! Textual durations in the runtime's format (`"1m"`, `"1m30s"`, `"500ms"`)

use std::time::Duration;

use super::stage::ProfileError;

const UNITS: [(&str, u64); 4] = [("h", 3_600_000), ("m", 60_000), ("s", 1_000), ("ms", 1)];

/// Parse a duration such as `"2h"`, `"1m30s"` or `"250ms"`.
///
/// Components must appear largest unit first and each unit at most once.
pub fn parse_duration(text: &str) -> Result<Duration, ProfileError> {
    let invalid = || ProfileError::InvalidDuration(text.to_string());
    let mut rest = text.trim();
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total_ms: u64 = 0;
    // Index into UNITS of the last unit seen; next unit must be smaller
    let mut last_unit: Option<usize> = None;

    while !rest.is_empty() {
        let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        if digits == 0 {
            return Err(invalid());
        }
        let value: u64 = rest[..digits].parse().map_err(|_| invalid())?;
        rest = &rest[digits..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(rest.len());
        let unit = &rest[..unit_len];
        rest = &rest[unit_len..];

        let idx = UNITS
            .iter()
            .position(|(name, _)| *name == unit)
            .ok_or_else(invalid)?;
        if last_unit.is_some_and(|prev| idx <= prev) {
            return Err(invalid());
        }
        last_unit = Some(idx);

        let ms = value.checked_mul(UNITS[idx].1).ok_or_else(invalid)?;
        total_ms = total_ms.checked_add(ms).ok_or_else(invalid)?;
    }

    Ok(Duration::from_millis(total_ms))
}

/// Render a duration in canonical form, e.g. `90s` becomes `"1m30s"`.
///
/// Sub-millisecond precision is dropped. Durations beyond `u64::MAX`
/// milliseconds saturate.
pub fn format_duration(duration: Duration) -> String {
    let mut ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
    if ms == 0 {
        return "0s".to_string();
    }

    let mut out = String::new();
    for (name, unit_ms) in UNITS {
        let count = ms / unit_ms;
        if count > 0 {
            out.push_str(&count.to_string());
            out.push_str(name);
            ms -= count * unit_ms;
        }
    }
    out
}

/// Serde adapter for `Duration` fields stored as duration text
pub(crate) mod text {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_duration(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}
