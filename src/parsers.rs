//! Unit normalization for values read out of wrk reports.
//!
//! Latency ends up in microseconds, elapsed time in seconds and transfer
//! volume in bytes. Unknown time and byte units never fail: they fall
//! through to the hours and bytes branches respectively.

const MICROS_PER_MILLI: f64 = 1_000.0;
const MICROS_PER_SEC: f64 = 1_000_000.0;
const SECS_PER_MIN: f64 = 60.0;
const SECS_PER_HOUR: f64 = 60.0 * 60.0;
const BYTES_PER_MB: f64 = 1_000_000.0;
const BYTES_PER_GB: f64 = 1_000_000_000.0;

/// Scales a latency value to microseconds. `us`, `μs`, an empty unit and
/// anything unrecognised are taken as microseconds already.
pub fn normalize_latency(value: f64, unit: &str) -> f64 {
    match unit {
        "ms" => value * MICROS_PER_MILLI,
        "s" => value * MICROS_PER_SEC,
        _ => value,
    }
}

/// Scales an elapsed time to seconds. Units other than `s` and `m`
/// (case-insensitive) are read as hours.
pub fn normalize_time(value: f64, unit: &str) -> f64 {
    let unit = unit.to_ascii_lowercase();
    if unit == "s" {
        value
    } else if unit == "m" {
        value * SECS_PER_MIN
    } else {
        value * SECS_PER_HOUR
    }
}

/// Scales a transfer volume to bytes. Units other than `mb` and `gb`
/// (case-insensitive) leave the value unchanged.
pub fn normalize_bytes(value: f64, unit: &str) -> f64 {
    match unit.to_ascii_lowercase().as_str() {
        "mb" => value * BYTES_PER_MB,
        "gb" => value * BYTES_PER_GB,
        _ => value,
    }
}

/// Parses a decimal literal such as `12.50`. Returns `None` for anything
/// that is not a finite number (`1.2.3`, empty, `.`).
pub fn parse_decimal(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Reads the leading base-10 digits of `s` as an integer, ignoring any
/// fractional tail: `1234.56` gives 1234. No leading digits or overflow
/// gives `None`.
pub fn parse_leading_int(s: &str) -> Option<u64> {
    let s = s.trim();
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s[..end].parse::<u64>().ok()
}
