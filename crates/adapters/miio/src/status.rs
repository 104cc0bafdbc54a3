//! Decoding of `get_status` replies.

use serde::Deserialize;
use serde_json::Value;

use crate::error::MiioError;

#[derive(Debug, Deserialize)]
struct RawStatus {
    state: i64,
}

/// Extract the numeric state code from a `get_status` result, which the
/// device wraps in a one-element array.
///
/// # Errors
///
/// Returns [`MiioError::UnexpectedResponse`] when the payload has no state.
pub fn state_code(result: Value) -> Result<i64, MiioError> {
    let first = match result {
        Value::Array(mut items) if !items.is_empty() => items.swap_remove(0),
        other => return Err(MiioError::UnexpectedResponse(other.to_string())),
    };
    let raw: RawStatus = serde_json::from_value(first)?;
    Ok(raw.state)
}

/// Human-readable text for a device state code.
#[must_use]
pub fn status_text(code: i64) -> String {
    let text = match code {
        1 => "Starting",
        2 => "Charger disconnected",
        3 => "Idle",
        4 => "Remote control active",
        5 => "Cleaning",
        6 => "Returning home",
        7 => "Manual mode",
        8 => "Charging",
        9 => "Charging problem",
        10 => "Paused",
        11 => "Spot cleaning",
        12 => "Error",
        13 => "Shutting down",
        14 => "Updating",
        15 => "Docking",
        16 => "Going to target",
        17 => "Zoned cleaning",
        18 => "Segment cleaning",
        100 => "Charging complete",
        101 => "Device offline",
        other => return format!("Unknown state ({other})"),
    };
    text.to_string()
}
