use thiserror::Error;

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 3600;

/// Which field of an `HH:MM:SS` string failed to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum TimeField {
    Hours,
    Minutes,
    Seconds,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseTimeError {
    #[error("expected HH:MM:SS, found {0} field(s)")]
    FieldCount(usize),
    #[error("{field} is not a whole number: {value:?}")]
    InvalidField { field: TimeField, value: String },
    #[error("duration does not fit in a signed 64-bit second count")]
    Overflow,
}

/// Render a second count as `HH:MM:SS`.
///
/// The minutes field is `(seconds / 60) % 3600`, so past the first hour it
/// keeps counting total minutes (`3661` renders as `01:61:01`). That form
/// does not parse back to the same count; use `edit_time` for text that will
/// be fed to `parse_time`. Negative counts render as `-` plus the magnitude.
pub fn format_time(seconds: i64) -> String {
    with_sign(seconds, SECS_PER_HOUR)
}

/// Render a second count as `HH:MM:SS` with minutes below 60, the form
/// `parse_time` reads back unchanged.
pub fn edit_time(seconds: i64) -> String {
    with_sign(seconds, SECS_PER_MINUTE)
}

fn with_sign(seconds: i64, minutes_modulus: u64) -> String {
    let magnitude = format_magnitude(seconds.unsigned_abs(), minutes_modulus);
    if seconds < 0 {
        format!("-{magnitude}")
    } else {
        magnitude
    }
}

fn format_magnitude(secs: u64, minutes_modulus: u64) -> String {
    let hours = secs / SECS_PER_HOUR;
    let minutes = (secs / SECS_PER_MINUTE) % minutes_modulus;
    let seconds = secs % SECS_PER_MINUTE;

    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Parse an `HH:MM:SS` string into seconds.
///
/// Exactly three colon-separated whole numbers are required. Field ranges are
/// not checked, so `00:90:00` is 5400 seconds.
pub fn parse_time(display: &str) -> Result<i64, ParseTimeError> {
    let parts: Vec<&str> = display.split(':').collect();
    let [hours, minutes, seconds] = parts.as_slice() else {
        return Err(ParseTimeError::FieldCount(parts.len()));
    };

    let hours = parse_field(hours, TimeField::Hours)?;
    let minutes = parse_field(minutes, TimeField::Minutes)?;
    let seconds = parse_field(seconds, TimeField::Seconds)?;

    let total = hours
        .checked_mul(SECS_PER_HOUR)
        .and_then(|h| minutes.checked_mul(SECS_PER_MINUTE).map(|m| (h, m)))
        .and_then(|(h, m)| h.checked_add(m))
        .and_then(|hm| hm.checked_add(seconds))
        .ok_or(ParseTimeError::Overflow)?;

    i64::try_from(total).map_err(|_| ParseTimeError::Overflow)
}

fn parse_field(raw: &str, field: TimeField) -> Result<u64, ParseTimeError> {
    let trimmed = raw.trim();
    // u64's FromStr allows a leading '+', which no display ever produces
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseTimeError::InvalidField {
            field,
            value: raw.to_string(),
        });
    }

    trimmed.parse::<u64>().map_err(|_| ParseTimeError::Overflow)
}
