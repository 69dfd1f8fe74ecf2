//! # Entry Date Normalization
//!
//! Worker entry dates arrive from the directory sheet in whatever shape the
//! upstream export produced: already-canonical `YYYY-MM-DD` strings, full
//! timestamps, or day-first `D/M/YYYY` cell values. This module folds all of
//! them into the canonical `YYYY-MM-DD` form the rest of the app stores and
//! compares.
//!
//! Timestamp inputs need a policy decision. The sheet records civil dates in
//! a fixed UTC+1 frame, so a date like `2025-12-01` is exported as the
//! instant `2025-11-30T23:00:00.000Z`. [`DatePolicy::OffsetShift`] recovers
//! the intended civil date by reading the instant back in that frame.
//! [`DatePolicy::Truncate`] instead cuts at the `T` separator and keeps the
//! date component verbatim, which preserves the UTC calendar date.

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Offset of the sheet's civil frame, in seconds east of UTC.
const SHEET_UTC_OFFSET_SECS: i32 = 3600;

/// How timestamp-shaped entry dates are reduced to a calendar date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePolicy {
    /// Parse the timestamp as an instant and take its calendar date in the
    /// sheet's UTC+1 civil frame. Recovers the date the sheet displayed.
    #[default]
    OffsetShift,
    /// Cut at the time separator and keep the date component verbatim.
    /// Keeps the UTC calendar date, which can sit one day before the civil
    /// date the sheet displayed.
    Truncate,
}

impl FromStr for DatePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "offset_shift" | "offset-shift" => Ok(DatePolicy::OffsetShift),
            "truncate" => Ok(DatePolicy::Truncate),
            other => Err(format!("unknown date policy '{other}'")),
        }
    }
}

/// Normalize a raw entry-date cell into canonical `YYYY-MM-DD` form.
///
/// Returns `None` for empty or unrecognized input. Recognized forms, in
/// order:
///
/// 1. Canonical `YYYY-MM-DD` strings pass through unchanged.
/// 2. Timestamps (`YYYY-MM-DDT...`) reduce to a date per the policy. An
///    offset-less timestamp is read as UTC.
/// 3. Day-first `D/M/YYYY` values are range-checked and zero-padded.
///
/// Range checks are deliberately shallow: day must be in 1..=31, month in
/// 1..=12, and year in 1900..=9999. Calendar validity is not enforced, so
/// `31/02/2025` normalizes to `2025-02-31`. Downstream consumers treat the
/// value as an opaque label, not an arithmetic date.
pub fn normalize(raw: &str, policy: DatePolicy) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if is_canonical(trimmed) {
        return Some(trimmed.to_string());
    }
    if let Some(prefix) = timestamp_date_prefix(trimmed) {
        return match policy {
            DatePolicy::Truncate => Some(prefix.to_string()),
            DatePolicy::OffsetShift => match shifted_calendar_date(trimmed) {
                Some(date) => Some(date),
                None => {
                    debug!(input = %trimmed, "Timestamp-shaped entry date did not parse as an instant");
                    None
                }
            },
        };
    }
    if let Some(canonical) = from_slash_form(trimmed) {
        return Some(canonical);
    }
    debug!(input = %trimmed, "Unrecognized entry date format");
    None
}

/// Exact `YYYY-MM-DD` shape check. Shape only, no calendar validation.
fn is_canonical(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(index, byte)| match index {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        })
}

/// The canonical date prefix of a timestamp-shaped value, if it has one.
fn timestamp_date_prefix(value: &str) -> Option<&str> {
    let prefix = value.get(..10)?;
    if is_canonical(prefix) && value.as_bytes().get(10) == Some(&b'T') {
        Some(prefix)
    } else {
        None
    }
}

/// Parse a timestamp as an instant and format its date in the sheet frame.
fn shifted_calendar_date(raw: &str) -> Option<String> {
    let instant = parse_instant(raw)?;
    let frame = FixedOffset::east_opt(SHEET_UTC_OFFSET_SECS)?;
    let formatted = instant.with_timezone(&frame).format("%Y-%m-%d").to_string();
    // The shift can leave the four-digit year range at its far ends.
    is_canonical(&formatted).then_some(formatted)
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.with_timezone(&Utc));
    }
    // Offset-less timestamps are read as UTC.
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    None
}

fn from_slash_form(value: &str) -> Option<String> {
    let mut parts = value.split('/');
    let day = parse_component(parts.next()?)?;
    let month = parse_component(parts.next()?)?;
    let year = parse_component(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    if !(1..=31).contains(&day) || !(1..=12).contains(&month) || !(1900..=9999).contains(&year) {
        return None;
    }
    Some(format!("{year:04}-{month:02}-{day:02}"))
}

fn parse_component(part: &str) -> Option<u32> {
    let part = part.trim();
    if part.is_empty() || !part.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}
