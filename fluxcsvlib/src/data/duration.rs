//! Compound duration parsing (`1h20m30.13245s`, `-1.5h`, `300ms`).
//!
//! A duration is an optional sign followed by one or more `<number><unit>`
//! terms. Numbers may carry a fraction. Valid units are `ns`, `us` (or `µs`,
//! `μs`), `ms`, `s`, `m` and `h`. A bare `0` is accepted without a unit.
//! The total must fit in a signed 64-bit count of nanoseconds.

use chrono::TimeDelta;
use thiserror::Error;

/// Errors produced by [`parse_duration`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    #[error("invalid duration '{0}'")]
    Invalid(String),

    #[error("missing unit in duration '{0}'")]
    MissingUnit(String),

    #[error("unknown unit '{unit}' in duration '{input}'")]
    UnknownUnit { unit: String, input: String },

    #[error("duration '{0}' out of range")]
    Overflow(String),
}

const NANOS_PER_UNIT: &[(&str, u64)] = &[
    ("ns", 1),
    ("us", 1_000),
    ("\u{00b5}s", 1_000),
    ("\u{03bc}s", 1_000),
    ("ms", 1_000_000),
    ("s", 1_000_000_000),
    ("m", 60 * 1_000_000_000),
    ("h", 60 * 60 * 1_000_000_000),
];

// Magnitude of i64::MIN; the only value allowed to exceed i64::MAX.
const MAX_MAGNITUDE: u64 = 1 << 63;

/// Parse a compound duration expression.
pub fn parse_duration(input: &str) -> Result<TimeDelta, DurationError> {
    let invalid = || DurationError::Invalid(input.to_string());
    let overflow = || DurationError::Overflow(input.to_string());

    let mut rest = input;
    let mut negative = false;
    if let Some(stripped) = rest.strip_prefix('-') {
        negative = true;
        rest = stripped;
    } else if let Some(stripped) = rest.strip_prefix('+') {
        rest = stripped;
    }

    if rest == "0" {
        return Ok(TimeDelta::zero());
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total: u64 = 0;
    while !rest.is_empty() {
        if !rest.starts_with(|c: char| c == '.' || c.is_ascii_digit()) {
            return Err(invalid());
        }

        let (whole, after_whole) = leading_int(rest).ok_or_else(overflow)?;
        let has_whole = after_whole.len() != rest.len();
        rest = after_whole;

        let mut fraction = 0u64;
        let mut scale = 1.0f64;
        let mut has_fraction = false;
        if let Some(after_dot) = rest.strip_prefix('.') {
            let (f, s, after_fraction) = leading_fraction(after_dot);
            has_fraction = after_fraction.len() != after_dot.len();
            fraction = f;
            scale = s;
            rest = after_fraction;
        }
        if !has_whole && !has_fraction {
            return Err(invalid());
        }

        let unit_end = rest
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        if unit_end == 0 {
            return Err(DurationError::MissingUnit(input.to_string()));
        }
        let unit = &rest[..unit_end];
        rest = &rest[unit_end..];

        let per_unit = NANOS_PER_UNIT
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, nanos)| *nanos)
            .ok_or_else(|| DurationError::UnknownUnit {
                unit: unit.to_string(),
                input: input.to_string(),
            })?;

        if whole > MAX_MAGNITUDE / per_unit {
            return Err(overflow());
        }
        let mut term = whole * per_unit;
        if fraction > 0 {
            term = term
                .checked_add((fraction as f64 * (per_unit as f64 / scale)) as u64)
                .filter(|t| *t <= MAX_MAGNITUDE)
                .ok_or_else(overflow)?;
        }
        total = total
            .checked_add(term)
            .filter(|t| *t <= MAX_MAGNITUDE)
            .ok_or_else(overflow)?;
    }

    let nanos = if negative {
        0i64.checked_sub_unsigned(total).ok_or_else(overflow)?
    } else {
        i64::try_from(total).map_err(|_| overflow())?
    };
    Ok(TimeDelta::nanoseconds(nanos))
}

/// Consume leading decimal digits. `None` on overflow.
fn leading_int(s: &str) -> Option<(u64, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let mut value: u64 = 0;
    for digit in s[..end].bytes() {
        value = value
            .checked_mul(10)?
            .checked_add(u64::from(digit - b'0'))
            .filter(|v| *v <= MAX_MAGNITUDE)?;
    }
    Some((value, &s[end..]))
}

/// Consume leading fraction digits, returning the digits as an integer and
/// the power of ten they are scaled by. Digits beyond u64 precision are
/// dropped.
fn leading_fraction(s: &str) -> (u64, f64, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let mut value: u64 = 0;
    let mut scale = 1.0f64;
    let mut saturated = false;
    for digit in s[..end].bytes() {
        if saturated {
            continue;
        }
        match value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u64::from(digit - b'0')))
        {
            Some(next) if next <= i64::MAX as u64 => {
                value = next;
                scale *= 10.0;
            }
            _ => saturated = true,
        }
    }
    (value, scale, &s[end..])
}
