//! Floating-point literal parsing.
//!
//! Decimal forms go through [`str::parse`]. Hexadecimal forms are
//! `[sign] 0x mantissa p exponent`: hex digits with at most one `.`, `_`
//! between digits or right after the prefix, and a mandatory binary
//! exponent written in decimal. The value is `mantissa * 2^exponent`.

use std::str::FromStr;

use num_traits::AsPrimitive;

use super::CoerceError;

/// Largest binary exponent magnitude kept; anything beyond already
/// saturates to zero or infinity.
const EXPONENT_LIMIT: i64 = 100_000;

/// Parses a float literal into `T`.
pub(crate) fn parse_float<T>(raw: &str) -> Result<T, CoerceError>
where
    T: FromStr + Copy + 'static,
    f64: AsPrimitive<T>,
{
    let invalid = || CoerceError::InvalidFloat {
        value: raw.to_owned(),
    };

    let (negative, body) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) else {
        return raw.parse().map_err(|_| invalid());
    };

    let value = parse_hex(hex).ok_or_else(invalid)?;
    let value = if negative { -value } else { value };
    Ok(value.as_())
}

fn parse_hex(s: &str) -> Option<f64> {
    let (mantissa, exponent) = s.split_once(['p', 'P'])?;
    let exponent = parse_exponent(exponent)?;

    let mut bits: u64 = 0;
    let mut shift: i64 = 0;
    let mut sticky = false;
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut prev_is_digit = true;
    let mut last_underscore = false;

    for c in mantissa.chars() {
        match c {
            '_' => {
                if !prev_is_digit {
                    return None;
                }
                prev_is_digit = false;
                last_underscore = true;
            }
            '.' => {
                if seen_dot || last_underscore {
                    return None;
                }
                seen_dot = true;
                prev_is_digit = false;
            }
            _ => {
                let digit = c.to_digit(16)?;
                seen_digit = true;

                // Past 60 bits only the exponent moves; dropped digits
                // still steer rounding through the sticky bit.
                if bits >> 60 == 0 {
                    bits = bits << 4 | u64::from(digit);
                    if seen_dot {
                        shift -= 4;
                    }
                } else {
                    sticky |= digit != 0;
                    if !seen_dot {
                        shift += 4;
                    }
                }

                prev_is_digit = true;
                last_underscore = false;
            }
        }
    }

    if !seen_digit || last_underscore {
        return None;
    }

    if sticky {
        bits |= 1;
    }

    #[allow(clippy::cast_precision_loss)]
    let value = bits as f64;
    Some(scale(value, exponent + shift))
}

fn parse_exponent(s: &str) -> Option<i64> {
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    if digits.is_empty()
        || digits.starts_with('_')
        || digits.ends_with('_')
        || digits.contains("__")
    {
        return None;
    }

    let mut value: i64 = 0;
    for c in digits.chars().filter(|&c| c != '_') {
        let digit = c.to_digit(10)?;
        value = (value * 10 + i64::from(digit)).min(EXPONENT_LIMIT);
    }

    Some(if negative { -value } else { value })
}

/// Multiplies by `2^exp` in steps that keep every factor a normal float.
fn scale(mut value: f64, mut exp: i64) -> f64 {
    while exp != 0 && value != 0.0 && value.is_finite() {
        let step = exp.clamp(-1000, 1000);
        // `step` is within ±1000.
        #[allow(clippy::cast_possible_truncation)]
        let factor = 2f64.powi(step as i32);
        value *= factor;
        exp -= step;
    }
    value
}
