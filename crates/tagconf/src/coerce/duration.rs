//! Duration literal parsing.
//!
//! A duration literal is an optionally signed sequence of decimal numbers,
//! each with an optional fraction and a mandatory unit suffix, such as
//! `300ms`, `-1.5h` or `2h45m`. Valid units are `ns`, `us` (or `µs`/`μs`),
//! `ms`, `s`, `m` and `h`. A bare `0` needs no unit.
//!
//! Values are computed in nanoseconds and must fit in an `i64`.

use std::time::Duration;

use chrono::TimeDelta;

use super::CoerceError;

const NANOS_PER_MICRO: u64 = 1_000;
const NANOS_PER_MILLI: u64 = 1_000_000;
const NANOS_PER_SECOND: u64 = 1_000_000_000;
const NANOS_PER_MINUTE: u64 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: u64 = 60 * NANOS_PER_MINUTE;

/// Upper bound of an accumulated magnitude (`|i64::MIN|`).
const LIMIT: u64 = 1 << 63;

fn unit_nanos(unit: &str) -> Option<u64> {
    match unit {
        "ns" => Some(1),
        // U+00B5 micro sign and U+03BC greek small letter mu
        "us" | "\u{b5}s" | "\u{3bc}s" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SECOND),
        "m" => Some(NANOS_PER_MINUTE),
        "h" => Some(NANOS_PER_HOUR),
        _ => None,
    }
}

fn invalid(raw: &str, reason: &'static str) -> CoerceError {
    CoerceError::InvalidDuration {
        value: raw.to_owned(),
        reason,
    }
}

/// Consumes leading decimal digits. Returns `None` on overflow.
fn leading_int(s: &str) -> Option<(u64, &str)> {
    let mut x: u64 = 0;
    let mut consumed = 0;

    for b in s.bytes() {
        if !b.is_ascii_digit() {
            break;
        }
        if x > LIMIT / 10 {
            return None;
        }
        x = x * 10 + u64::from(b - b'0');
        if x > LIMIT {
            return None;
        }
        consumed += 1;
    }

    Some((x, &s[consumed..]))
}

/// Consumes the digits of a fraction, returning the digits read as an
/// integer together with the power of ten they were scaled by. Digits past
/// the representable precision are consumed and dropped.
fn leading_fraction(s: &str) -> (u64, f64, &str) {
    let mut x: u64 = 0;
    let mut scale = 1.0_f64;
    let mut overflow = false;
    let mut consumed = 0;

    for b in s.bytes() {
        if !b.is_ascii_digit() {
            break;
        }
        consumed += 1;
        if overflow {
            continue;
        }
        if x > (LIMIT - 1) / 10 {
            overflow = true;
            continue;
        }
        let y = x * 10 + u64::from(b - b'0');
        if y > LIMIT {
            overflow = true;
            continue;
        }
        x = y;
        scale *= 10.0;
    }

    (x, scale, &s[consumed..])
}

/// Parses a duration literal into signed nanoseconds.
pub fn parse_duration_nanos(raw: &str) -> Result<i64, CoerceError> {
    let mut s = raw;
    let mut negative = false;

    if let Some(rest) = s.strip_prefix('-') {
        negative = true;
        s = rest;
    } else if let Some(rest) = s.strip_prefix('+') {
        s = rest;
    }

    if s == "0" {
        return Ok(0);
    }
    if s.is_empty() {
        return Err(invalid(raw, "empty duration"));
    }

    let mut total: u64 = 0;

    while !s.is_empty() {
        let first = s.as_bytes()[0];
        if !(first == b'.' || first.is_ascii_digit()) {
            return Err(invalid(raw, "expected a number"));
        }

        let before = s.len();
        let (whole, rest) = leading_int(s).ok_or_else(|| invalid(raw, "overflow"))?;
        s = rest;
        let has_whole = before != s.len();

        let mut frac = 0;
        let mut scale = 1.0;
        let mut has_frac = false;
        if let Some(rest) = s.strip_prefix('.') {
            let before = rest.len();
            let (f, sc, rest) = leading_fraction(rest);
            frac = f;
            scale = sc;
            s = rest;
            has_frac = before != s.len();
        }

        if !has_whole && !has_frac {
            return Err(invalid(raw, "expected digits around '.'"));
        }

        let unit_len = s
            .bytes()
            .position(|b| b == b'.' || b.is_ascii_digit())
            .unwrap_or(s.len());
        if unit_len == 0 {
            return Err(invalid(raw, "missing unit"));
        }
        let (unit, rest) = s.split_at(unit_len);
        s = rest;

        let unit = unit_nanos(unit).ok_or_else(|| invalid(raw, "unknown unit"))?;

        if whole > LIMIT / unit {
            return Err(invalid(raw, "overflow"));
        }
        let mut value = whole * unit;

        if frac > 0 {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
            let scaled = (frac as f64 * (unit as f64 / scale)) as u64;
            value = value.checked_add(scaled).ok_or_else(|| invalid(raw, "overflow"))?;
            if value > LIMIT {
                return Err(invalid(raw, "overflow"));
            }
        }

        total = total.checked_add(value).ok_or_else(|| invalid(raw, "overflow"))?;
        if total > LIMIT {
            return Err(invalid(raw, "overflow"));
        }
    }

    if negative {
        // total <= 2^63, so the two's complement negation always fits.
        #[allow(clippy::cast_possible_wrap)]
        return Ok((total as i64).wrapping_neg());
    }

    i64::try_from(total).map_err(|_| invalid(raw, "overflow"))
}

/// Parses a non-negative duration literal.
pub fn parse_duration(raw: &str) -> Result<Duration, CoerceError> {
    let nanos = parse_duration_nanos(raw)?;
    let nanos = u64::try_from(nanos).map_err(|_| invalid(raw, "negative duration"))?;

    Ok(Duration::from_nanos(nanos))
}

/// Parses a signed duration literal.
pub fn parse_time_delta(raw: &str) -> Result<TimeDelta, CoerceError> {
    parse_duration_nanos(raw).map(TimeDelta::nanoseconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_units() {
        assert_eq!(parse_duration("5s"), Ok(Duration::from_secs(5)));
        assert_eq!(parse_duration("300ms"), Ok(Duration::from_millis(300)));
        assert_eq!(parse_duration("10us"), Ok(Duration::from_micros(10)));
        assert_eq!(parse_duration("10µs"), Ok(Duration::from_micros(10)));
        assert_eq!(parse_duration("10μs"), Ok(Duration::from_micros(10)));
        assert_eq!(parse_duration("7ns"), Ok(Duration::from_nanos(7)));
        assert_eq!(parse_duration("1h"), Ok(Duration::from_secs(3600)));
    }

    #[test]
    fn test_compound_and_fraction() {
        assert_eq!(
            parse_duration("2h30m"),
            Ok(Duration::from_secs(2 * 3600 + 30 * 60))
        );
        assert_eq!(parse_duration("1.5s"), Ok(Duration::from_millis(1500)));
        assert_eq!(parse_duration(".5s"), Ok(Duration::from_millis(500)));
        assert_eq!(parse_duration("1.s"), Ok(Duration::from_secs(1)));
        assert_eq!(parse_duration("1h1m1s"), Ok(Duration::from_secs(3661)));
    }

    #[test]
    fn test_zero_and_sign() {
        assert_eq!(parse_duration("0"), Ok(Duration::ZERO));
        assert_eq!(parse_duration("+0"), Ok(Duration::ZERO));
        assert_eq!(parse_duration("-0"), Ok(Duration::ZERO));
        assert_eq!(parse_duration("+5s"), Ok(Duration::from_secs(5)));
        assert_eq!(parse_duration_nanos("-1.5h"), Ok(-5_400_000_000_000));
    }

    #[test]
    fn test_rejects_malformed() {
        for raw in ["", "-", "5", "s", ".s", "5x", "1.2.3s", "5 s", "ms5"] {
            assert!(parse_duration_nanos(raw).is_err(), "{raw:?}");
        }
    }

    #[test]
    fn test_negative_rejected_for_std() {
        assert!(matches!(
            parse_duration("-5s"),
            Err(CoerceError::InvalidDuration {
                reason: "negative duration",
                ..
            })
        ));
        assert_eq!(parse_time_delta("-5s"), Ok(TimeDelta::seconds(-5)));
    }

    #[test]
    fn test_bounds() {
        assert_eq!(parse_duration_nanos("9223372036854775807ns"), Ok(i64::MAX));
        assert_eq!(parse_duration_nanos("-9223372036854775808ns"), Ok(i64::MIN));
        assert!(parse_duration_nanos("9223372036854775808ns").is_err());
        assert!(parse_duration_nanos("3000000h").is_err());
    }
}
