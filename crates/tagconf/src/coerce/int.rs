//! Integer and boolean literal parsing.
//!
//! Integers use the flexible literal syntax: an optional sign (signed kinds
//! only), then one of `0x`/`0X` (hex), `0o`/`0O` (octal), `0b`/`0B`
//! (binary), a bare leading `0` (octal), or plain decimal digits. `_` may
//! separate digits, and may follow a base prefix, but may not lead, trail,
//! or repeat.

use num_traits::FromPrimitive;

use super::CoerceError;

/// Splits a literal into its sign and magnitude.
fn parse_magnitude(raw: &str, allow_sign: bool) -> Result<(bool, u128), CoerceError> {
    let invalid = || CoerceError::InvalidInt {
        value: raw.to_owned(),
    };

    let mut s = raw;
    let mut negative = false;

    if allow_sign && let Some(first) = s.chars().next() {
        if first == '+' || first == '-' {
            negative = first == '-';
            s = &s[1..];
        }
    }

    if s.is_empty() {
        return Err(invalid());
    }

    // A base prefix needs at least one character after it; "0x" alone is
    // read as octal and rejected on the 'x'.
    let bytes = s.as_bytes();
    let (radix, digits, after_digit) = if bytes[0] == b'0' && bytes.len() >= 3 {
        match bytes[1].to_ascii_lowercase() {
            b'x' => (16, &s[2..], true),
            b'o' => (8, &s[2..], true),
            b'b' => (2, &s[2..], true),
            _ => (8, &s[1..], true),
        }
    } else if bytes[0] == b'0' {
        (8, &s[1..], true)
    } else {
        (10, s, false)
    };

    let mut value: u128 = 0;
    let mut prev_is_digit = after_digit;
    let mut last_underscore = false;

    for c in digits.chars() {
        if c == '_' {
            if !prev_is_digit {
                return Err(invalid());
            }
            prev_is_digit = false;
            last_underscore = true;
            continue;
        }

        let digit = c.to_digit(radix).ok_or_else(invalid)?;
        value = value
            .checked_mul(u128::from(radix))
            .and_then(|v| v.checked_add(u128::from(digit)))
            .ok_or_else(invalid)?;

        prev_is_digit = true;
        last_underscore = false;
    }

    if last_underscore {
        return Err(invalid());
    }

    Ok((negative, value))
}

/// Parses a signed integer literal into `T`, range-checked against `T`.
pub(crate) fn parse_signed<T: FromPrimitive>(
    raw: &str,
    type_name: &'static str,
) -> Result<T, CoerceError> {
    let (negative, magnitude) = parse_magnitude(raw, true)?;

    let out_of_range = || CoerceError::OutOfRange {
        value: raw.to_owned(),
        type_name,
    };

    let value = if negative {
        0i128.checked_sub_unsigned(magnitude)
    } else {
        i128::try_from(magnitude).ok()
    }
    .ok_or_else(out_of_range)?;

    T::from_i128(value).ok_or_else(out_of_range)
}

/// Parses an unsigned integer literal into `T`, range-checked against `T`.
pub(crate) fn parse_unsigned<T: FromPrimitive>(
    raw: &str,
    type_name: &'static str,
) -> Result<T, CoerceError> {
    let (_, magnitude) = parse_magnitude(raw, false)?;

    T::from_u128(magnitude).ok_or_else(|| CoerceError::OutOfRange {
        value: raw.to_owned(),
        type_name,
    })
}

/// Parses the canonical boolean literal forms.
///
/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`; any other
/// spelling (including `yes`/`no` or mixed case like `tRUE`) is rejected.
pub fn parse_bool(raw: &str) -> Result<bool, CoerceError> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(CoerceError::InvalidBool {
            value: raw.to_owned(),
        }),
    }
}
