//! String-to-value coercion.
//!
//! Every raw configuration value is a string. The [`Coerce`] trait turns it
//! into the destination type; [`set_field`] writes the result into a slot.
//!
//! # Supported Types
//!
//! | Type | Accepted input |
//! |------|----------------|
//! | `String`, `PathBuf` | any string, verbatim |
//! | `i8`..`i128`, `isize` | `42`, `-0x2A`, `0o52`, `0b101010`, `052`, `1_000` |
//! | `u8`..`u128`, `usize` | as above, without a sign |
//! | `bool` | `1 t T TRUE true True` / `0 f F FALSE false False` |
//! | `f32`, `f64` | `1.5`, `-2e3`, `inf`, `NaN`, hex `0x1.8p1`, `0x_1p-2` |
//! | `Duration` | `300ms`, `2h45m`, `1.5s` (non-negative) |
//! | `chrono::TimeDelta` | as above, sign allowed |
//! | `Vec<u8>` | the raw bytes of the string |
//! | `Vec<T>` | `a,b,c`; empty input gives an empty vector |
//! | `HashMap<K, V>`, `BTreeMap<K, V>` | `k1:v1,k2:v2`; empty input gives an empty map |
//! | `Option<T>`, `Box<T>` | whatever `T` accepts |
//! | `SecretString` | any string (with `secrecy` feature) |
//!
//! Sequence and map elements are not trimmed: `"a, b"` yields `"a"` and `" b"`.

mod duration;
mod float;
mod int;

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::path::PathBuf;
use std::time::Duration;

use chrono::TimeDelta;
use miette::Diagnostic;
use thiserror::Error as ThisError;

pub use duration::{parse_duration, parse_duration_nanos, parse_time_delta};
pub use int::parse_bool;

const REDACTED: &str = "<redacted>";

/// Why a raw string could not be converted.
#[derive(Clone, Debug, PartialEq, Eq, ThisError, Diagnostic)]
pub enum CoerceError {
    /// Not an integer literal.
    #[error("invalid integer literal {value:?}")]
    #[diagnostic(
        code(tagconf::coerce::int),
        help("integers may use 0x, 0o, 0b or a leading 0 for octal, and _ between digits")
    )]
    InvalidInt {
        /// The raw value.
        value: String,
    },

    /// An integer literal that does not fit the destination.
    #[error("{value:?} is out of range for {type_name}")]
    #[diagnostic(code(tagconf::coerce::out_of_range))]
    OutOfRange {
        /// The raw value.
        value: String,

        /// The destination integer type.
        type_name: &'static str,
    },

    /// Not a boolean literal.
    #[error("invalid boolean literal {value:?}")]
    #[diagnostic(
        code(tagconf::coerce::bool),
        help("use one of 1, t, T, TRUE, true, True, 0, f, F, FALSE, false, False")
    )]
    InvalidBool {
        /// The raw value.
        value: String,
    },

    /// Not a floating point literal.
    #[error("invalid float literal {value:?}")]
    #[diagnostic(code(tagconf::coerce::float))]
    InvalidFloat {
        /// The raw value.
        value: String,
    },

    /// Not a duration literal.
    #[error("invalid duration {value:?}: {reason}")]
    #[diagnostic(
        code(tagconf::coerce::duration),
        help("durations look like 300ms, 1.5h or 2h45m; units are ns, us, ms, s, m, h")
    )]
    InvalidDuration {
        /// The raw value.
        value: String,

        /// What was wrong with it.
        reason: &'static str,
    },

    /// A map entry without exactly one `:`.
    #[error("invalid map item: {pair:?}")]
    #[diagnostic(
        code(tagconf::coerce::map_entry),
        help("map entries look like key:value, separated by ','")
    )]
    MalformedMapEntry {
        /// The offending `key:value` token.
        pair: String,
    },

    /// Failure reported by a user `Coerce` implementation.
    #[error("{message}")]
    #[diagnostic(code(tagconf::coerce::custom))]
    Custom {
        /// Description of the failure.
        message: String,
    },
}

impl CoerceError {
    /// Creates a `Custom` error for user `Coerce` implementations.
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
        }
    }

    /// Replaces every raw value held by the error with a placeholder.
    #[must_use]
    pub fn redact(self) -> Self {
        match self {
            Self::InvalidInt { .. } => Self::InvalidInt {
                value: REDACTED.into(),
            },
            Self::OutOfRange { type_name, .. } => Self::OutOfRange {
                value: REDACTED.into(),
                type_name,
            },
            Self::InvalidBool { .. } => Self::InvalidBool {
                value: REDACTED.into(),
            },
            Self::InvalidFloat { .. } => Self::InvalidFloat {
                value: REDACTED.into(),
            },
            Self::InvalidDuration { reason, .. } => Self::InvalidDuration {
                value: REDACTED.into(),
                reason,
            },
            Self::MalformedMapEntry { .. } => Self::MalformedMapEntry {
                pair: REDACTED.into(),
            },
            // User messages may quote the input.
            Self::Custom { .. } => Self::Custom {
                message: REDACTED.into(),
            },
        }
    }
}

/// Types that can be built from a raw configuration string.
///
/// Implement this for your own types to use them as field types:
///
/// ```rust
/// use tagconf::{Coerce, CoerceError};
///
/// #[derive(Debug, PartialEq)]
/// enum Level { Low, High }
///
/// impl Coerce for Level {
///     fn coerce(raw: &str) -> Result<Self, CoerceError> {
///         match raw {
///             "low" => Ok(Self::Low),
///             "high" => Ok(Self::High),
///             other => Err(CoerceError::custom(format!("unknown level {other:?}"))),
///         }
///     }
/// }
///
/// assert_eq!(Level::coerce("high").unwrap(), Level::High);
/// let levels: Vec<Level> = Coerce::coerce("low,high").unwrap();
/// assert_eq!(levels, vec![Level::Low, Level::High]);
/// ```
pub trait Coerce: Sized {
    /// Converts `raw` into `Self`.
    fn coerce(raw: &str) -> Result<Self, CoerceError>;

    /// Converts `raw` into a sequence of `Self`.
    ///
    /// By default, whitespace-only input yields an empty vector and any
    /// other input is split on `,` with each token coerced in order. Byte
    /// types override this to take the string's bytes verbatim.
    fn coerce_seq(raw: &str) -> Result<Vec<Self>, CoerceError> {
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        raw.split(',').map(Self::coerce).collect()
    }

    /// Borrows the value as a string when it is string-like.
    ///
    /// Used to detect `!secret:` markers in deserialized documents.
    fn as_raw_str(&self) -> Option<&str> {
        None
    }
}

/// Coerces `raw` and stores it in `dest`.
///
/// `dest` is left untouched when coercion fails.
pub fn set_field<T: Coerce>(raw: &str, dest: &mut T) -> Result<(), CoerceError> {
    *dest = T::coerce(raw)?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Scalars
// ─────────────────────────────────────────────────────────────────────────────

impl Coerce for String {
    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        Ok(raw.to_owned())
    }

    fn as_raw_str(&self) -> Option<&str> {
        Some(self)
    }
}

impl Coerce for PathBuf {
    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        Ok(Self::from(raw))
    }
}

impl Coerce for bool {
    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        parse_bool(raw)
    }
}

macro_rules! impl_coerce_signed {
    ($($t:ty),* $(,)?) => {$(
        impl Coerce for $t {
            fn coerce(raw: &str) -> Result<Self, CoerceError> {
                int::parse_signed(raw, stringify!($t))
            }
        }
    )*};
}

macro_rules! impl_coerce_unsigned {
    ($($t:ty),* $(,)?) => {$(
        impl Coerce for $t {
            fn coerce(raw: &str) -> Result<Self, CoerceError> {
                int::parse_unsigned(raw, stringify!($t))
            }
        }
    )*};
}

macro_rules! impl_coerce_float {
    ($($t:ty),* $(,)?) => {$(
        impl Coerce for $t {
            fn coerce(raw: &str) -> Result<Self, CoerceError> {
                float::parse_float(raw)
            }
        }
    )*};
}

impl_coerce_signed!(i8, i16, i32, i64, i128, isize);
impl_coerce_unsigned!(u16, u32, u64, u128, usize);
impl_coerce_float!(f32, f64);

impl Coerce for u8 {
    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        int::parse_unsigned(raw, "u8")
    }

    fn coerce_seq(raw: &str) -> Result<Vec<Self>, CoerceError> {
        Ok(raw.as_bytes().to_vec())
    }
}

impl Coerce for Duration {
    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        parse_duration(raw)
    }
}

impl Coerce for TimeDelta {
    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        parse_time_delta(raw)
    }
}

#[cfg(feature = "secrecy")]
impl Coerce for secrecy::SecretString {
    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        Ok(Self::from(raw.to_owned()))
    }

    fn as_raw_str(&self) -> Option<&str> {
        use secrecy::ExposeSecret;
        Some(self.expose_secret())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Containers
// ─────────────────────────────────────────────────────────────────────────────

impl<T: Coerce> Coerce for Option<T> {
    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        T::coerce(raw).map(Some)
    }

    fn as_raw_str(&self) -> Option<&str> {
        self.as_ref().and_then(T::as_raw_str)
    }
}

impl<T: Coerce> Coerce for Box<T> {
    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        T::coerce(raw).map(Box::new)
    }

    fn as_raw_str(&self) -> Option<&str> {
        T::as_raw_str(self)
    }
}

impl<T: Coerce> Coerce for Vec<T> {
    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        T::coerce_seq(raw)
    }
}

/// Splits `k1:v1,k2:v2` into coerced pairs.
fn map_entries<K: Coerce, V: Coerce>(
    raw: &str,
) -> impl Iterator<Item = Result<(K, V), CoerceError>> + '_ {
    let pairs = if raw.trim().is_empty() {
        None
    } else {
        Some(raw.split(','))
    };

    pairs.into_iter().flatten().map(|pair| {
        let mut parts = pair.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(key), Some(value), None) => Ok((K::coerce(key)?, V::coerce(value)?)),
            _ => Err(CoerceError::MalformedMapEntry {
                pair: pair.to_owned(),
            }),
        }
    })
}

impl<K, V, S> Coerce for HashMap<K, V, S>
where
    K: Coerce + Eq + Hash,
    V: Coerce,
    S: std::hash::BuildHasher + Default,
{
    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        map_entries(raw).collect()
    }
}

impl<K: Coerce + Ord, V: Coerce> Coerce for BTreeMap<K, V> {
    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        map_entries(raw).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_verbatim() {
        assert_eq!(String::coerce("  spaced  ").unwrap(), "  spaced  ");
        assert_eq!(String::coerce("").unwrap(), "");
    }

    #[test]
    fn test_floats() {
        assert_eq!(f64::coerce("1.5").unwrap(), 1.5);
        assert_eq!(f32::coerce("-2e3").unwrap(), -2000.0);
        assert_eq!(f64::coerce("0x1p-2").unwrap(), 0.25);
        assert!(matches!(
            f64::coerce("one"),
            Err(CoerceError::InvalidFloat { .. })
        ));
    }

    #[test]
    fn test_byte_vec_takes_raw_bytes() {
        let bytes: Vec<u8> = Coerce::coerce("1,2").unwrap();
        assert_eq!(bytes, b"1,2".to_vec());
    }

    #[test]
    fn test_vec_split_on_comma() {
        let v: Vec<u16> = Coerce::coerce("1,2,3").unwrap();
        assert_eq!(v, vec![1, 2, 3]);

        let v: Vec<String> = Coerce::coerce("a, b").unwrap();
        assert_eq!(v, vec!["a".to_owned(), " b".to_owned()]);
    }

    #[test]
    fn test_vec_empty_input() {
        let v: Vec<i32> = Coerce::coerce("").unwrap();
        assert!(v.is_empty());
        let v: Vec<i32> = Coerce::coerce("   ").unwrap();
        assert!(v.is_empty());
    }

    #[test]
    fn test_vec_element_error() {
        let err = Vec::<i32>::coerce("1,x,3").unwrap_err();
        assert_eq!(err, CoerceError::InvalidInt { value: "x".into() });
    }

    #[test]
    fn test_map_pairs() {
        let m: HashMap<String, u32> = Coerce::coerce("a:1,b:2").unwrap();
        assert_eq!(m.len(), 2);
        assert_eq!(m["a"], 1);
        assert_eq!(m["b"], 2);

        let m: BTreeMap<u8, bool> = Coerce::coerce("1:true,2:0").unwrap();
        assert_eq!(m.into_iter().collect::<Vec<_>>(), vec![(1, true), (2, false)]);
    }

    #[test]
    fn test_map_empty_input() {
        let m: HashMap<String, String> = Coerce::coerce(" ").unwrap();
        assert!(m.is_empty());
    }

    #[test]
    fn test_map_malformed_entry() {
        for raw in ["a", "a:1,b", "a:1:2"] {
            let err = HashMap::<String, String>::coerce(raw).unwrap_err();
            assert!(
                matches!(err, CoerceError::MalformedMapEntry { .. }),
                "{raw}: {err:?}"
            );
        }

        let err = HashMap::<String, String>::coerce("a:1:2").unwrap_err();
        assert_eq!(err.to_string(), "invalid map item: \"a:1:2\"");
    }

    #[test]
    fn test_option_and_box_allocate() {
        assert_eq!(Option::<u16>::coerce("80").unwrap(), Some(80));
        assert_eq!(*Box::<i8>::coerce("-1").unwrap(), -1);
        assert!(Option::<u16>::coerce("x").is_err());
    }

    #[test]
    fn test_set_field_leaves_dest_on_error() {
        let mut port: u16 = 8080;
        assert!(set_field("nope", &mut port).is_err());
        assert_eq!(port, 8080);

        set_field("9090", &mut port).unwrap();
        assert_eq!(port, 9090);
    }

    #[test]
    fn test_as_raw_str() {
        assert_eq!("x".to_owned().as_raw_str(), Some("x"));
        assert_eq!(Some("y".to_owned()).as_raw_str(), Some("y"));
        assert_eq!(None::<String>.as_raw_str(), None);
        assert_eq!(5_u8.as_raw_str(), None);
    }

    #[test]
    fn test_redact_drops_values() {
        let err = CoerceError::MalformedMapEntry {
            pair: "user:hunter2:x".into(),
        }
        .redact();
        assert!(!err.to_string().contains("hunter2"));

        let err = CoerceError::OutOfRange {
            value: "999".into(),
            type_name: "u8",
        }
        .redact();
        assert!(err.to_string().contains("u8"));
        assert!(!err.to_string().contains("999"));
    }
}
