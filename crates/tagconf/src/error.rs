//! Error types for configuration loading.
//!
//! This module contains the [`Error`] enum returned by every loading entry
//! point, together with [`MaybeRedacted`], the wrapper that keeps secret
//! values out of error messages.
//!
//! # Error Variants
//!
//! | Variant | When It Occurs |
//! |---------|----------------|
//! | [`Error::MissingTarget`] | A manager was run without a target |
//! | [`Error::Required`] | A `required` field had no resolvable value |
//! | [`Error::Coerce`] | A raw value could not be converted into the field type |
//! | [`Error::InvalidUtf8`] | An environment variable holds non-UTF-8 bytes |
//! | [`Error::MalformedSecretRef`] | A `!secret:` marker has more than one `:` |
//! | [`Error::Lifecycle`] | An `init_with`/`prepare_with`/`prepare` hook failed |
//! | [`Error::Read`] | A source file could not be read |
//! | [`Error::Json`] | A JSON document did not match the target (with `json` feature) |
//! | [`Error::Dotenv`] | A `.env` file could not be loaded (with `dotenv` feature) |
//! | [`Error::BuildInfo`] | Build metadata strings were not numeric |
//!
//! # Fail-fast
//!
//! Loading stops at the first failure. Fields visited before the failure keep
//! the values already written to them; nothing is rolled back.
//!
//! # Secret Masking
//!
//! Values of fields tagged `secret` are never stored in an error:
//!
//! ```text
//! failed to coerce API_TOKEN (api_token): expected u64, got <redacted>
//! ```

use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error as ThisError;

use crate::coerce::CoerceError;

/// Boxed error returned by lifecycle hooks.
///
/// Hooks may use `?` on any error type that is `Send + Sync`.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// A raw value that is only shown when it is not secret.
///
/// Secret values are dropped at construction time, so they never live in
/// an error, a report, or a log line.
#[derive(Clone, PartialEq, Eq)]
pub enum MaybeRedacted {
    /// A non-secret value, kept verbatim.
    Plain(String),

    /// A secret value; only the fact that it existed is kept.
    Redacted,
}

impl MaybeRedacted {
    /// Wraps `value`, discarding it when `secret` is set.
    pub fn new(value: impl Into<String>, secret: bool) -> Self {
        if secret {
            Self::Redacted
        } else {
            Self::Plain(value.into())
        }
    }

    /// Returns the plain value, or `None` when redacted.
    #[must_use]
    pub fn as_plain(&self) -> Option<&str> {
        match self {
            Self::Plain(value) => Some(value),
            Self::Redacted => None,
        }
    }

    /// Whether the value was redacted.
    #[must_use]
    pub const fn is_redacted(&self) -> bool {
        matches!(self, Self::Redacted)
    }
}

impl Display for MaybeRedacted {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(value) => write!(f, "{value:?}"),
            Self::Redacted => f.write_str("<redacted>"),
        }
    }
}

impl Debug for MaybeRedacted {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

/// The lifecycle hook that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// `InitWith::init_with`, run before the fields are visited.
    InitWith,

    /// `PrepareWith::prepare_with`, run after the fields when dependencies exist.
    PrepareWith,

    /// `Prepare::prepare`, always the last hook.
    Prepare,
}

impl Display for Phase {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InitWith => f.write_str("init_with"),
            Self::PrepareWith => f.write_str("prepare_with"),
            Self::Prepare => f.write_str("prepare"),
        }
    }
}

/// Errors that can occur while populating a configuration target.
///
/// Every variant carries a `tagconf::*` diagnostic code so callers can match
/// on [`Diagnostic::code`] instead of on message text, and so that
/// `miette::Report` renders help text alongside the message.
///
/// # Example
///
/// ```rust,ignore
/// match ConfigManager::new().prepare_to(&mut config).run() {
///     Ok(report) => tracing::info!(fields = report.len(), "configuration loaded"),
///     Err(Error::Required { field, .. }) => eprintln!("{field} must be set"),
///     Err(e) => eprintln!("{:?}", miette::Report::from(e)),
/// }
/// ```
#[derive(Debug, ThisError, Diagnostic)]
pub enum Error {
    /// The manager was run before a target was attached.
    #[error("configuration target must be set before loading")]
    #[diagnostic(
        code(tagconf::missing_target),
        help("call prepare_to(&mut config) before run()")
    )]
    MissingTarget,

    /// A field tagged `required` had no value in its source.
    #[error("variable is empty and has required tag: {field}")]
    #[diagnostic(code(tagconf::required), severity(Error))]
    Required {
        /// The declared field name.
        field: String,

        /// The lookup key, when the field declares one.
        key: Option<String>,

        /// Dynamic help message naming the key to set.
        #[help]
        help: String,
    },

    /// A raw value could not be converted into the field's type.
    #[error("failed to coerce {key} ({field}): expected {expected_type}, got {value}")]
    #[diagnostic(code(tagconf::coerce))]
    Coerce {
        /// The declared field name.
        field: String,

        /// The lookup key the value came from.
        key: String,

        /// The offending raw value, redacted for secret fields.
        value: MaybeRedacted,

        /// The destination type name.
        expected_type: String,

        /// Dynamic help text generated from `expected_type`.
        #[help]
        help: String,

        /// The underlying coercion failure.
        #[source]
        source: CoerceError,
    },

    /// An environment variable contains invalid UTF-8.
    #[error("environment variable {var} contains invalid UTF-8")]
    #[diagnostic(
        code(tagconf::invalid_utf8),
        help("ensure the variable contains valid UTF-8 text")
    )]
    InvalidUtf8 {
        /// The variable name.
        var: String,
    },

    /// A `!secret:` marker did not have exactly one `:` separator.
    #[error("wrong secret string format in field {field}: {value:?}")]
    #[diagnostic(
        code(tagconf::malformed_secret_ref),
        help("secret references look like \"!secret:KEY\", without further ':'")
    )]
    MalformedSecretRef {
        /// The declared field name.
        field: String,

        /// The offending marker.
        value: String,
    },

    /// A lifecycle hook returned an error.
    #[error("{phase} failed for {target}")]
    #[diagnostic(code(tagconf::lifecycle))]
    Lifecycle {
        /// The type whose hook failed.
        target: &'static str,

        /// Which hook failed.
        phase: Phase,

        /// The hook's error.
        #[source]
        source: BoxError,
    },

    /// A source file could not be read.
    #[error("failed to read {}", .path.display())]
    #[diagnostic(
        code(tagconf::read),
        help("check that the file exists and is readable")
    )]
    Read {
        /// The file path.
        path: PathBuf,

        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be deserialized into the target.
    #[cfg(feature = "json")]
    #[error("invalid JSON configuration at `{path}`")]
    #[diagnostic(code(tagconf::json))]
    Json {
        /// The JSON path where deserialization failed (`.` for the root).
        path: String,

        /// Help text derived from the parser message.
        #[help]
        help: String,

        /// The underlying parser error.
        #[source]
        source: serde_json::Error,
    },

    /// A `.env` file could not be loaded.
    #[cfg(feature = "dotenv")]
    #[error("failed to load dotenv file {}", .path.display())]
    #[diagnostic(
        code(tagconf::dotenv),
        help("check the file path and KEY=VALUE syntax")
    )]
    Dotenv {
        /// The file path.
        path: PathBuf,

        /// The underlying dotenvy error.
        #[source]
        source: dotenvy::Error,
    },

    /// A build metadata string was not usable.
    #[error("invalid build metadata {field}: {value:?} ({reason})")]
    #[diagnostic(
        code(tagconf::build_info),
        help("build numbers and timestamps are unsigned decimal integers")
    )]
    BuildInfo {
        /// Which metadata value failed.
        field: &'static str,

        /// The raw value.
        value: String,

        /// What was wrong with it.
        reason: String,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Constructor helpers
// ─────────────────────────────────────────────────────────────────────────────

impl Error {
    /// Creates a `Required` error with a help message naming the key.
    pub fn required(field: impl Into<String>, key: Option<&str>) -> Self {
        let field = field.into();
        let help = match key {
            Some(key) => format!("set {key} in the environment or the secret source"),
            None => format!("field {field} declares no lookup key; add envconfig or a default"),
        };

        Self::Required {
            field,
            key: key.map(str::to_owned),
            help,
        }
    }

    /// Creates a `Coerce` error, redacting `value` when `secret` is set.
    pub fn coerce(
        field: impl Into<String>,
        key: impl Into<String>,
        value: &str,
        secret: bool,
        expected_type: impl Into<String>,
        source: CoerceError,
    ) -> Self {
        let expected_type = expected_type.into();
        let help = format!("expected a valid {expected_type}");
        let source = if secret { source.redact() } else { source };

        Self::Coerce {
            field: field.into(),
            key: key.into(),
            value: MaybeRedacted::new(value, secret),
            expected_type,
            help,
            source,
        }
    }

    /// Creates a `Lifecycle` error.
    pub fn lifecycle(target: &'static str, phase: Phase, source: BoxError) -> Self {
        Self::Lifecycle {
            target,
            phase,
            source,
        }
    }

    /// Creates a `Json` error from a path-tracking deserializer failure.
    #[cfg(feature = "json")]
    pub fn json(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let path = err.path().to_string();
        let source = err.into_inner();
        let help = format!("fix the value at line {}, column {}", source.line(), source.column());

        Self::Json { path, help, source }
    }
}
