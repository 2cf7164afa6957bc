//! # tagconf
//!
//! Attribute-driven configuration loading from environment variables, secret
//! managers and JSON documents.
//!
//! A configuration struct declares, per field, where its value comes from.
//! `#[derive(Configure)]` turns those declarations into a static field table,
//! and a loader walks the table: it looks each value up, converts the raw
//! string into the field's type, recurses into nested structs, and finally
//! runs the struct's preparation hooks.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tagconf::{BoxError, ConfigManager, Configure, Prepare};
//!
//! #[derive(Configure, Default)]
//! #[configure(prepare)]
//! struct DbConfig {
//!     #[config(envconfig = "DATABASE_DRIVER", required)]
//!     driver: String,
//!
//!     #[config(envconfig = "DATABASE_HOST", default = "localhost")]
//!     host: String,
//!
//!     #[config(envconfig = "DATABASE_PORT", default = "54321")]
//!     port: u16,
//!
//!     #[config(envconfig = "DATABASE_USER", secret)]
//!     user: String,
//!
//!     #[config(envconfig = "DATABASE_PASSWORD", secret)]
//!     password: String,
//!
//!     dsn: String,
//! }
//!
//! impl Prepare for DbConfig {
//!     fn prepare(&mut self) -> Result<(), BoxError> {
//!         self.dsn = format!(
//!             "postgresql://{}:{}@{}:{}",
//!             self.user, self.password, self.host, self.port
//!         );
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> tagconf::Result<()> {
//!     let mut config = DbConfig::default();
//!     ConfigManager::new()
//!         .prepare_to(&mut config)
//!         .with_secrets(vault_client())
//!         .run()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Resolution Order
//!
//! | Field | Lookup |
//! |-------|--------|
//! | `secret` | secret source under `secret_name`, else `envconfig`; never the environment |
//! | otherwise | environment under `envconfig`, then `default` |
//!
//! A `required` field with no value fails the load. Any other field with no
//! value keeps the value it already had.
//!
//! ## Field Attributes
//!
//! | Attribute | Description |
//! |-----------|-------------|
//! | `envconfig = "KEY"` (or `env`) | Lookup key |
//! | `secret_name = "KEY"` | Secret lookup key |
//! | `default = "value"` | Used when the environment has no value |
//! | `secret` | Read from the secret source; masked in `Debug` and errors |
//! | `required` | Missing value is an error |
//! | `ignored` | Never visited |
//! | `nested` | Nested `Configure` struct (`T`, `Box<T>`, `Option<T>`, `Vec<T>`) |
//!
//! Boolean options also take a value: `secret = true`, `required = "false"`.
//! Fields without `#[config]` are not touched.
//!
//! ## Struct Attributes
//!
//! `#[configure(prepare)]`, `#[configure(prepare_with)]` and
//! `#[configure(init_with)]` declare the hooks of [`lifecycle`].
//!
//! ## Loaders
//!
//! - [`ConfigManager`] - environment and secret source
//! - [`JsonConfigManager`] - JSON document with `!secret:<key>` references
//!   (with `json` feature)
//! - [`VariablePool`] - the walker behind [`ConfigManager`], for callers that
//!   manage sources themselves
//!
//! ## Feature Flags
//!
//! | Feature | Description | Default |
//! |---------|-------------|---------|
//! | `dotenv` | `.env` loading and [`provider::DotenvSecrets`] | **Yes** |
//! | `json` | [`JsonConfigManager`] | **Yes** |
//! | `secrecy` | `SecretString` fields | No |
//! | `full` | Enable all features | No |
//!
//! ## Error Handling
//!
//! Loading stops at the first failure, reported as an [`Error`] carrying a
//! `tagconf::*` diagnostic code:
//!
//! ```text
//! tagconf::required
//!
//!   × variable is empty and has required tag: db.driver
//!   help: set DATABASE_DRIVER in the environment or the secret source
//! ```

#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

// Lets the derive's `::tagconf::` paths resolve inside this crate.
extern crate self as tagconf;

pub use tagconf_macro::Configure;

/// Re-export miette for error handling.
pub use miette;

/// Re-export serde when the `json` feature is enabled.
#[cfg(feature = "json")]
pub use serde;

/// Re-export secrecy when the feature is enabled.
#[cfg(feature = "secrecy")]
pub use secrecy;

#[cfg(feature = "secrecy")]
pub use secrecy::{ExposeSecret, SecretString};

// ============================================================================
// Core Modules
// ============================================================================

mod error;
pub use error::{BoxError, Error, MaybeRedacted, Phase};

/// A Result type that displays errors with miette's fancy formatting.
///
/// ```rust,ignore
/// fn main() -> tagconf::Result<()> {
///     ConfigManager::new().prepare_to(&mut config).run()?;
///     Ok(())
/// }
/// ```
pub type Result<T> = miette::Result<T>;

pub mod coerce;
pub use coerce::{Coerce, CoerceError, set_field};

mod field;
pub use field::{
    Configure, FieldDescriptor, FieldSlot, FieldTags, FieldVisitor, NestedSlot,
};

mod report;
pub use report::{LoadReport, Origin, ResolvedField};

mod deps;
pub use deps::Dependencies;

pub mod lifecycle;
pub use lifecycle::{ConfigTarget, InitWith, Lifecycle, Prepare, PrepareWith};

pub mod provider;

// ============================================================================
// Loaders
// ============================================================================

mod pool;
pub use pool::VariablePool;

mod manager;
pub use manager::ConfigManager;

#[cfg(feature = "json")]
pub mod json;
#[cfg(feature = "json")]
pub use json::{JsonConfigManager, SecretFiller};

// ============================================================================
// Application Settings
// ============================================================================

pub mod base;
pub use base::BaseConfig;

mod build_info;
pub use build_info::BuildInfo;
