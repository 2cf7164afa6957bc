//! # tagconf_macro
//!
//! Procedural macro implementation for the `tagconf` crate.
//!
//! This crate provides `#[derive(Configure)]`, which turns `#[config(...)]`
//! field attributes into a static descriptor table and the visitor glue the
//! `tagconf` loaders walk. It is a proc-macro crate and can only export
//! procedural macros.
//!
//! **Note:** Users should depend on the `tagconf` crate, not this one
//! directly. `tagconf` re-exports the derive next to the runtime types.
//!
//! # Module Structure
//!
//! - `parse` - Attribute parsing for `#[config(...)]` and `#[configure(...)]`
//! - `field` - Per-field code generation strategies
//! - `expand` - Macro expansion orchestration
//!
//! # Generated Code
//!
//! | Item | Description |
//! |------|-------------|
//! | `impl Configure` | `fields()`, `visit_fields()`, `lifecycle()`, `initializer()` |
//! | `impl Debug` | Field dump with `secret` fields shown as `[REDACTED]` |

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod expand;
mod field;
mod parse;

/// Derive macro for structs populated by the `tagconf` loaders.
///
/// # Field Attributes
///
/// Fields take at most one `#[config(...)]` attribute. Fields without one
/// are not part of the descriptor table and are never written.
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `envconfig = "KEY"` (or `env`) | Lookup key |
/// | `secret_name = "KEY"` | Secret lookup key, falls back to `envconfig` |
/// | `default = "value"` | Fallback when the environment has no value |
/// | `secret` | Read from the secret source, masked in `Debug` |
/// | `required` | Missing value is an error |
/// | `ignored` | Never visited |
/// | `nested` | Nested `Configure` struct |
///
/// `secret`, `required` and `ignored` also accept a value: `secret = true`,
/// `required = "false"`, `ignored = "1"`.
///
/// `nested` fields may be `T`, `Box<T>`, `Option<T>`, `Option<Box<T>>`,
/// `Vec<T>` or `Vec<Box<T>>` where `T: Configure`. Absent optional structs
/// are allocated with `Default` before their fields are read.
///
/// # Struct Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `prepare` | Runs `Prepare::prepare` after the fields are read |
/// | `prepare_with` | Runs `PrepareWith::prepare_with`, then `prepare` |
/// | `init_with` | Runs `InitWith::init_with` before the fields are read |
///
/// # Example
///
/// ```ignore
/// use tagconf::{BoxError, Configure, Prepare};
///
/// #[derive(Configure, Default)]
/// #[configure(prepare)]
/// struct DbConfig {
///     #[config(envconfig = "DATABASE_DRIVER", required)]
///     driver: String,
///
///     #[config(envconfig = "DATABASE_PORT", default = "54321")]
///     port: u16,
///
///     #[config(envconfig = "DATABASE_PASSWORD", secret)]
///     password: String,
///
///     dsn: String,
/// }
///
/// impl Prepare for DbConfig {
///     fn prepare(&mut self) -> Result<(), BoxError> {
///         self.dsn = format!("{}://:{}@db:{}", self.driver, self.password, self.port);
///         Ok(())
///     }
/// }
/// ```
#[proc_macro_derive(Configure, attributes(config, configure))]
pub fn derive_configure(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand::Expander::expand(&input).unwrap_or_else(|err| err.to_compile_error().into())
}
