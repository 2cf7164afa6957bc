//! JSON documents with secret references.
//!
//! [`JsonConfigManager`] deserializes a document into the target, then
//! replaces every `"!secret:<key>"` string on a `secret` field with the
//! value stored under `<key>` in the secret source.
//!
//! ```rust
//! use serde::Deserialize;
//! use tagconf::{Configure, JsonConfigManager, provider::StaticSecrets};
//!
//! #[derive(Configure, Deserialize, Default)]
//! struct Db {
//!     #[config(secret)]
//!     db_user: String,
//!
//!     #[config(secret)]
//!     db_password: String,
//! }
//!
//! let mut db = Db::default();
//! JsonConfigManager::new()
//!     .prepare_to(&mut db)
//!     .prepare_from(r#"{"db_user": "!secret:DATABASE_USER", "db_password": "literal"}"#)
//!     .with_secrets(StaticSecrets::new().with("DATABASE_USER", "secret_user"))
//!     .run()?;
//!
//! assert_eq!(db.db_user, "secret_user");
//! assert_eq!(db.db_password, "literal");
//! # Ok::<(), tagconf::Error>(())
//! ```
//!
//! The document replaces the target wholesale: fields missing from the
//! document take their serde defaults, not their previous values.

mod secrets;

pub use secrets::{SECRET_MARKER, SecretFiller};

use std::any::Any;
use std::path::PathBuf;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::deps::Dependencies;
use crate::error::Error;
use crate::field::Configure;
use crate::provider::SecretSource;
use crate::report::LoadReport;

enum Input {
    Bytes(Vec<u8>),
    File(PathBuf),
}

/// Populates a target from a JSON document and a secret source.
pub struct JsonConfigManager<'a, T> {
    target: Option<&'a mut T>,
    input: Option<Input>,
    deps: Dependencies,
}

impl<'a, T> JsonConfigManager<'a, T>
where
    T: Configure + DeserializeOwned,
{
    /// A manager with no document and no secret source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            target: None,
            input: None,
            deps: Dependencies::new(),
        }
    }

    /// Sets the struct to populate.
    #[must_use]
    pub fn prepare_to(mut self, target: &'a mut T) -> Self {
        self.target = Some(target);
        self
    }

    /// Reads the document from memory.
    #[must_use]
    pub fn prepare_from(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.input = Some(Input::Bytes(data.into()));
        self
    }

    /// Reads the document from a file when [`run`](Self::run) is called.
    #[must_use]
    pub fn prepare_from_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.input = Some(Input::File(path.into()));
        self
    }

    /// Appends a dependency for the lifecycle hooks.
    #[must_use]
    pub fn with<D: Any + Send + Sync>(mut self, dep: D) -> Self {
        self.deps.push(dep);
        self
    }

    /// Appends every dependency of `deps`.
    #[must_use]
    pub fn with_dependencies(mut self, deps: &Dependencies) -> Self {
        self.deps.extend(deps);
        self
    }

    /// Registers a secret source as an `Arc<dyn SecretSource>` dependency.
    ///
    /// References resolve against the earliest registered source, the same
    /// one hooks get from [`Dependencies::secrets`].
    #[must_use]
    pub fn with_secrets(mut self, source: impl SecretSource + 'static) -> Self {
        let source: Arc<dyn SecretSource> = Arc::new(source);
        self.deps.push(source);
        self
    }

    /// Deserializes the document, substitutes secret references and runs
    /// the lifecycle hooks.
    ///
    /// # Errors
    ///
    /// [`Error::MissingTarget`], [`Error::Read`] for unreadable files,
    /// [`Error::Json`] for documents that do not match `T` (an absent
    /// document is an empty one), and any substitution or hook failure.
    pub fn run(self) -> Result<LoadReport, Error> {
        let target = self.target.ok_or(Error::MissingTarget)?;

        let data = match self.input {
            Some(Input::Bytes(data)) => data,
            Some(Input::File(path)) => match std::fs::read(&path) {
                Ok(data) => {
                    tracing::debug!(path = %path.display(), bytes = data.len(), "JSON document read");
                    data
                }
                Err(source) => return Err(Error::Read { path, source }),
            },
            None => Vec::new(),
        };

        *target = from_slice(&data)?;

        let secrets = self.deps.secrets().map(|source| &**source);
        SecretFiller::new(secrets, &self.deps).process(target)
    }
}

impl<T> Default for JsonConfigManager<'_, T>
where
    T: Configure + DeserializeOwned,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Deserializes `data`, reporting the JSON path of a mismatch.
fn from_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, Error> {
    let mut de = serde_json::Deserializer::from_slice(data);
    let value = serde_path_to_error::deserialize(&mut de).map_err(Error::json)?;

    // Trailing characters after the document.
    de.end().map_err(|source| Error::Json {
        path: ".".to_owned(),
        help: format!("remove the content after line {}, column {}", source.line(), source.column()),
        source,
    })?;

    Ok(value)
}
