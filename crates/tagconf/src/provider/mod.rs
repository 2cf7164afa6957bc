//! Value sources consulted by the walkers.
//!
//! Two capabilities are consumed by the loaders:
//!
//! - [`EnvSource`] - the environment, looked up for fields without `secret`
//! - [`SecretSource`] - a secret manager, looked up for `secret` fields and
//!   for `!secret:<key>` markers in JSON documents
//!
//! # Built-in Sources
//!
//! - [`ProcessEnv`] - the process environment
//! - [`MapEnv`] - an in-memory environment for tests and embedding
//! - [`StaticSecrets`] - an in-memory secret store
//! - [`DotenvSecrets`] - secrets parsed from a dotenv file (with `dotenv` feature)
//!
//! `HashMap<String, String>` and `BTreeMap<String, String>` are secret
//! sources as well.
//!
//! # Custom Secret Sources
//!
//! ```rust,ignore
//! use tagconf::provider::SecretSource;
//!
//! struct VaultSecrets { /* client */ }
//!
//! impl SecretSource for VaultSecrets {
//!     fn get_by_name(&self, key: &str) -> Option<String> {
//!         self.client.read(&format!("secret/app/{key}")).ok()
//!     }
//! }
//! ```

#[cfg(feature = "dotenv")]
mod dotenv;
mod env;

#[cfg(feature = "dotenv")]
pub use self::dotenv::{DotenvSecrets, load_env_from_file, load_local_env_if_dev};
pub use env::{EnvSource, MapEnv, ProcessEnv};

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::sync::Arc;

/// A secret manager.
///
/// Lookups are synchronous; a missing key is `None`, never an error.
pub trait SecretSource: Send + Sync {
    /// Returns the secret stored under `key`.
    fn get_by_name(&self, key: &str) -> Option<String>;
}

impl<S: BuildHasher + Send + Sync> SecretSource for HashMap<String, String, S> {
    fn get_by_name(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl SecretSource for BTreeMap<String, String> {
    fn get_by_name(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl<T: SecretSource + ?Sized> SecretSource for Arc<T> {
    fn get_by_name(&self, key: &str) -> Option<String> {
        (**self).get_by_name(key)
    }
}

impl<T: SecretSource + ?Sized> SecretSource for Box<T> {
    fn get_by_name(&self, key: &str) -> Option<String> {
        (**self).get_by_name(key)
    }
}

/// An in-memory secret store.
///
/// # Example
///
/// ```rust
/// use tagconf::provider::{SecretSource, StaticSecrets};
///
/// let secrets = StaticSecrets::new()
///     .with("DATABASE_USER", "secret_user")
///     .with("DATABASE_PASSWORD", "secret_password");
///
/// assert_eq!(secrets.get_by_name("DATABASE_USER").as_deref(), Some("secret_user"));
/// assert_eq!(secrets.get_by_name("MISSING"), None);
/// ```
#[derive(Clone, Default)]
pub struct StaticSecrets {
    values: HashMap<String, String>,
}

impl StaticSecrets {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a secret, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds or replaces a secret.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Number of stored secrets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StaticSecrets {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl SecretSource for StaticSecrets {
    fn get_by_name(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

// Keys only; values are secrets.
impl std::fmt::Debug for StaticSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("StaticSecrets").field("keys", &keys).finish()
    }
}
