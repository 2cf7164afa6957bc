//! Environment sources.

use std::collections::HashMap;
use std::env::VarError;

use parking_lot::RwLock;

use crate::error::Error;

/// Read and unset access to an environment.
pub trait EnvSource {
    /// Looks up `key`. A missing variable is `Ok(None)`.
    fn lookup(&self, key: &str) -> Result<Option<String>, Error>;

    /// Removes `key`. Missing keys are ignored.
    fn unset(&self, key: &str);
}

/// The process environment.
///
/// # Example
///
/// ```rust
/// use tagconf::provider::{EnvSource, ProcessEnv};
///
/// let env = ProcessEnv;
/// assert!(env.lookup("TAGCONF_DOC_SURELY_UNSET").unwrap().is_none());
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn lookup(&self, key: &str) -> Result<Option<String>, Error> {
        match std::env::var(key) {
            Ok(value) => Ok(Some(value)),

            Err(VarError::NotPresent) => Ok(None),

            Err(VarError::NotUnicode(_)) => Err(Error::InvalidUtf8 {
                var: key.to_owned(),
            }),
        }
    }

    fn unset(&self, key: &str) {
        // SAFETY: loading is single-threaded; callers opt into clearing and
        // must not read the environment from other threads meanwhile.
        unsafe { std::env::remove_var(key) };
    }
}

/// An in-memory environment.
///
/// Useful in tests, where mutating the process environment requires
/// serialising every test that touches it.
///
/// # Example
///
/// ```rust
/// use tagconf::provider::{EnvSource, MapEnv};
///
/// let env = MapEnv::new().with("APP_ENV", "production");
/// assert_eq!(env.lookup("APP_ENV").unwrap().as_deref(), Some("production"));
///
/// env.unset("APP_ENV");
/// assert!(!env.contains("APP_ENV"));
/// ```
#[derive(Debug, Default)]
pub struct MapEnv {
    vars: RwLock<HashMap<String, String>>,
}

impl MapEnv {
    /// An empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a variable, builder style.
    #[must_use]
    pub fn with(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets a variable.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.write().insert(key.into(), value.into());
    }

    /// Returns a copy of a variable.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.vars.read().get(key).cloned()
    }

    /// Whether a variable is set.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.vars.read().contains_key(key)
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.read().len()
    }

    /// Whether no variable is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.read().is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let vars = iter
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();

        Self {
            vars: RwLock::new(vars),
        }
    }
}

impl EnvSource for MapEnv {
    fn lookup(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.get(key))
    }

    fn unset(&self, key: &str) {
        self.vars.write().remove(key);
    }
}

impl<T: EnvSource + ?Sized> EnvSource for &T {
    fn lookup(&self, key: &str) -> Result<Option<String>, Error> {
        (**self).lookup(key)
    }

    fn unset(&self, key: &str) {
        (**self).unset(key);
    }
}

impl<T: EnvSource + ?Sized> EnvSource for std::sync::Arc<T> {
    fn lookup(&self, key: &str) -> Result<Option<String>, Error> {
        (**self).lookup(key)
    }

    fn unset(&self, key: &str) {
        (**self).unset(key);
    }
}
