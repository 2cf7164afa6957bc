//! Typed dependency registry handed to lifecycle hooks.
//!
//! Dependencies are registered by value and looked up by type:
//!
//! ```rust
//! use std::sync::Arc;
//! use tagconf::{BuildInfo, Dependencies};
//!
//! let deps = Dependencies::new()
//!     .with(BuildInfo::default())
//!     .with(String::from("billing-api"));
//!
//! assert_eq!(deps.get::<String>().map(|s| s.as_str()), Some("billing-api"));
//! assert!(deps.get::<BuildInfo>().is_some());
//! assert!(deps.get::<u32>().is_none());
//! ```
//!
//! Registration only appends. When a type is registered more than once,
//! [`Dependencies::get`] returns the earliest binding and
//! [`Dependencies::get_all`] returns every binding in order.

use std::any::{Any, type_name};
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use crate::provider::SecretSource;

#[derive(Clone)]
struct Entry {
    type_name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

/// An ordered collection of dependency objects.
#[derive(Clone, Default)]
pub struct Dependencies {
    entries: Vec<Entry>,
}

impl Dependencies {
    /// An empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a dependency.
    pub fn push<T: Any + Send + Sync>(&mut self, value: T) {
        self.push_shared(Arc::new(value));
    }

    /// Appends an already shared dependency.
    pub fn push_shared<T: Any + Send + Sync>(&mut self, value: Arc<T>) {
        self.entries.push(Entry {
            type_name: type_name::<T>(),
            value,
        });
    }

    /// Appends a dependency, builder style.
    #[must_use]
    pub fn with<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.push(value);
        self
    }

    /// Appends every dependency of `other`, keeping their order.
    pub fn extend(&mut self, other: &Self) {
        self.entries.extend(other.entries.iter().cloned());
    }

    /// The earliest dependency of type `T`.
    #[must_use]
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.get_all::<T>().next()
    }

    /// The earliest dependency of type `T`, shared.
    #[must_use]
    pub fn get_shared<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.entries
            .iter()
            .find_map(|entry| Arc::clone(&entry.value).downcast::<T>().ok())
    }

    /// Every dependency of type `T`, in registration order.
    pub fn get_all<T: Any + Send + Sync>(&self) -> impl Iterator<Item = &T> {
        self.entries
            .iter()
            .filter_map(|entry| entry.value.downcast_ref::<T>())
    }

    /// The earliest registered secret source.
    ///
    /// Secret sources are registered as `Arc<dyn SecretSource>`.
    #[must_use]
    pub fn secrets(&self) -> Option<&Arc<dyn SecretSource>> {
        self.get::<Arc<dyn SecretSource>>()
    }

    /// Number of dependencies.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no dependency was registered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Debug for Dependencies {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|entry| entry.type_name))
            .finish()
    }
}
