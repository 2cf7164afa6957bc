//! Preparation hooks run around field population.
//!
//! A [`Configure`] type opts into hooks through `#[configure(...)]`:
//!
//! | Attribute | Trait | When |
//! |-----------|-------|------|
//! | `init_with` | [`InitWith`] | before its fields are visited |
//! | `prepare` | [`Prepare`] | after its fields are populated |
//! | `prepare_with` | [`PrepareWith`] | after its fields, before `prepare`, when dependencies were given |
//!
//! Nested structs are prepared before their parents.
//!
//! ```rust
//! use tagconf::{BoxError, Configure, Prepare};
//!
//! #[derive(Configure, Default)]
//! #[configure(prepare)]
//! struct Db {
//!     #[config(envconfig = "DB_HOST", default = "localhost")]
//!     host: String,
//!
//!     #[config(envconfig = "DB_NAME", default = "app")]
//!     name: String,
//!
//!     dsn: String,
//! }
//!
//! impl Prepare for Db {
//!     fn prepare(&mut self) -> Result<(), BoxError> {
//!         self.dsn = format!("postgresql://{}/{}", self.host, self.name);
//!         Ok(())
//!     }
//! }
//! ```

use crate::deps::Dependencies;
use crate::error::{BoxError, Error, Phase};
use crate::field::Configure;

/// Computes derived state once the fields are populated.
pub trait Prepare {
    /// Runs after every field of the struct, nested ones included, is set.
    fn prepare(&mut self) -> Result<(), BoxError>;
}

/// Receives dependencies before [`Prepare::prepare`] runs.
pub trait PrepareWith: Prepare {
    /// Runs with the dependencies given to the loader.
    fn prepare_with(&mut self, deps: &Dependencies) -> Result<(), BoxError>;
}

/// Customises a struct before its fields are visited.
pub trait InitWith {
    /// Runs with the dependencies given to the loader.
    fn init_with(&mut self, deps: &Dependencies) -> Result<(), BoxError>;
}

/// The post-population hooks of a struct.
pub enum Lifecycle<'a> {
    /// No hooks.
    Plain,

    /// Only [`Prepare`].
    Single(&'a mut dyn Prepare),

    /// [`PrepareWith`] and [`Prepare`].
    TwoPhase(&'a mut dyn PrepareWith),
}

impl Lifecycle<'_> {
    /// Runs the hooks.
    ///
    /// A two-phase struct gets `prepare_with` then `prepare` when `deps` is
    /// not empty, and `prepare` alone otherwise.
    pub fn run(self, deps: &Dependencies, target: &'static str) -> Result<(), Error> {
        match self {
            Self::Plain => Ok(()),

            Self::Single(node) => {
                tracing::trace!(target_type = target, "prepare");
                node.prepare()
                    .map_err(|e| Error::lifecycle(target, Phase::Prepare, e))
            }

            Self::TwoPhase(node) => {
                if !deps.is_empty() {
                    tracing::trace!(target_type = target, deps = deps.len(), "prepare_with");
                    node.prepare_with(deps)
                        .map_err(|e| Error::lifecycle(target, Phase::PrepareWith, e))?;
                }

                tracing::trace!(target_type = target, "prepare");
                node.prepare()
                    .map_err(|e| Error::lifecycle(target, Phase::Prepare, e))
            }
        }
    }
}

/// Runs the init hook of `node`, if any.
pub(crate) fn run_init(node: &mut dyn Configure, deps: &Dependencies) -> Result<(), Error> {
    let target = node.type_name();
    match node.initializer() {
        Some(init) => {
            tracing::trace!(target_type = target, "init_with");
            init.init_with(deps)
                .map_err(|e| Error::lifecycle(target, Phase::InitWith, e))
        }
        None => Ok(()),
    }
}

/// A target paired with the dependencies its hooks receive.
///
/// Dependencies accumulate: every [`with`](Self::with) call appends.
///
/// ```rust,ignore
/// let mut target = ConfigTarget::new(&mut config)
///     .with(BuildInfo::default())
///     .with(Arc::new(secrets) as Arc<dyn SecretSource>);
///
/// target.prepare()?;
/// ```
pub struct ConfigTarget<'a> {
    target: &'a mut dyn Configure,
    deps: Dependencies,
}

impl<'a> ConfigTarget<'a> {
    /// Wraps `target` with no dependencies.
    pub fn new(target: &'a mut dyn Configure) -> Self {
        Self {
            target,
            deps: Dependencies::new(),
        }
    }

    /// Appends a dependency.
    #[must_use]
    pub fn with<T: std::any::Any + Send + Sync>(mut self, dep: T) -> Self {
        self.deps.push(dep);
        self
    }

    /// Appends every dependency of `deps`.
    #[must_use]
    pub fn with_dependencies(mut self, deps: &Dependencies) -> Self {
        self.deps.extend(deps);
        self
    }

    /// The accumulated dependencies.
    #[must_use]
    pub const fn dependencies(&self) -> &Dependencies {
        &self.deps
    }

    /// The wrapped target.
    pub fn target(&mut self) -> &mut dyn Configure {
        self.target
    }

    /// Runs the target's hooks with the accumulated dependencies.
    pub fn prepare(&mut self) -> Result<(), Error> {
        let name = self.target.type_name();
        self.target.lifecycle().run(&self.deps, name)
    }

    /// Forwards `deps` to the target's `prepare_with`, then runs `prepare`.
    ///
    /// Unlike [`prepare`](Self::prepare), `prepare_with` runs even when
    /// `deps` is empty. A single-phase target only gets `prepare`; a target
    /// without hooks is left alone.
    pub fn prepare_with(&mut self, deps: &Dependencies) -> Result<(), Error> {
        let name = self.target.type_name();
        match self.target.lifecycle() {
            Lifecycle::Plain => Ok(()),

            Lifecycle::Single(node) => node
                .prepare()
                .map_err(|e| Error::lifecycle(name, Phase::Prepare, e)),

            Lifecycle::TwoPhase(node) => {
                node.prepare_with(deps)
                    .map_err(|e| Error::lifecycle(name, Phase::PrepareWith, e))?;
                node.prepare()
                    .map_err(|e| Error::lifecycle(name, Phase::Prepare, e))
            }
        }
    }
}
