//! Loading entry point for environment-backed configuration.

use std::any::Any;
use std::sync::Arc;

use crate::deps::Dependencies;
use crate::error::Error;
use crate::field::Configure;
use crate::pool::VariablePool;
use crate::provider::{EnvSource, ProcessEnv, SecretSource};
use crate::report::LoadReport;

/// Populates a target from the environment and a secret source.
///
/// # Example
///
/// ```rust
/// use tagconf::{ConfigManager, Configure, provider::{MapEnv, StaticSecrets}};
///
/// #[derive(Configure, Default)]
/// struct Db {
///     #[config(envconfig = "DATABASE_DRIVER", required)]
///     driver: String,
///
///     #[config(envconfig = "DATABASE_PORT", default = "54321")]
///     port: u16,
///
///     #[config(envconfig = "DATABASE_PASSWORD", secret)]
///     password: String,
/// }
///
/// let mut db = Db::default();
/// let report = ConfigManager::new()
///     .prepare_to(&mut db)
///     .with_env(MapEnv::new().with("DATABASE_DRIVER", "postgres"))
///     .with_secrets(StaticSecrets::new().with("DATABASE_PASSWORD", "s3cr3t"))
///     .run()?;
///
/// assert_eq!(db.driver, "postgres");
/// assert_eq!(db.port, 54321);
/// assert_eq!(db.password, "s3cr3t");
/// assert_eq!(report.len(), 3);
/// # Ok::<(), tagconf::Error>(())
/// ```
pub struct ConfigManager<'a> {
    target: Option<&'a mut dyn Configure>,
    deps: Dependencies,
    env: Box<dyn EnvSource + 'a>,
    clear_env: bool,
}

impl<'a> ConfigManager<'a> {
    /// A manager reading the process environment, with no secret source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            target: None,
            deps: Dependencies::new(),
            env: Box::new(ProcessEnv),
            clear_env: false,
        }
    }

    /// Sets the struct to populate.
    #[must_use]
    pub fn prepare_to(mut self, target: &'a mut dyn Configure) -> Self {
        self.target = Some(target);
        self
    }

    /// Appends a dependency for the lifecycle hooks.
    ///
    /// An `Arc<dyn SecretSource>` registered here takes part in secret
    /// source selection like one given to [`with_secrets`](Self::with_secrets).
    #[must_use]
    pub fn with<T: Any + Send + Sync>(mut self, dep: T) -> Self {
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
    /// The walker and the hooks use the same source: the earliest one
    /// registered. Later registrations stay reachable through
    /// [`Dependencies::get_all`] but never replace it.
    #[must_use]
    pub fn with_secrets(mut self, source: impl SecretSource + 'static) -> Self {
        let source: Arc<dyn SecretSource> = Arc::new(source);
        self.deps.push(source);
        self
    }

    /// Replaces the process environment with another source.
    #[must_use]
    pub fn with_env(mut self, env: impl EnvSource + 'a) -> Self {
        self.env = Box::new(env);
        self
    }

    /// Unsets the environment variables that supplied values once loading
    /// succeeds. Off by default.
    #[must_use]
    pub const fn clear_env_after(mut self, clear: bool) -> Self {
        self.clear_env = clear;
        self
    }

    /// Populates the target and runs its hooks.
    ///
    /// # Errors
    ///
    /// [`Error::MissingTarget`] without [`prepare_to`](Self::prepare_to);
    /// otherwise the first resolution, coercion or hook failure.
    pub fn run(self) -> Result<LoadReport, Error> {
        let target = self.target.ok_or(Error::MissingTarget)?;
        let secrets = self.deps.secrets().map(|source| &**source);

        let mut pool = VariablePool::new(target, &*self.env, secrets, &self.deps);
        pool.process()?;

        if self.clear_env {
            pool.clear_env();
        }

        Ok(pool.into_report())
    }
}

impl Default for ConfigManager<'_> {
    fn default() -> Self {
        Self::new()
    }
}
