//! Settings shared by every application.
//!
//! [`BaseConfig`] reads the deployment environment, the stage name and the
//! debug switch, and captures the process identity when prepared. Embed it
//! as a nested field:
//!
//! ```rust
//! use tagconf::{BaseConfig, BuildInfo, ConfigManager, Configure, provider::MapEnv};
//!
//! #[derive(Configure, Default)]
//! struct AppConfig {
//!     #[config(nested)]
//!     base: BaseConfig,
//!
//!     #[config(envconfig = "HTTP_PORT", default = "8080")]
//!     port: u16,
//! }
//!
//! let mut config = AppConfig::default();
//! ConfigManager::new()
//!     .prepare_to(&mut config)
//!     .with_env(MapEnv::new().with("APP_ENV", "production"))
//!     .with(BuildInfo::default())
//!     .run()?;
//!
//! assert!(config.base.is_prod());
//! assert_eq!(config.base.stage_name(), "dev");
//! assert_eq!(config.base.application_pid(), std::process::id());
//! # Ok::<(), tagconf::Error>(())
//! ```

use std::io;
use std::path::Path;

use crate::build_info::BuildInfo;
use crate::deps::Dependencies;
use crate::error::BoxError;
use crate::lifecycle::{Prepare, PrepareWith};
use crate::Configure;

/// Variable holding the environment name.
pub const APP_ENV_VAR: &str = "APP_ENV";
/// Variable holding the stage name.
pub const APP_STAGE_VAR: &str = "APP_STAGE";
/// Variable holding the path of the local dotenv file.
pub const APP_LOCAL_ENV_FILE_PATH_VAR: &str = "APP_LOCAL_ENV_FILE_PATH";
/// Variable holding the debug switch.
pub const APP_DEBUG_VAR: &str = "APP_DEBUG";

/// Environment name of a developer machine.
pub const ENV_LOCAL: &str = "local";
/// Environment name of a shared development deployment.
pub const ENV_DEVELOPMENT: &str = "development";
/// Environment name of a staging deployment.
pub const ENV_STAGING: &str = "staging";
/// Environment name of a testing deployment.
pub const ENV_TESTING: &str = "testing";
/// Environment name of a production deployment.
pub const ENV_PRODUCTION: &str = "production";

/// Environment, stage and process identity of an application.
#[derive(Configure, Clone, Default)]
#[configure(prepare_with)]
pub struct BaseConfig {
    /// One of `local`, `development`, `staging`, `testing`, `production`.
    #[config(envconfig = "APP_ENV", default = "development")]
    pub environment: String,

    /// Free-form stage name, e.g. for log labels.
    #[config(envconfig = "APP_STAGE", default = "dev")]
    pub stage_name: String,

    /// Dotenv file loaded in development environments.
    #[config(envconfig = "APP_LOCAL_ENV_FILE_PATH", default = "./env")]
    pub local_env_file_path: String,

    /// Debug switch.
    #[config(envconfig = "APP_DEBUG", default = "false")]
    pub debug: bool,

    hostname: String,
    application_name: String,
    application_pid: u32,
    build: BuildInfo,
}

impl BaseConfig {
    /// A config for the application called `application_name`.
    pub fn new(application_name: impl Into<String>) -> Self {
        Self {
            application_name: application_name.into(),
            ..Self::default()
        }
    }

    /// The environment name.
    #[must_use]
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// The stage name.
    #[must_use]
    pub fn stage_name(&self) -> &str {
        &self.stage_name
    }

    /// The local dotenv file path.
    #[must_use]
    pub fn local_env_file_path(&self) -> &Path {
        Path::new(&self.local_env_file_path)
    }

    /// The host name, set by `prepare`.
    #[must_use]
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// The application name.
    #[must_use]
    pub fn application_name(&self) -> &str {
        &self.application_name
    }

    /// Renames the application.
    pub fn set_application_name(&mut self, name: impl Into<String>) {
        self.application_name = name.into();
    }

    /// The process id, set by `prepare`.
    #[must_use]
    pub const fn application_pid(&self) -> u32 {
        self.application_pid
    }

    /// `production`.
    #[must_use]
    pub fn is_prod(&self) -> bool {
        self.environment == ENV_PRODUCTION
    }

    /// `staging`.
    #[must_use]
    pub fn is_stage(&self) -> bool {
        self.environment == ENV_STAGING
    }

    /// `staging` or `testing`.
    #[must_use]
    pub fn is_test(&self) -> bool {
        self.environment == ENV_STAGING || self.environment == ENV_TESTING
    }

    /// `local` or `development`.
    #[must_use]
    pub fn is_dev(&self) -> bool {
        self.environment == ENV_LOCAL || self.environment == ENV_DEVELOPMENT
    }

    /// `local`.
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.environment == ENV_LOCAL
    }

    /// The debug switch.
    #[must_use]
    pub const fn is_debug(&self) -> bool {
        self.debug
    }

    /// Build metadata: the [`BuildInfo`] dependency, or development
    /// placeholders when none was given.
    #[must_use]
    pub const fn build_info(&self) -> &BuildInfo {
        &self.build
    }

    /// The release tag.
    #[must_use]
    pub fn release_tag(&self) -> &str {
        self.build.release_tag()
    }

    /// The full commit id.
    #[must_use]
    pub fn commit_id(&self) -> &str {
        self.build.commit_id()
    }

    /// The abbreviated commit id.
    #[must_use]
    pub fn short_commit_id(&self) -> &str {
        self.build.short_commit_id()
    }

    /// The CI build number.
    #[must_use]
    pub const fn build_number(&self) -> u64 {
        self.build.build_number()
    }

    /// The build time in Unix seconds.
    #[must_use]
    pub fn build_date_ts(&self) -> i64 {
        self.build.build_date_ts()
    }

    /// The build time.
    #[must_use]
    pub const fn build_date(&self) -> chrono::DateTime<chrono::Utc> {
        self.build.build_date()
    }
}

impl Prepare for BaseConfig {
    fn prepare(&mut self) -> Result<(), BoxError> {
        self.hostname = hostname()?;
        self.application_pid = std::process::id();

        Ok(())
    }
}

impl PrepareWith for BaseConfig {
    fn prepare_with(&mut self, deps: &Dependencies) -> Result<(), BoxError> {
        if let Some(build) = deps.get::<BuildInfo>() {
            self.build = build.clone();
        }

        Ok(())
    }
}

/// The kernel host name.
fn hostname() -> io::Result<String> {
    for path in ["/proc/sys/kernel/hostname", "/etc/hostname"] {
        if let Ok(name) = std::fs::read_to_string(path) {
            let name = name.trim();
            if !name.is_empty() {
                return Ok(name.to_owned());
            }
        }
    }

    for var in ["HOSTNAME", "COMPUTERNAME"] {
        if let Ok(name) = std::env::var(var)
            && !name.is_empty()
        {
            return Ok(name);
        }
    }

    Err(io::Error::new(io::ErrorKind::NotFound, "host name is not available"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_env(environment: &str) -> BaseConfig {
        BaseConfig {
            environment: environment.to_owned(),
            ..BaseConfig::default()
        }
    }

    #[test]
    fn test_environment_predicates() {
        assert!(with_env("production").is_prod());
        assert!(with_env("staging").is_stage());
        assert!(with_env("staging").is_test());
        assert!(with_env("testing").is_test());
        assert!(!with_env("testing").is_stage());
        assert!(with_env("local").is_dev());
        assert!(with_env("local").is_local());
        assert!(with_env("development").is_dev());
        assert!(!with_env("development").is_local());
        assert!(!with_env("production").is_dev());
    }

    #[test]
    fn test_application_name() {
        let mut base = BaseConfig::new("billing-api");
        assert_eq!(base.application_name(), "billing-api");
        base.set_application_name("ledger");
        assert_eq!(base.application_name(), "ledger");
    }

    #[test]
    fn test_prepare_with_picks_build_info() {
        let build = BuildInfo::parse("v9", "c0ffee", "c0f", "7", "0").unwrap();
        let deps = Dependencies::new().with(1_u8).with(build);

        let mut base = BaseConfig::default();
        base.prepare_with(&deps).unwrap();
        assert_eq!(base.release_tag(), "v9");
        assert_eq!(base.build_number(), 7);
        assert_eq!(base.build_date_ts(), 0);
    }

    #[test]
    fn test_prepare_sets_pid() {
        let mut base = BaseConfig::default();
        // Host name lookup can fail in minimal sandboxes.
        if base.prepare().is_ok() {
            assert_eq!(base.application_pid(), std::process::id());
            assert!(!base.hostname().is_empty());
        }
    }

    #[test]
    fn test_field_table() {
        let fields = BaseConfig::fields();
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0].key, Some("APP_ENV"));
        assert_eq!(fields[0].default, Some("development"));
        assert_eq!(fields[3].key, Some("APP_DEBUG"));
    }
}
