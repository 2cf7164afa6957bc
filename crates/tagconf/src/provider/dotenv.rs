//! Dotenv files.
//!
//! [`load_env_from_file`] and [`load_local_env_if_dev`] copy a dotenv file
//! into the process environment before a load. [`DotenvSecrets`] instead
//! parses a file into memory and serves it as a [`SecretSource`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{EnvSource, ProcessEnv, SecretSource};
use crate::base::{APP_ENV_VAR, APP_LOCAL_ENV_FILE_PATH_VAR, ENV_DEVELOPMENT, ENV_LOCAL};
use crate::error::Error;

/// Secrets read from a dotenv file.
///
/// The file is parsed once at construction; the process environment is
/// never modified.
///
/// # Example
///
/// ```rust,ignore
/// use tagconf::{ConfigManager, provider::DotenvSecrets};
///
/// let secrets = DotenvSecrets::from_path(".secrets.env")?;
/// ConfigManager::new().prepare_to(&mut config).with_secrets(secrets).run()?;
/// ```
#[derive(Clone)]
pub struct DotenvSecrets {
    values: HashMap<String, String>,
    path: PathBuf,
}

impl DotenvSecrets {
    /// Parses the dotenv file at `path`.
    ///
    /// Fails if the file is missing or not valid dotenv syntax.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let dotenv_err = |source| Error::Dotenv {
            path: path.clone(),
            source,
        };

        let values = dotenvy::from_path_iter(&path)
            .map_err(dotenv_err)?
            .collect::<Result<HashMap<_, _>, _>>()
            .map_err(dotenv_err)?;

        tracing::debug!(path = %path.display(), count = values.len(), "dotenv secrets parsed");

        Ok(Self { values, path })
    }

    /// The file the secrets were read from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of secrets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the file held no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SecretSource for DotenvSecrets {
    fn get_by_name(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

impl std::fmt::Debug for DotenvSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DotenvSecrets")
            .field("path", &self.path)
            .field("count", &self.values.len())
            .finish_non_exhaustive()
    }
}

/// Loads a dotenv file into the process environment.
///
/// Variables already set are kept. An empty `path` defers to
/// [`load_local_env_if_dev`].
pub fn load_env_from_file(path: impl AsRef<Path>) -> Result<(), Error> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return load_local_env_if_dev();
    }

    load_into_process(path)
}

/// Loads the local dotenv file when running in a development environment.
///
/// `APP_ENV` must be set. When it is `local` or `development`,
/// `APP_LOCAL_ENV_FILE_PATH` must be set too and names the file to load;
/// otherwise nothing happens.
pub fn load_local_env_if_dev() -> Result<(), Error> {
    let env = ProcessEnv;

    let environment = env
        .lookup(APP_ENV_VAR)?
        .ok_or_else(|| Error::required(APP_ENV_VAR, Some(APP_ENV_VAR)))?;

    if environment != ENV_LOCAL && environment != ENV_DEVELOPMENT {
        tracing::trace!(environment = %environment, "skipping local dotenv file");
        return Ok(());
    }

    let path = env
        .lookup(APP_LOCAL_ENV_FILE_PATH_VAR)?
        .ok_or_else(|| Error::required(APP_LOCAL_ENV_FILE_PATH_VAR, Some(APP_LOCAL_ENV_FILE_PATH_VAR)))?;

    load_into_process(Path::new(&path))
}

fn load_into_process(path: &Path) -> Result<(), Error> {
    dotenvy::from_path(path).map_err(|source| Error::Dotenv {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(path = %path.display(), "dotenv file loaded");

    Ok(())
}
