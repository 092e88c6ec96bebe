//! `--envfile` loading. Files are read in command-line order; variables
//! already in the process environment are never overwritten.

use crate::error::EnvFileError;
use std::path::PathBuf;
use tracing::debug;

/// Load every env file into the process environment.
pub fn load_env_files(paths: &[PathBuf]) -> Result<(), EnvFileError> {
    for path in paths {
        dotenv::from_path(path).map_err(|source| EnvFileError::Load {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "env file loaded");
    }
    Ok(())
}
