//! Config loader facade: the one entry point that reads the config file.

use super::merge::builder_with_defaults;
use super::AppConfig;
use crate::error::ConfigError;
use config::File;
use std::path::Path;
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the config file at `path` on top of builder defaults. The format
    /// follows the file extension (yaml, yml, json, toml).
    ///
    /// Relative definition paths are resolved against the file's directory.
    pub fn load_from_file(path: &Path) -> Result<AppConfig, ConfigError> {
        let load_err = |source| ConfigError::Load {
            path: path.to_path_buf(),
            source,
        };
        let settings = builder_with_defaults()
            .map_err(load_err)?
            .add_source(File::from(path).required(true))
            .build()
            .map_err(load_err)?;
        let mut config: AppConfig = settings.try_deserialize().map_err(load_err)?;

        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            config.resolve_paths(dir);
        }
        debug!(path = %path.display(), cluster = %config.cluster, "config loaded");
        Ok(config)
    }
}
