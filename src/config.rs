//! Tool configuration: cluster, service and definition file locations.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

mod facade;
mod merge;

pub use facade::ConfigLoader;
pub use merge::{DEFAULT_CLUSTER, DEFAULT_SERVICE_DEFINITION, DEFAULT_TASK_DEFINITION};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    pub cluster: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,

    /// Task definition file
    pub task_definition: PathBuf,

    /// Service definition file
    pub service_definition: PathBuf,

    /// Default deadline for remote calls, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            region: None,
            cluster: DEFAULT_CLUSTER.to_string(),
            service: None,
            task_definition: PathBuf::from(DEFAULT_TASK_DEFINITION),
            service_definition: PathBuf::from(DEFAULT_SERVICE_DEFINITION),
            timeout: None,
        }
    }
}

impl AppConfig {
    /// Make relative definition paths relative to `base` instead of the
    /// working directory.
    pub fn resolve_paths(&mut self, base: &Path) {
        for path in [&mut self.task_definition, &mut self.service_definition] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.filter(|secs| *secs > 0).map(Duration::from_secs)
    }
}
