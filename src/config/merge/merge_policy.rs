//! Merge rules: builder defaults that the config file overrides.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

pub const DEFAULT_CLUSTER: &str = "default";
pub const DEFAULT_TASK_DEFINITION: &str = "ecs-task-def.json";
pub const DEFAULT_SERVICE_DEFINITION: &str = "ecs-service-def.json";

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("cluster", DEFAULT_CLUSTER)?
        .set_default("task_definition", DEFAULT_TASK_DEFINITION)?
        .set_default("service_definition", DEFAULT_SERVICE_DEFINITION)
}
