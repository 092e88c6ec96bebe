mod merge_policy;

pub use merge_policy::{
    builder_with_defaults, DEFAULT_CLUSTER, DEFAULT_SERVICE_DEFINITION, DEFAULT_TASK_DEFINITION,
};
