//! `register`: load the task definition and create a new revision of it.
//!
//! Load, then either stop at the dry-run marker or submit to the registry,
//! then optionally emit the registered definition. No registry call is made
//! on a dry run or after a failed load.

use crate::app::{dry_run_suffix, App};
use crate::cli::RegisterOption;
use crate::error::HandlerError;
use crate::logging::log_json;
use tracing::{info, warn};

/// Run `register`. Returns the text for stdout: the registered definition as
/// JSON with `--output`, otherwise nothing.
pub async fn register(app: &App, opt: &RegisterOption) -> Result<String, HandlerError> {
    let scope = app.start();
    let dry_run = opt.dry_run.unwrap_or(false);
    info!("Starting register task definition{}", dry_run_suffix(dry_run));

    let definition = app.load_task_definition(&scope).await?;

    if dry_run {
        info!("task definition:");
        log_json(&definition);
        info!("DRY RUN OK");
        return Ok(String::new());
    }

    let registered = scope
        .run(
            "register task definition",
            app.registry().register_task_definition(&definition),
        )
        .await?
        .map_err(|source| HandlerError::RegisterTaskDefinition { source })?;
    info!(
        "Task definition is registered {}:{}",
        registered.family, registered.revision
    );

    if opt.output.unwrap_or(false) {
        match serde_json::to_string_pretty(&registered) {
            Ok(json) => return Ok(json),
            Err(e) => warn!(error = %e, "failed to encode registered task definition"),
        }
    }
    Ok(String::new())
}
