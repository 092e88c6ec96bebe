//! `render`: print the config and definition files as JSON.

use crate::app::App;
use crate::cli::RenderOption;
use crate::error::HandlerError;
use serde::Serialize;
use tracing::warn;

pub const TARGET_CONFIG: &str = "config";
pub const TARGET_TASK_DEFINITION: &str = "taskdef";
pub const TARGET_SERVICE_DEFINITION: &str = "servicedef";

/// Render each target in order, one JSON document per target.
pub async fn render(app: &App, opt: &RenderOption) -> Result<String, HandlerError> {
    let scope = app.start();
    let mut documents = Vec::new();

    for target in opt.targets.iter().flatten() {
        let document = match target.as_str() {
            TARGET_CONFIG => encode("config", app.config())?,
            TARGET_TASK_DEFINITION => {
                encode("task definition", &app.load_task_definition(&scope).await?)?
            }
            TARGET_SERVICE_DEFINITION => encode(
                "service definition",
                &app.load_service_definition(&scope).await?,
            )?,
            other => {
                warn!(target = other, "unknown render target skipped");
                continue;
            }
        };
        documents.push(document);
    }

    Ok(documents.join("\n"))
}

fn encode<T: Serialize>(what: &'static str, value: &T) -> Result<String, HandlerError> {
    serde_json::to_string_pretty(value).map_err(|source| HandlerError::Encode { what, source })
}
