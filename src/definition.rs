//! Task and service definitions, and the collaborators that load and
//! register them.

use anyhow::{bail, Context};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// ECS task definition document, kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskDefinition(pub Value);

impl TaskDefinition {
    pub fn family(&self) -> Option<&str> {
        self.0.get("family").and_then(Value::as_str)
    }
}

/// ECS service definition document, kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceDefinition(pub Value);

/// A task definition revision created by the registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredTaskDefinition {
    pub family: String,
    pub revision: i64,
    pub task_definition: TaskDefinition,
}

/// What to load, plus the `--ext-str` / `--ext-code` variables handed to a
/// templating loader.
#[derive(Debug, Clone, Copy)]
pub struct LoadRequest<'a> {
    pub path: &'a Path,
    pub ext_str: &'a BTreeMap<String, String>,
    pub ext_code: &'a BTreeMap<String, String>,
}

#[async_trait]
pub trait DefinitionLoader: Send + Sync {
    async fn load_task_definition(&self, req: LoadRequest<'_>) -> anyhow::Result<TaskDefinition>;

    async fn load_service_definition(
        &self,
        req: LoadRequest<'_>,
    ) -> anyhow::Result<ServiceDefinition>;
}

/// Remote task definition registry. Registration is a mutating call.
#[async_trait]
pub trait TaskDefinitionRegistry: Send + Sync {
    async fn register_task_definition(
        &self,
        definition: &TaskDefinition,
    ) -> anyhow::Result<RegisteredTaskDefinition>;
}

/// Reads plain JSON definition files. Substitution variables are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileDefinitionLoader;

impl FileDefinitionLoader {
    async fn read_json(path: &Path) -> anyhow::Result<Value> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        let value: Value = serde_json::from_str(&raw)
            .with_context(|| format!("parsing {} as JSON", path.display()))?;
        if !value.is_object() {
            bail!("{}: expected a JSON object", path.display());
        }
        Ok(value)
    }
}

#[async_trait]
impl DefinitionLoader for FileDefinitionLoader {
    async fn load_task_definition(&self, req: LoadRequest<'_>) -> anyhow::Result<TaskDefinition> {
        if !req.ext_str.is_empty() || !req.ext_code.is_empty() {
            debug!(path = %req.path.display(), "plain JSON loader ignores ext vars");
        }
        let mut value = Self::read_json(req.path).await?;
        // `describe-task-definition` output wraps the document.
        if let Some(inner) = value.get_mut("taskDefinition") {
            value = inner.take();
        }
        Ok(TaskDefinition(value))
    }

    async fn load_service_definition(
        &self,
        req: LoadRequest<'_>,
    ) -> anyhow::Result<ServiceDefinition> {
        Self::read_json(req.path).await.map(ServiceDefinition)
    }
}

/// Registry used when no remote backend is configured. Every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredRegistry;

#[async_trait]
impl TaskDefinitionRegistry for UnconfiguredRegistry {
    async fn register_task_definition(
        &self,
        definition: &TaskDefinition,
    ) -> anyhow::Result<RegisteredTaskDefinition> {
        bail!(
            "no task definition registry is configured (family {})",
            definition.family().unwrap_or("<unknown>")
        )
    }
}
