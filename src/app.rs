//! Application state for one invocation and the execution scope each
//! handler runs in.

use crate::cli::GlobalOption;
use crate::config::AppConfig;
use crate::definition::{
    DefinitionLoader, LoadRequest, ServiceDefinition, TaskDefinition, TaskDefinitionRegistry,
};
use crate::error::HandlerError;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::debug;

/// Marker appended to start messages of dry runs.
pub fn dry_run_suffix(dry_run: bool) -> &'static str {
    if dry_run {
        " [DRY RUN]"
    } else {
        ""
    }
}

/// Everything a handler needs: config, collaborators, and invocation-wide
/// settings from the global flags.
pub struct App {
    config: AppConfig,
    ext_str: BTreeMap<String, String>,
    ext_code: BTreeMap<String, String>,
    timeout: Option<Duration>,
    loader: Arc<dyn DefinitionLoader>,
    registry: Arc<dyn TaskDefinitionRegistry>,
    shutdown: CancellationToken,
}

impl App {
    pub fn new(
        config: AppConfig,
        global: &GlobalOption,
        loader: Arc<dyn DefinitionLoader>,
        registry: Arc<dyn TaskDefinitionRegistry>,
    ) -> Self {
        let timeout = global.timeout.or_else(|| config.timeout());
        Self {
            config,
            ext_str: global.ext_str.clone(),
            ext_code: global.ext_code.clone(),
            timeout,
            loader,
            registry,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn registry(&self) -> &dyn TaskDefinitionRegistry {
        self.registry.as_ref()
    }

    /// Cancelling this token cancels every scope started from the app.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Acquire a fresh execution scope. It is cancelled when dropped.
    pub fn start(&self) -> ExecutionScope {
        ExecutionScope::new(self.shutdown.child_token(), self.timeout)
    }

    pub async fn load_task_definition(
        &self,
        scope: &ExecutionScope,
    ) -> Result<TaskDefinition, HandlerError> {
        let path = &self.config.task_definition;
        debug!(path = %path.display(), "loading task definition");
        scope
            .run(
                "load task definition",
                self.loader.load_task_definition(self.request(path)),
            )
            .await?
            .map_err(|source| HandlerError::LoadTaskDefinition { source })
    }

    pub async fn load_service_definition(
        &self,
        scope: &ExecutionScope,
    ) -> Result<ServiceDefinition, HandlerError> {
        let path = &self.config.service_definition;
        debug!(path = %path.display(), "loading service definition");
        scope
            .run(
                "load service definition",
                self.loader.load_service_definition(self.request(path)),
            )
            .await?
            .map_err(|source| HandlerError::LoadServiceDefinition { source })
    }

    fn request<'a>(&'a self, path: &'a std::path::Path) -> LoadRequest<'a> {
        LoadRequest {
            path,
            ext_str: &self.ext_str,
            ext_code: &self.ext_code,
        }
    }
}

/// Cancellation and deadline for one handler run.
pub struct ExecutionScope {
    token: CancellationToken,
    timeout: Option<Duration>,
    _guard: DropGuard,
}

impl ExecutionScope {
    pub fn new(token: CancellationToken, timeout: Option<Duration>) -> Self {
        let _guard = token.clone().drop_guard();
        Self {
            token,
            timeout,
            _guard,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Drive one collaborator call under the scope.
    ///
    /// A scope that is already cancelled never polls `call`, so the call has
    /// no effect. Cancellation or the deadline firing mid-call stops waiting
    /// for it; the remote side may still complete.
    pub async fn run<F>(&self, step: &'static str, call: F) -> Result<F::Output, HandlerError>
    where
        F: Future,
    {
        if self.is_cancelled() {
            return Err(HandlerError::Cancelled { step });
        }

        let guarded = async {
            tokio::select! {
                biased;
                _ = self.token.cancelled() => Err(HandlerError::Cancelled { step }),
                out = call => Ok(out),
            }
        };

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, guarded)
                .await
                .map_err(|_| HandlerError::TimedOut { step })?,
            None => guarded.await,
        }
    }
}
