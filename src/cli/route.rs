//! CLI route: single route table from resolved options to handlers.

use super::options::{CliOptions, SubCommand, SubOption};
use super::BIN_NAME;
use crate::app::App;
use crate::error::HandlerError;
use crate::{register, render};
use tracing::debug;

/// Whether `sub` reads the config file. Others run on built-in defaults.
pub fn needs_config(sub: SubCommand) -> bool {
    matches!(sub, SubCommand::Register | SubCommand::Render)
}

/// Runtime context for CLI execution: the app and its collaborators.
pub struct RunContext {
    app: App,
}

impl RunContext {
    pub fn new(app: App) -> Self {
        Self { app }
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    /// Execute the parsed subcommand. Returns the text to print on stdout.
    pub async fn execute(&self, opts: &CliOptions) -> Result<String, HandlerError> {
        debug!(subcommand = %opts.sub_command, "dispatching");
        match opts.option() {
            SubOption::Register(opt) => register::register(&self.app, opt).await,
            SubOption::Render(opt) => render::render(&self.app, opt).await,
            SubOption::Version(_) => Ok(format!("{} v{}", BIN_NAME, env!("CARGO_PKG_VERSION"))),
            SubOption::Status(_)
            | SubOption::Deploy(_)
            | SubOption::Scale(_)
            | SubOption::Refresh(_)
            | SubOption::Create(_)
            | SubOption::Rollback(_)
            | SubOption::Delete(_)
            | SubOption::Run(_)
            | SubOption::Deregister(_)
            | SubOption::Revisions(_)
            | SubOption::Wait(_)
            | SubOption::Init(_)
            | SubOption::Diff(_)
            | SubOption::Appspec(_)
            | SubOption::Verify(_)
            | SubOption::Tasks(_)
            | SubOption::Exec(_) => Err(HandlerError::Unsupported(opts.sub_command.name())),
        }
    }
}
