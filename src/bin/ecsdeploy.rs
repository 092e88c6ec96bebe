//! ecsdeploy CLI Binary

use ecsdeploy::app::App;
use ecsdeploy::cli::{
    exit_code, map_error, needs_config, parse_options_with, CliOptions, ProcessEnv, RunContext,
};
use ecsdeploy::config::{AppConfig, ConfigLoader};
use ecsdeploy::definition::{FileDefinitionLoader, UnconfiguredRegistry};
use ecsdeploy::error::{CliError, ParseError};
use ecsdeploy::logging::{init_logging, LoggingConfig};
use std::path::Path;
use std::process;
use std::sync::Arc;
use tracing::{debug, warn};

fn main() {
    let code = match run() {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            0
        }
        // clap renders its own usage errors, and `--help` goes to stdout.
        Err(CliError::Parse(ParseError::Usage(e))) => {
            let _ = e.print();
            e.exit_code()
        }
        Err(e) => {
            debug!(error = %e, "command failed");
            eprintln!("{}", map_error(&e));
            exit_code(&e)
        }
    };
    process::exit(code);
}

fn run() -> Result<String, CliError> {
    // Logging starts as soon as the global flags are known.
    let opts = parse_options_with(std::env::args_os().skip(1), &ProcessEnv, |parsed| {
        init_logging(&LoggingConfig::from_global(&parsed.global))?;
        Ok(())
    })?;

    let app = build_app(&opts)?;
    let context = RunContext::new(app);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let output = runtime.block_on(async {
        let shutdown = context.app().shutdown_token();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupted");
                shutdown.cancel();
            }
        });
        context.execute(&opts).await
    })?;
    Ok(output)
}

fn build_app(opts: &CliOptions) -> Result<App, CliError> {
    let config = if needs_config(opts.sub_command) {
        ConfigLoader::load_from_file(Path::new(&opts.global.config_file_path))?
    } else {
        AppConfig::default()
    };
    Ok(App::new(
        config,
        &opts.global,
        Arc::new(FileDefinitionLoader),
        Arc::new(UnconfiguredRegistry),
    ))
}
