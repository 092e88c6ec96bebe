//! CLI domain: option schema, default profiles, parse, resolve, validate,
//! route, and output. The registry is the single source of truth for every
//! flag; the clap command is generated from it.

pub mod schema;

mod options;
mod output;
mod parse;
mod profile;
mod registry;
mod resolve;
mod route;
mod validate;

pub use options::{
    AppSpecOption, CliOptions, CreateOption, DeleteOption, DeployOption, DeregisterOption,
    DiffOption, ExecOption, GlobalOption, InitOption, RegisterOption, RenderOption,
    RevisionsOption, RollbackOption, RunOption, StatusOption, SubCommand, SubOption, TasksOption,
    VerifyOption, VersionOption, WaitOption,
};
pub use output::{exit_code, map_error};
pub use parse::ParsedCli;
pub use profile::{profile, DefaultEntry, Profile, KEEP_DESIRED_COUNT};
pub use registry::{spec, Entry, Exposure, Registry, SubcommandSpec};
pub use resolve::{EnvLookup, ProcessEnv};
pub use route::{needs_config, RunContext};
pub use validate::validate;

use crate::envfile::load_env_files;
use crate::error::CliError;
use std::ffi::OsString;

pub const BIN_NAME: &str = "ecsdeploy";
pub const DEFAULT_CONFIG_FILE: &str = "ecsdeploy.yml";

/// Parse, load env files, resolve defaults, and validate in one go.
///
/// `args` excludes the program name. Env files named by `--envfile` are
/// loaded into the process environment before `env` is consulted.
pub fn parse_options<I, T>(args: I, env: &dyn EnvLookup) -> Result<CliOptions, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    parse_options_with(args, env, |_| Ok(()))
}

/// [`parse_options`] with a hook that sees the parsed global flags before
/// env files load and before any default is resolved. The binary starts
/// logging here.
pub fn parse_options_with<I, T, F>(
    args: I,
    env: &dyn EnvLookup,
    on_parsed: F,
) -> Result<CliOptions, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
    F: FnOnce(&ParsedCli) -> Result<(), CliError>,
{
    let registry = Registry::new()?;
    let parsed = registry.parse(args)?;
    on_parsed(&parsed)?;
    load_env_files(&parsed.global.envfiles)?;
    let opts = registry.resolve(parsed, env);
    validate(&opts)?;
    Ok(opts)
}
