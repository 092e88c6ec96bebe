//! Error types for the ecsdeploy command-line engine.

use std::path::PathBuf;
use thiserror::Error;

/// Defects in the static option registry, caught when the registry is built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("{command}: Field `{field}` has no default profile entry")]
    MissingDefault {
        command: &'static str,
        field: &'static str,
    },

    #[error("{command}: Default profile names unknown field `{field}`")]
    UnknownProfileField {
        command: &'static str,
        field: &'static str,
    },

    #[error("{command}: Default profile entry for `{field}` is declared more than once")]
    DuplicateProfileField {
        command: &'static str,
        field: &'static str,
    },

    #[error("{command}: Default for `{field}` does not match its declared kind")]
    KindMismatch {
        command: &'static str,
        field: &'static str,
    },

    #[error("{command}: Exposed flag list names unknown field `{field}`")]
    UnknownExposedField {
        command: &'static str,
        field: &'static str,
    },

    #[error("{command}: Flag `--{flag}` is declared more than once")]
    DuplicateFlag { command: &'static str, flag: String },
}

/// Failures turning the raw token list into option records.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Unknown subcommand, unknown flag, malformed value or missing positional.
    #[error(transparent)]
    Usage(#[from] clap::Error),

    #[error("Unknown subcommand: {0}")]
    UnknownSubcommand(String),

    #[error("No subcommand given")]
    MissingSubcommand,
}

impl ParseError {
    /// Exit code matching the way clap reports the same failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            ParseError::Usage(e) => e.exit_code(),
            _ => 2,
        }
    }
}

/// Semantic constraints violated by an otherwise well-typed option record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{command}: Missing required --{flag}")]
    MissingRequired {
        command: &'static str,
        flag: &'static str,
    },

    #[error("{command}: Invalid value `{value}` for {flag} (expected one of: {})", allowed.join(", "))]
    InvalidChoice {
        command: &'static str,
        flag: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },

    #[error("{command}: Value for --{flag} must be at least {min}, got {value}")]
    OutOfRange {
        command: &'static str,
        flag: &'static str,
        value: i64,
        min: i64,
    },

    #[error("{command}: Flag --{flag} requires --{requires}")]
    Requires {
        command: &'static str,
        flag: &'static str,
        requires: &'static str,
    },
}

impl ValidationError {
    pub fn command(&self) -> &'static str {
        match self {
            ValidationError::MissingRequired { command, .. }
            | ValidationError::InvalidChoice { command, .. }
            | ValidationError::OutOfRange { command, .. }
            | ValidationError::Requires { command, .. } => command,
        }
    }
}

/// Failures surfaced by a subcommand handler or the collaborators it drives.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Failed to load task definition: {source:#}")]
    LoadTaskDefinition { source: anyhow::Error },

    #[error("Failed to load service definition: {source:#}")]
    LoadServiceDefinition { source: anyhow::Error },

    #[error("Failed to register task definition: {source:#}")]
    RegisterTaskDefinition { source: anyhow::Error },

    #[error("Failed to encode {what} as JSON: {source}")]
    Encode {
        what: &'static str,
        source: serde_json::Error,
    },

    #[error("Cancelled during {step}")]
    Cancelled { step: &'static str },

    #[error("Timed out during {step}")]
    TimedOut { step: &'static str },

    #[error("Subcommand `{0}` needs the remote service workflow, which this build does not include")]
    Unsupported(&'static str),
}

/// Failures loading `--envfile` files into the process environment.
#[derive(Debug, Error)]
pub enum EnvFileError {
    #[error("Failed to load env file {path:?}: {source}")]
    Load {
        path: PathBuf,
        source: dotenv::Error,
    },
}

/// Failures reading the tool's configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config file {path:?}: {source}")]
    Load {
        path: PathBuf,
        source: config::ConfigError,
    },

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

/// Every failure the command line can report.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid option registry: {0}")]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Handler(#[from] HandlerError),

    #[error(transparent)]
    EnvFile(#[from] EnvFileError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
