//! CLI output: error mapping from domain errors to stable CLI surface.

use super::BIN_NAME;
use crate::error::CliError;

/// Map an error to the message printed on stderr. Validation errors carry a
/// usage hint for the offending subcommand.
pub fn map_error(e: &CliError) -> String {
    match e {
        CliError::Validation(v) => format!(
            "{}\n\nRun '{} {} --help' for usage.",
            v,
            BIN_NAME,
            v.command()
        ),
        CliError::Parse(p) => p.to_string().trim_end().to_string(),
        other => other.to_string(),
    }
}

/// Process exit code: clap's own code for parse errors, 1 otherwise.
pub fn exit_code(e: &CliError) -> i32 {
    match e {
        CliError::Parse(p) => p.exit_code(),
        _ => 1,
    }
}
