//! Semantic checks on resolved options. Runs after defaulting, before dispatch.

use super::options::{CliOptions, SubOption};
use crate::error::ValidationError;
use crate::render::{TARGET_CONFIG, TARGET_SERVICE_DEFINITION, TARGET_TASK_DEFINITION};

const OUTPUT_FORMATS: &[&str] = &["table", "json", "tsv"];
const APPSPEC_TASK_DEFINITIONS: &[&str] = &["latest", "current"];
const WAIT_UNTIL_STATES: &[&str] = &["running", "stopped"];
const RENDER_TARGETS: &[&str] = &[
    TARGET_CONFIG,
    TARGET_TASK_DEFINITION,
    TARGET_SERVICE_DEFINITION,
];

/// Validate the resolved record of the parsed subcommand.
pub fn validate(opts: &CliOptions) -> Result<(), ValidationError> {
    let command = opts.sub_command.name();
    match opts.option() {
        SubOption::Status(o) => at_least(command, "events", o.events.map(i64::from), 0),
        SubOption::Deploy(o) | SubOption::Scale(o) | SubOption::Refresh(o) => {
            at_least(command, "tasks", o.desired_count.map(i64::from), -1)
        }
        SubOption::Create(o) => at_least(command, "tasks", o.desired_count.map(i64::from), -1),
        SubOption::Run(o) => {
            one_of(command, "--wait-until", o.wait_until.as_deref(), WAIT_UNTIL_STATES)?;
            at_least(command, "count", o.count.map(i64::from), 1)
        }
        SubOption::Deregister(o) => {
            at_least(command, "revision", o.revision, 0)?;
            at_least(command, "keeps", o.keeps.map(i64::from), 0)
        }
        SubOption::Revisions(o) => one_of(command, "--output", o.output.as_deref(), OUTPUT_FORMATS),
        SubOption::Tasks(o) => one_of(command, "--output", o.output.as_deref(), OUTPUT_FORMATS),
        SubOption::Init(o) => match o.service.as_deref() {
            Some(service) if !service.is_empty() => Ok(()),
            _ => Err(ValidationError::MissingRequired {
                command,
                flag: "service",
            }),
        },
        SubOption::Appspec(o) => one_of(
            command,
            "--task-definition",
            o.task_definition.as_deref(),
            APPSPEC_TASK_DEFINITIONS,
        ),
        SubOption::Render(o) => {
            for target in o.targets.iter().flatten() {
                one_of(command, "target", Some(target.as_str()), RENDER_TARGETS)?;
            }
            Ok(())
        }
        SubOption::Exec(o) => {
            if o.port_forward == Some(true) && o.port.unwrap_or(0) <= 0 {
                return Err(ValidationError::Requires {
                    command,
                    flag: "port-forward",
                    requires: "port",
                });
            }
            at_least(command, "local-port", o.local_port.map(i64::from), 0)
        }
        SubOption::Rollback(_)
        | SubOption::Delete(_)
        | SubOption::Register(_)
        | SubOption::Wait(_)
        | SubOption::Diff(_)
        | SubOption::Verify(_)
        | SubOption::Version(_) => Ok(()),
    }
}

fn one_of(
    command: &'static str,
    flag: &'static str,
    value: Option<&str>,
    allowed: &'static [&'static str],
) -> Result<(), ValidationError> {
    match value {
        Some(v) if !allowed.contains(&v) => Err(ValidationError::InvalidChoice {
            command,
            flag,
            value: v.to_string(),
            allowed,
        }),
        _ => Ok(()),
    }
}

fn at_least(
    command: &'static str,
    flag: &'static str,
    value: Option<i64>,
    min: i64,
) -> Result<(), ValidationError> {
    match value {
        Some(v) if v < min => Err(ValidationError::OutOfRange {
            command,
            flag,
            value: v,
            min,
        }),
        _ => Ok(()),
    }
}
