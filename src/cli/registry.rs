//! Schema registry: subcommand specs, the global flag table, and the clap
//! command generated from them.
//!
//! The registry is checked for exhaustiveness when it is built: every field
//! of every subcommand must carry exactly one type-compatible default profile
//! entry, and no flag spelling may collide within a subcommand.

use super::options::{
    AppSpecOption, CreateOption, DeleteOption, DeployOption, DeregisterOption, DiffOption,
    ExecOption, InitOption, RegisterOption, RenderOption, RevisionsOption, RollbackOption,
    RunOption, StatusOption, SubCommand, TasksOption, VerifyOption, VersionOption, WaitOption,
};
use super::profile::{profile, DefaultEntry, Profile};
use super::schema::{FieldSpec, ValueKind};
use crate::error::RegistryError;
use clap::{value_parser, Arg, ArgAction, Command};
use std::collections::HashSet;
use std::path::PathBuf;

/// Which of a record's fields a subcommand exposes as flags. Unexposed fields
/// take their value from the default profile only.
#[derive(Debug, Clone, Copy)]
pub enum Exposure {
    All,
    Only(&'static [&'static str]),
    Except(&'static [&'static str]),
}

impl Exposure {
    fn names(&self) -> &'static [&'static str] {
        match self {
            Exposure::All => &[],
            Exposure::Only(names) | Exposure::Except(names) => names,
        }
    }

    fn exposes(&self, field: &str) -> bool {
        match self {
            Exposure::All => true,
            Exposure::Only(names) => names.contains(&field),
            Exposure::Except(names) => !names.contains(&field),
        }
    }
}

/// Static description of one subcommand.
#[derive(Debug, Clone, Copy)]
pub struct SubcommandSpec {
    pub sub: SubCommand,
    pub about: &'static str,
    pub fields: &'static [FieldSpec],
    pub exposure: Exposure,
}

/// Spec for `sub`.
pub fn spec(sub: SubCommand) -> SubcommandSpec {
    let (about, fields, exposure) = match sub {
        SubCommand::Status => ("show status of service", StatusOption::FIELDS, Exposure::All),
        SubCommand::Deploy => ("deploy service", DeployOption::FIELDS, Exposure::All),
        SubCommand::Scale => (
            "scale service. equivalent to deploy --skip-task-definition --no-update-service",
            DeployOption::FIELDS,
            Exposure::Only(&["dry_run", "desired_count", "no_wait", "suspend_auto_scaling"]),
        ),
        SubCommand::Refresh => (
            "refresh service. equivalent to deploy --skip-task-definition --force-new-deployment --no-update-service",
            DeployOption::FIELDS,
            Exposure::Only(&["dry_run", "no_wait"]),
        ),
        SubCommand::Create => ("create service", CreateOption::FIELDS, Exposure::All),
        SubCommand::Rollback => ("rollback service", RollbackOption::FIELDS, Exposure::All),
        SubCommand::Delete => ("delete service", DeleteOption::FIELDS, Exposure::All),
        SubCommand::Run => ("run task", RunOption::FIELDS, Exposure::All),
        SubCommand::Register => ("register task definition", RegisterOption::FIELDS, Exposure::All),
        SubCommand::Deregister => (
            "deregister task definition",
            DeregisterOption::FIELDS,
            Exposure::All,
        ),
        SubCommand::Revisions => (
            "show revisions of task definitions",
            RevisionsOption::FIELDS,
            Exposure::All,
        ),
        SubCommand::Wait => ("wait until service stable", WaitOption::FIELDS, Exposure::All),
        SubCommand::Init => (
            "create config file from existing service",
            InitOption::FIELDS,
            // --config is the global flag; init reads it from there.
            Exposure::Except(&["config_file_path"]),
        ),
        SubCommand::Diff => (
            "show diff between task definition, service definition and current running service",
            DiffOption::FIELDS,
            Exposure::All,
        ),
        SubCommand::Appspec => ("output AppSpec YAML for CodeDeploy", AppSpecOption::FIELDS, Exposure::All),
        SubCommand::Verify => (
            "verify resources in configurations",
            VerifyOption::FIELDS,
            Exposure::All,
        ),
        SubCommand::Render => (
            "render config, service definition or task definition file to STDOUT",
            RenderOption::FIELDS,
            Exposure::All,
        ),
        SubCommand::Tasks => ("list tasks that are in a service or having the same family", TasksOption::FIELDS, Exposure::All),
        SubCommand::Exec => ("execute command on task", ExecOption::FIELDS, Exposure::All),
        SubCommand::Version => ("show version", VersionOption::FIELDS, Exposure::All),
    };
    SubcommandSpec {
        sub,
        about,
        fields,
        exposure,
    }
}

/// One global flag. Global options are plain values, not optional fields, so
/// their defaults live here rather than in a profile.
#[derive(Debug, Clone, Copy)]
pub struct GlobalFlag {
    pub id: &'static str,
    pub flag: &'static str,
    pub kind: ValueKind,
    pub value_name: &'static str,
    pub default: Option<&'static str>,
    pub choices: &'static [&'static str],
    pub help: &'static str,
}

impl GlobalFlag {
    /// Repeated flags collect values from both sides of the subcommand token.
    /// clap keeps only the subcommand's occurrences of a `global` arg, so
    /// these are declared on the root and on every subcommand instead.
    pub fn accumulates(&self) -> bool {
        matches!(self.kind, ValueKind::Map | ValueKind::Repeated)
    }
}

pub const GLOBAL_CONFIG: &str = "config";
pub const GLOBAL_DEBUG: &str = "debug";
pub const GLOBAL_ENVFILE: &str = "envfile";
pub const GLOBAL_EXT_STR: &str = "ext_str";
pub const GLOBAL_EXT_CODE: &str = "ext_code";
pub const GLOBAL_TIMEOUT: &str = "timeout";
pub const GLOBAL_LOG_FORMAT: &str = "log_format";

pub const GLOBAL_FLAGS: &[GlobalFlag] = &[
    GlobalFlag {
        id: GLOBAL_CONFIG,
        flag: "config",
        kind: ValueKind::Str,
        value_name: "PATH",
        default: Some(super::DEFAULT_CONFIG_FILE),
        choices: &[],
        help: "config file",
    },
    GlobalFlag {
        id: GLOBAL_DEBUG,
        flag: "debug",
        kind: ValueKind::Bool,
        value_name: "BOOL",
        default: None,
        choices: &[],
        help: "enable debug log",
    },
    GlobalFlag {
        id: GLOBAL_ENVFILE,
        flag: "envfile",
        kind: ValueKind::Repeated,
        value_name: "PATH",
        default: None,
        choices: &[],
        help: "environment files (repeatable)",
    },
    GlobalFlag {
        id: GLOBAL_EXT_STR,
        flag: "ext-str",
        kind: ValueKind::Map,
        value_name: "KEY=VALUE",
        default: None,
        choices: &[],
        help: "external string values for templates (repeatable)",
    },
    GlobalFlag {
        id: GLOBAL_EXT_CODE,
        flag: "ext-code",
        kind: ValueKind::Map,
        value_name: "KEY=EXPR",
        default: None,
        choices: &[],
        help: "external code values for templates (repeatable)",
    },
    GlobalFlag {
        id: GLOBAL_TIMEOUT,
        flag: "timeout",
        kind: ValueKind::Int64,
        value_name: "SECONDS",
        default: None,
        choices: &[],
        help: "timeout for each remote call, in seconds",
    },
    GlobalFlag {
        id: GLOBAL_LOG_FORMAT,
        flag: "log-format",
        kind: ValueKind::Str,
        value_name: "FORMAT",
        default: Some("text"),
        choices: &["text", "json"],
        help: "log format",
    },
];

/// A subcommand spec paired with its default profile.
#[derive(Debug, Clone, Copy)]
pub struct Entry {
    pub spec: SubcommandSpec,
    pub profile: Profile,
}

impl Entry {
    /// Fields that have a flag on this subcommand.
    pub fn exposed_fields(&self) -> impl Iterator<Item = &'static FieldSpec> + '_ {
        self.spec
            .fields
            .iter()
            .filter(move |field| self.spec.exposure.exposes(field.name))
    }

    /// Negation spelling for a boolean field: the declared one, or
    /// `no-<flag>` derived from a `true` default.
    pub fn negation(&self, field: &FieldSpec) -> Option<String> {
        if field.kind != ValueKind::Bool {
            return None;
        }
        match field.negation {
            Some(explicit) => Some(explicit.to_string()),
            None if self.profile.defaults_true(field.name) => Some(format!("no-{}", field.flag)),
            None => None,
        }
    }

    fn check(&self) -> Result<(), RegistryError> {
        let command = self.spec.sub.name();
        let fields = self.spec.fields;

        for field in fields {
            let count = self
                .profile
                .entries
                .iter()
                .filter(|(name, _)| *name == field.name)
                .count();
            match count {
                0 => {
                    return Err(RegistryError::MissingDefault {
                        command,
                        field: field.name,
                    })
                }
                1 => {}
                _ => {
                    return Err(RegistryError::DuplicateProfileField {
                        command,
                        field: field.name,
                    })
                }
            }
        }

        for (name, entry) in self.profile.entries {
            let field = fields
                .iter()
                .find(|f| f.name == *name)
                .ok_or(RegistryError::UnknownProfileField {
                    command,
                    field: *name,
                })?;
            let compatible = match entry {
                DefaultEntry::Value(value) => value.kind() == field.kind,
                DefaultEntry::GlobalConfigPath => field.kind == ValueKind::Str,
                DefaultEntry::Absent => true,
            };
            if !compatible {
                return Err(RegistryError::KindMismatch {
                    command,
                    field: field.name,
                });
            }
        }

        for name in self.spec.exposure.names() {
            if !fields.iter().any(|f| f.name == *name) {
                return Err(RegistryError::UnknownExposedField {
                    command,
                    field: *name,
                });
            }
        }

        let mut seen: HashSet<String> = GLOBAL_FLAGS.iter().map(|g| g.flag.to_string()).collect();
        for field in self.exposed_fields() {
            if field.kind == ValueKind::Positional {
                continue;
            }
            let spellings = std::iter::once(field.flag.to_string())
                .chain(field.aliases.iter().map(|a| a.to_string()))
                .chain(self.negation(field));
            for flag in spellings {
                if !seen.insert(flag.clone()) {
                    return Err(RegistryError::DuplicateFlag { command, flag });
                }
            }
        }
        Ok(())
    }
}

/// Id under which a field's negation flag is registered with clap.
pub(crate) fn negation_id(field: &FieldSpec) -> String {
    format!("no_{}", field.name)
}

/// The checked registry of all subcommands.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: Vec<Entry>,
}

impl Registry {
    /// Build and check the registry for every subcommand.
    pub fn new() -> Result<Self, RegistryError> {
        Self::from_entries(
            SubCommand::ALL
                .iter()
                .map(|&sub| Entry {
                    spec: spec(sub),
                    profile: profile(sub),
                })
                .collect(),
        )
    }

    /// Build a registry from explicit entries, running the same checks.
    pub fn from_entries(entries: Vec<Entry>) -> Result<Self, RegistryError> {
        for entry in &entries {
            entry.check()?;
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entry(&self, sub: SubCommand) -> Option<&Entry> {
        self.entries.iter().find(|e| e.spec.sub == sub)
    }

    /// clap command generated from the registry.
    pub fn command(&self) -> Command {
        let mut command = Command::new(super::BIN_NAME)
            .about("Deployment tool for containerized workloads")
            .subcommand_required(true)
            .arg_required_else_help(true)
            .args_override_self(true);
        for flag in GLOBAL_FLAGS {
            command = command.arg(global_arg(flag));
        }
        for entry in &self.entries {
            command = command.subcommand(subcommand(entry));
        }
        command
    }
}

fn global_arg(flag: &GlobalFlag) -> Arg {
    let arg = Arg::new(flag.id)
        .long(flag.flag)
        .help(flag.help)
        .global(!flag.accumulates());
    let arg = match flag.kind {
        ValueKind::Bool => bool_arg(arg),
        ValueKind::Map => arg
            .value_name(flag.value_name)
            .action(ArgAction::Append)
            .value_parser(parse_key_value),
        ValueKind::Repeated => arg
            .value_name(flag.value_name)
            .action(ArgAction::Append)
            .value_parser(value_parser!(PathBuf)),
        ValueKind::Int64 => arg
            .value_name(flag.value_name)
            .action(ArgAction::Set)
            .value_parser(value_parser!(i64).range(1..)),
        ValueKind::Str if !flag.choices.is_empty() => arg
            .value_name(flag.value_name)
            .action(ArgAction::Set)
            .value_parser(clap::builder::PossibleValuesParser::new(flag.choices.iter().copied())),
        _ => arg
            .value_name(flag.value_name)
            .action(ArgAction::Set)
            .value_parser(value_parser!(String)),
    };
    match flag.default {
        Some(default) => arg.default_value(default),
        None => arg,
    }
}

fn subcommand(entry: &Entry) -> Command {
    let mut command = Command::new(entry.spec.sub.name())
        .about(entry.spec.about)
        .args_override_self(true);
    for flag in GLOBAL_FLAGS.iter().filter(|flag| flag.accumulates()) {
        command = command.arg(global_arg(flag));
    }
    for field in entry.exposed_fields() {
        let help = field.help.trim();
        let arg = Arg::new(field.name).help(help);
        let arg = match field.kind {
            ValueKind::Positional => arg
                .value_name(field.flag.to_uppercase())
                .num_args(1..)
                .required(true)
                .action(ArgAction::Append)
                .value_parser(value_parser!(String)),
            kind => {
                let arg = arg.long(field.flag);
                let arg = field.aliases.iter().fold(arg, |arg, alias| arg.alias(*alias));
                let arg = match kind {
                    ValueKind::Bool => bool_arg(arg),
                    ValueKind::Int32 => arg
                        .value_name("N")
                        .action(ArgAction::Set)
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(i32)),
                    ValueKind::Int64 => arg
                        .value_name("N")
                        .action(ArgAction::Set)
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(i64)),
                    _ => arg
                        .value_name(field.flag.to_uppercase())
                        .action(ArgAction::Set)
                        .value_parser(value_parser!(String)),
                };
                match entry.negation(field) {
                    Some(negation) => {
                        let id = negation_id(field);
                        command = command.arg(
                            bool_arg(Arg::new(id.clone()).long(negation))
                                .help(format!("negate --{}", field.flag))
                                .overrides_with(field.name),
                        );
                        arg.overrides_with(id)
                    }
                    None => arg,
                }
            }
        };
        command = command.arg(arg);
    }
    command
}

/// Boolean flag accepting bare `--flag` or `--flag=true|false`.
fn bool_arg(arg: Arg) -> Arg {
    arg.num_args(0..=1)
        .require_equals(true)
        .default_missing_value("true")
        .action(ArgAction::Set)
        .value_parser(value_parser!(bool))
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got `{}`", s)),
    }
}
