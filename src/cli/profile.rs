//! Default profiles: per-subcommand default values, kept apart from the
//! record shapes so one record type can carry several profiles.

use super::options::SubCommand;
use super::schema::FieldValue;

/// Default for one field of one subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultEntry {
    Value(FieldValue),
    /// No default: the field stays absent unless its flag is given.
    Absent,
    /// Filled from the global `--config` path.
    GlobalConfigPath,
}

type Entries = &'static [(&'static str, DefaultEntry)];

/// Named default profile for a subcommand.
#[derive(Debug, Clone, Copy)]
pub struct Profile {
    pub sub: SubCommand,
    pub entries: Entries,
}

impl Profile {
    pub fn get(&self, field: &str) -> Option<DefaultEntry> {
        self.entries
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, entry)| *entry)
    }

    /// Whether the field defaults to boolean `true`, which earns it a derived `no-` flag.
    pub fn defaults_true(&self, field: &str) -> bool {
        self.get(field) == Some(DefaultEntry::Value(FieldValue::Bool(true)))
    }
}

const TRUE: DefaultEntry = DefaultEntry::Value(FieldValue::Bool(true));
const FALSE: DefaultEntry = DefaultEntry::Value(FieldValue::Bool(false));
const ABSENT: DefaultEntry = DefaultEntry::Absent;

const fn text(v: &'static str) -> DefaultEntry {
    DefaultEntry::Value(FieldValue::Str(v))
}

const fn int32(v: i32) -> DefaultEntry {
    DefaultEntry::Value(FieldValue::Int32(v))
}

const fn int64(v: i64) -> DefaultEntry {
    DefaultEntry::Value(FieldValue::Int64(v))
}

/// Sentinel desired count meaning "leave unchanged".
pub const KEEP_DESIRED_COUNT: i32 = -1;

const STATUS: Entries = &[("events", int32(2))];

const DEPLOY: Entries = &[
    ("dry_run", FALSE),
    ("desired_count", int32(KEEP_DESIRED_COUNT)),
    ("skip_task_definition", FALSE),
    ("force_new_deployment", FALSE),
    ("no_wait", FALSE),
    ("suspend_auto_scaling", ABSENT),
    ("rollback_events", text("")),
    ("update_service", TRUE),
    ("latest_task_definition", FALSE),
];

const SCALE: Entries = &[
    ("dry_run", FALSE),
    ("desired_count", int32(KEEP_DESIRED_COUNT)),
    ("skip_task_definition", TRUE),
    ("force_new_deployment", FALSE),
    ("no_wait", FALSE),
    ("suspend_auto_scaling", ABSENT),
    ("rollback_events", ABSENT),
    ("update_service", FALSE),
    ("latest_task_definition", FALSE),
];

const REFRESH: Entries = &[
    ("dry_run", FALSE),
    ("desired_count", ABSENT),
    ("skip_task_definition", TRUE),
    ("force_new_deployment", TRUE),
    ("no_wait", FALSE),
    ("suspend_auto_scaling", ABSENT),
    ("rollback_events", ABSENT),
    ("update_service", FALSE),
    ("latest_task_definition", FALSE),
];

const CREATE: Entries = &[
    ("dry_run", FALSE),
    ("desired_count", int32(KEEP_DESIRED_COUNT)),
    ("no_wait", FALSE),
];

const ROLLBACK: Entries = &[
    ("dry_run", FALSE),
    ("deregister_task_definition", TRUE),
    ("no_wait", FALSE),
    ("rollback_events", text("")),
];

const DELETE: Entries = &[("dry_run", FALSE), ("force", FALSE)];

const RUN: Entries = &[
    ("dry_run", FALSE),
    ("task_definition", text("")),
    ("no_wait", FALSE),
    ("count", int32(1)),
    ("watch_container", text("")),
    ("propagate_tags", text("")),
    ("task_override_str", text("")),
    ("task_override_file", text("")),
    ("skip_task_definition", FALSE),
    ("latest_task_definition", FALSE),
    ("tags", text("")),
    ("wait_until", text("stopped")),
    ("revision", int64(0)),
];

const REGISTER: Entries = &[("dry_run", FALSE), ("output", FALSE)];

const DEREGISTER: Entries = &[
    ("dry_run", FALSE),
    ("revision", int64(0)),
    ("keeps", int32(0)),
    ("force", FALSE),
];

const REVISIONS: Entries = &[("revision", int64(0)), ("output", text("table"))];

const INIT: Entries = &[
    // AWS_REGION takes precedence when set.
    ("region", text("")),
    ("cluster", text("default")),
    ("service", ABSENT),
    ("task_definition_path", text("ecs-task-def.json")),
    ("service_definition_path", text("ecs-service-def.json")),
    ("force_overwrite", FALSE),
    ("jsonnet", FALSE),
    ("config_file_path", DefaultEntry::GlobalConfigPath),
];

const DIFF: Entries = &[("unified", TRUE)];

const APPSPEC: Entries = &[("task_definition", text("latest")), ("update_service", TRUE)];

const VERIFY: Entries = &[("get_secrets", TRUE), ("put_logs", TRUE)];

const RENDER: Entries = &[("targets", ABSENT)];

const TASKS: Entries = &[
    ("id", text("")),
    ("output", text("table")),
    ("find", FALSE),
    ("stop", FALSE),
    ("force", FALSE),
    ("trace", FALSE),
];

const EXEC: Entries = &[
    ("id", text("")),
    ("command", text("sh")),
    ("container", text("")),
    ("local_port", int32(0)),
    ("port", int32(0)),
    ("port_forward", FALSE),
];

/// Default profile for `sub`.
pub fn profile(sub: SubCommand) -> Profile {
    let entries = match sub {
        SubCommand::Status => STATUS,
        SubCommand::Deploy => DEPLOY,
        SubCommand::Scale => SCALE,
        SubCommand::Refresh => REFRESH,
        SubCommand::Create => CREATE,
        SubCommand::Rollback => ROLLBACK,
        SubCommand::Delete => DELETE,
        SubCommand::Run => RUN,
        SubCommand::Register => REGISTER,
        SubCommand::Deregister => DEREGISTER,
        SubCommand::Revisions => REVISIONS,
        SubCommand::Wait | SubCommand::Version => &[],
        SubCommand::Init => INIT,
        SubCommand::Diff => DIFF,
        SubCommand::Appspec => APPSPEC,
        SubCommand::Verify => VERIFY,
        SubCommand::Render => RENDER,
        SubCommand::Tasks => TASKS,
        SubCommand::Exec => EXEC,
    };
    Profile { sub, entries }
}
