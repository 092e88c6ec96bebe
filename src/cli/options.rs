//! Option records: the global record, one record per subcommand, and the
//! resolved state the dispatcher and handlers consume.

use super::schema::{option_record, OptionRecord};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Subcommands the tool knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubCommand {
    Status,
    Deploy,
    Scale,
    Refresh,
    Create,
    Rollback,
    Delete,
    Run,
    Register,
    Deregister,
    Revisions,
    Wait,
    Init,
    Diff,
    Appspec,
    Verify,
    Render,
    Tasks,
    Exec,
    Version,
}

impl SubCommand {
    pub const ALL: [SubCommand; 20] = [
        SubCommand::Status,
        SubCommand::Deploy,
        SubCommand::Scale,
        SubCommand::Refresh,
        SubCommand::Create,
        SubCommand::Rollback,
        SubCommand::Delete,
        SubCommand::Run,
        SubCommand::Register,
        SubCommand::Deregister,
        SubCommand::Revisions,
        SubCommand::Wait,
        SubCommand::Init,
        SubCommand::Diff,
        SubCommand::Appspec,
        SubCommand::Verify,
        SubCommand::Render,
        SubCommand::Tasks,
        SubCommand::Exec,
        SubCommand::Version,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SubCommand::Status => "status",
            SubCommand::Deploy => "deploy",
            SubCommand::Scale => "scale",
            SubCommand::Refresh => "refresh",
            SubCommand::Create => "create",
            SubCommand::Rollback => "rollback",
            SubCommand::Delete => "delete",
            SubCommand::Run => "run",
            SubCommand::Register => "register",
            SubCommand::Deregister => "deregister",
            SubCommand::Revisions => "revisions",
            SubCommand::Wait => "wait",
            SubCommand::Init => "init",
            SubCommand::Diff => "diff",
            SubCommand::Appspec => "appspec",
            SubCommand::Verify => "verify",
            SubCommand::Render => "render",
            SubCommand::Tasks => "tasks",
            SubCommand::Exec => "exec",
            SubCommand::Version => "version",
        }
    }
}

impl fmt::Display for SubCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SubCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubCommand::ALL
            .iter()
            .copied()
            .find(|sub| sub.name() == s)
            .ok_or_else(|| s.to_string())
    }
}

option_record! {
    /// Options for `status`.
    pub struct StatusOption {
        /// show events num
        events: i32 => "events";
    }
}

option_record! {
    /// Options shared by `deploy`, `scale` and `refresh`.
    pub struct DeployOption {
        /// dry run
        dry_run: bool => "dry-run";
        /// desired count of tasks (-1 leaves the current count unchanged)
        desired_count: i32 => "tasks";
        /// skip register a new task definition
        skip_task_definition: bool => "skip-task-definition";
        /// force a new deployment of the service
        force_new_deployment: bool => "force-new-deployment";
        /// exit ecsdeploy immediately after just deployed without waiting for service stable
        no_wait: bool => "no-wait";
        /// suspend application auto-scaling attached with the service
        suspend_auto_scaling: bool => "suspend-auto-scaling", negation = "resume-auto-scaling";
        /// roll back when specified events happened (DEPLOYMENT_FAILURE,DEPLOYMENT_STOP_ON_ALARM,DEPLOYMENT_STOP_ON_REQUEST,...)
        rollback_events: String => "rollback-events";
        /// update service attributes by service definition
        update_service: bool => "update-service";
        /// deploy with the latest task definition without registering a new task definition
        latest_task_definition: bool => "latest-task-definition";
    }
}

option_record! {
    /// Options for `create`.
    pub struct CreateOption {
        /// dry run
        dry_run: bool => "dry-run";
        /// desired count of tasks
        desired_count: i32 => "tasks";
        /// exit immediately after creating the service
        no_wait: bool => "no-wait";
    }
}

option_record! {
    /// Options for `rollback`.
    pub struct RollbackOption {
        /// dry run
        dry_run: bool => "dry-run";
        /// deregister the rolled-back task definition
        deregister_task_definition: bool => "deregister-task-definition";
        /// exit immediately after rolling back without waiting for service stable
        no_wait: bool => "no-wait";
        /// roll back when specified events happened
        rollback_events: String => "rollback-events";
    }
}

option_record! {
    /// Options for `delete`.
    pub struct DeleteOption {
        /// dry run
        dry_run: bool => "dry-run";
        /// delete without confirmation
        force: bool => "force";
    }
}

option_record! {
    /// Options for `run`.
    pub struct RunOption {
        /// dry run
        dry_run: bool => "dry-run";
        /// task definition file to run task
        task_definition: String => "task-def";
        /// exit immediately after run task
        no_wait: bool => "no-wait";
        /// number of tasks to run (max 10)
        count: i32 => "count";
        /// container name for watching exit code
        watch_container: String => "watch-container";
        /// propagate tags from the service or task definition (SERVICE or TASK_DEFINITION)
        propagate_tags: String => "propagate-tags";
        /// task overrides JSON string
        task_override_str: String => "overrides";
        /// task overrides JSON file path
        task_override_file: String => "overrides-file";
        /// skip register a new task definition
        skip_task_definition: bool => "skip-task-definition";
        /// run the latest task definition without registering a new task definition
        latest_task_definition: bool => "latest-task-definition";
        /// tags to attach to the task, formatted as KeyFoo=ValueFoo,KeyBar=ValueBar
        tags: String => "tags";
        /// wait until the task reaches this state (running or stopped)
        wait_until: String => "wait-until";
        /// revision of the task definition to run when --skip-task-definition
        revision: i64 => "revision";
    }
}

option_record! {
    /// Options for `register`.
    pub struct RegisterOption {
        /// dry run
        dry_run: bool => "dry-run";
        /// output the registered task definition as JSON
        output: bool => "output";
    }
}

option_record! {
    /// Options for `deregister`.
    pub struct DeregisterOption {
        /// dry run
        dry_run: bool => "dry-run";
        /// task definition revision to deregister
        revision: i64 => "revision";
        /// number of latest revisions to keep
        keeps: i32 => "keeps";
        /// deregister without confirmation
        force: bool => "force";
    }
}

option_record! {
    /// Options for `revisions`.
    pub struct RevisionsOption {
        /// revision number to output
        revision: i64 => "revision";
        /// output format (table, json, tsv)
        output: String => "output";
    }
}

option_record! {
    /// Options for `wait`.
    pub struct WaitOption {}
}

option_record! {
    /// Options for `init`.
    pub struct InitOption {
        /// region of the cluster
        region: String => "region", env = "AWS_REGION";
        /// cluster name
        cluster: String => "cluster";
        /// service name
        service: String => "service";
        /// path to the task definition file to write
        task_definition_path: String => "task-definition-path";
        /// path to the service definition file to write
        service_definition_path: String => "service-definition-path";
        /// overwrite existing files
        force_overwrite: bool => "force-overwrite";
        /// write definition files in jsonnet format
        jsonnet: bool => "jsonnet";
        /// path of the config file to write (taken from --config)
        config_file_path: String => "config";
    }
}

option_record! {
    /// Options for `diff`.
    pub struct DiffOption {
        /// output in unified diff format
        unified: bool => "unified";
    }
}

option_record! {
    /// Options for `appspec`.
    pub struct AppSpecOption {
        /// use task definition arn in AppSpec (latest, current)
        task_definition: String => "task-definition";
        /// update service definition with task definition arn
        update_service: bool => "update-service";
    }
}

option_record! {
    /// Options for `verify`.
    pub struct VerifyOption {
        /// get secrets from the parameter store or secrets manager
        get_secrets: bool => "get-secrets";
        /// put verification logs to the log group
        put_logs: bool => "put-logs";
    }
}

option_record! {
    /// Options for `render`.
    pub struct RenderOption {
        /// targets to render (config, taskdef, servicedef)
        targets: Vec<String> => "targets";
    }
}

option_record! {
    /// Options for `tasks`.
    pub struct TasksOption {
        /// task ID
        id: String => "id";
        /// output format (table, json, tsv)
        output: String => "output";
        /// find a task from the list and dump it as JSON
        find: bool => "find";
        /// stop the task
        stop: bool => "stop";
        /// stop the task without confirmation
        force: bool => "force";
        /// trace the task
        trace: bool => "trace";
    }
}

option_record! {
    /// Options for `exec`.
    pub struct ExecOption {
        /// task ID
        id: String => "id";
        /// command to execute
        command: String => "command";
        /// container name
        container: String => "container";
        /// local port number
        local_port: i32 => "local-port";
        /// remote port number (required for --port-forward)
        port: i32 => "port";
        /// enable port forward
        port_forward: bool => "port-forward";
    }
}

option_record! {
    /// Options for `version`.
    pub struct VersionOption {}
}

/// Subcommand option record, tagged by subcommand.
///
/// `deploy`, `scale` and `refresh` share [`DeployOption`]; their variants
/// differ only in the default profile applied to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "subcommand", content = "options", rename_all = "lowercase")]
pub enum SubOption {
    Status(StatusOption),
    Deploy(DeployOption),
    Scale(DeployOption),
    Refresh(DeployOption),
    Create(CreateOption),
    Rollback(RollbackOption),
    Delete(DeleteOption),
    Run(RunOption),
    Register(RegisterOption),
    Deregister(DeregisterOption),
    Revisions(RevisionsOption),
    Wait(WaitOption),
    Init(InitOption),
    Diff(DiffOption),
    Appspec(AppSpecOption),
    Verify(VerifyOption),
    Render(RenderOption),
    Tasks(TasksOption),
    Exec(ExecOption),
    Version(VersionOption),
}

impl SubOption {
    /// A record for `sub` with every field absent.
    pub fn empty(sub: SubCommand) -> Self {
        match sub {
            SubCommand::Status => SubOption::Status(Default::default()),
            SubCommand::Deploy => SubOption::Deploy(Default::default()),
            SubCommand::Scale => SubOption::Scale(Default::default()),
            SubCommand::Refresh => SubOption::Refresh(Default::default()),
            SubCommand::Create => SubOption::Create(Default::default()),
            SubCommand::Rollback => SubOption::Rollback(Default::default()),
            SubCommand::Delete => SubOption::Delete(Default::default()),
            SubCommand::Run => SubOption::Run(Default::default()),
            SubCommand::Register => SubOption::Register(Default::default()),
            SubCommand::Deregister => SubOption::Deregister(Default::default()),
            SubCommand::Revisions => SubOption::Revisions(Default::default()),
            SubCommand::Wait => SubOption::Wait(Default::default()),
            SubCommand::Init => SubOption::Init(Default::default()),
            SubCommand::Diff => SubOption::Diff(Default::default()),
            SubCommand::Appspec => SubOption::Appspec(Default::default()),
            SubCommand::Verify => SubOption::Verify(Default::default()),
            SubCommand::Render => SubOption::Render(Default::default()),
            SubCommand::Tasks => SubOption::Tasks(Default::default()),
            SubCommand::Exec => SubOption::Exec(Default::default()),
            SubCommand::Version => SubOption::Version(Default::default()),
        }
    }

    pub fn sub_command(&self) -> SubCommand {
        match self {
            SubOption::Status(_) => SubCommand::Status,
            SubOption::Deploy(_) => SubCommand::Deploy,
            SubOption::Scale(_) => SubCommand::Scale,
            SubOption::Refresh(_) => SubCommand::Refresh,
            SubOption::Create(_) => SubCommand::Create,
            SubOption::Rollback(_) => SubCommand::Rollback,
            SubOption::Delete(_) => SubCommand::Delete,
            SubOption::Run(_) => SubCommand::Run,
            SubOption::Register(_) => SubCommand::Register,
            SubOption::Deregister(_) => SubCommand::Deregister,
            SubOption::Revisions(_) => SubCommand::Revisions,
            SubOption::Wait(_) => SubCommand::Wait,
            SubOption::Init(_) => SubCommand::Init,
            SubOption::Diff(_) => SubCommand::Diff,
            SubOption::Appspec(_) => SubCommand::Appspec,
            SubOption::Verify(_) => SubCommand::Verify,
            SubOption::Render(_) => SubCommand::Render,
            SubOption::Tasks(_) => SubCommand::Tasks,
            SubOption::Exec(_) => SubCommand::Exec,
            SubOption::Version(_) => SubCommand::Version,
        }
    }

    pub fn record(&self) -> &dyn OptionRecord {
        match self {
            SubOption::Status(o) => o,
            SubOption::Deploy(o) | SubOption::Scale(o) | SubOption::Refresh(o) => o,
            SubOption::Create(o) => o,
            SubOption::Rollback(o) => o,
            SubOption::Delete(o) => o,
            SubOption::Run(o) => o,
            SubOption::Register(o) => o,
            SubOption::Deregister(o) => o,
            SubOption::Revisions(o) => o,
            SubOption::Wait(o) => o,
            SubOption::Init(o) => o,
            SubOption::Diff(o) => o,
            SubOption::Appspec(o) => o,
            SubOption::Verify(o) => o,
            SubOption::Render(o) => o,
            SubOption::Tasks(o) => o,
            SubOption::Exec(o) => o,
            SubOption::Version(o) => o,
        }
    }

    pub fn record_mut(&mut self) -> &mut dyn OptionRecord {
        match self {
            SubOption::Status(o) => o,
            SubOption::Deploy(o) | SubOption::Scale(o) | SubOption::Refresh(o) => o,
            SubOption::Create(o) => o,
            SubOption::Rollback(o) => o,
            SubOption::Delete(o) => o,
            SubOption::Run(o) => o,
            SubOption::Register(o) => o,
            SubOption::Deregister(o) => o,
            SubOption::Revisions(o) => o,
            SubOption::Wait(o) => o,
            SubOption::Init(o) => o,
            SubOption::Diff(o) => o,
            SubOption::Appspec(o) => o,
            SubOption::Verify(o) => o,
            SubOption::Render(o) => o,
            SubOption::Tasks(o) => o,
            SubOption::Exec(o) => o,
            SubOption::Version(o) => o,
        }
    }
}

/// Options accepted by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlobalOption {
    pub config_file_path: String,
    pub debug: bool,
    pub envfiles: Vec<PathBuf>,
    pub ext_str: BTreeMap<String, String>,
    pub ext_code: BTreeMap<String, String>,
    pub timeout: Option<Duration>,
    pub log_format: String,
    /// Resolved `init` options; present only when the subcommand is `init`.
    pub init: Option<InitOption>,
}

impl Default for GlobalOption {
    fn default() -> Self {
        Self {
            config_file_path: super::DEFAULT_CONFIG_FILE.to_string(),
            debug: false,
            envfiles: Vec::new(),
            ext_str: BTreeMap::new(),
            ext_code: BTreeMap::new(),
            timeout: None,
            log_format: "text".to_string(),
            init: None,
        }
    }
}

/// Fully resolved command line: global options plus the selected
/// subcommand's record with every default applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CliOptions {
    pub sub_command: SubCommand,
    pub global: GlobalOption,
    pub(crate) option: SubOption,
}

impl CliOptions {
    /// Resolved record for the subcommand named `name`.
    ///
    /// A pure projection of the resolved state: returns `None` when `name`
    /// is not the subcommand that was parsed.
    pub fn for_sub_command(&self, name: &str) -> Option<&SubOption> {
        let sub = name.parse::<SubCommand>().ok()?;
        (sub == self.sub_command).then_some(&self.option)
    }

    /// Resolved record for the parsed subcommand.
    pub fn option(&self) -> &SubOption {
        &self.option
    }
}
