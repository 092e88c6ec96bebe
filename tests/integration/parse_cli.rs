//! Parse-and-resolve fixtures: every subcommand with and without flags.

use ecsdeploy::cli::{
    parse_options, AppSpecOption, CliOptions, CreateOption, DeleteOption, DeployOption, DeregisterOption,
    DiffOption, ExecOption, InitOption, ProcessEnv, Registry, RegisterOption, RenderOption,
    RevisionsOption, RollbackOption, RunOption, StatusOption, SubCommand, SubOption, TasksOption,
    VerifyOption, VersionOption, WaitOption,
};
use ecsdeploy::error::{CliError, ParseError};
use std::collections::BTreeMap;
use std::fs;
use tempfile::TempDir;

fn no_env(_: &str) -> Option<String> {
    None
}

fn parse(args: &[&str]) -> CliOptions {
    parse_options(args.iter().copied(), &no_env)
        .unwrap_or_else(|e| panic!("{:?}: {}", args, e))
}

fn s(v: &str) -> Option<String> {
    Some(v.to_string())
}

fn init_record(config: &str) -> InitOption {
    InitOption {
        region: s(""),
        cluster: s("default"),
        service: s("myservice"),
        task_definition_path: s("ecs-task-def.json"),
        service_definition_path: s("ecs-service-def.json"),
        force_overwrite: Some(false),
        jsonnet: Some(false),
        config_file_path: s(config),
    }
}

fn deploy_defaults() -> DeployOption {
    DeployOption {
        dry_run: Some(false),
        desired_count: Some(-1),
        skip_task_definition: Some(false),
        force_new_deployment: Some(false),
        no_wait: Some(false),
        suspend_auto_scaling: None,
        rollback_events: s(""),
        update_service: Some(true),
        latest_task_definition: Some(false),
    }
}

fn fixtures() -> Vec<(Vec<&'static str>, SubOption)> {
    let run_defaults = RunOption {
        dry_run: Some(false),
        task_definition: s(""),
        no_wait: Some(false),
        count: Some(1),
        watch_container: s(""),
        propagate_tags: s(""),
        task_override_str: s(""),
        task_override_file: s(""),
        skip_task_definition: Some(false),
        latest_task_definition: Some(false),
        tags: s(""),
        wait_until: s("stopped"),
        revision: Some(0),
    };

    vec![
        (vec!["status"], SubOption::Status(StatusOption { events: Some(2) })),
        (
            vec!["status", "--events=10"],
            SubOption::Status(StatusOption { events: Some(10) }),
        ),
        (
            vec!["status", "--events", "10"],
            SubOption::Status(StatusOption { events: Some(10) }),
        ),
        (vec!["deploy"], SubOption::Deploy(deploy_defaults())),
        (
            vec![
                "deploy",
                "--dry-run",
                "--tasks=10",
                "--skip-task-definition",
                "--force-new-deployment",
                "--no-wait",
                "--latest-task-definition",
            ],
            SubOption::Deploy(DeployOption {
                dry_run: Some(true),
                desired_count: Some(10),
                skip_task_definition: Some(true),
                force_new_deployment: Some(true),
                no_wait: Some(true),
                latest_task_definition: Some(true),
                ..deploy_defaults()
            }),
        ),
        (
            vec!["deploy", "--resume-auto-scaling"],
            SubOption::Deploy(DeployOption {
                suspend_auto_scaling: Some(false),
                ..deploy_defaults()
            }),
        ),
        (
            vec!["deploy", "--suspend-auto-scaling"],
            SubOption::Deploy(DeployOption {
                suspend_auto_scaling: Some(true),
                ..deploy_defaults()
            }),
        ),
        (
            vec!["scale"],
            SubOption::Scale(DeployOption {
                dry_run: Some(false),
                desired_count: Some(-1),
                skip_task_definition: Some(true),
                force_new_deployment: Some(false),
                no_wait: Some(false),
                suspend_auto_scaling: None,
                rollback_events: None,
                update_service: Some(false),
                latest_task_definition: Some(false),
            }),
        ),
        (
            vec!["create"],
            SubOption::Create(CreateOption {
                dry_run: Some(false),
                desired_count: Some(-1),
                no_wait: Some(false),
            }),
        ),
        (
            vec!["create", "--dry-run", "--tasks", "3", "--no-wait"],
            SubOption::Create(CreateOption {
                dry_run: Some(true),
                desired_count: Some(3),
                no_wait: Some(true),
            }),
        ),
        (vec!["version"], SubOption::Version(VersionOption {})),
        (
            vec!["scale", "--tasks=5"],
            SubOption::Scale(DeployOption {
                dry_run: Some(false),
                desired_count: Some(5),
                skip_task_definition: Some(true),
                force_new_deployment: Some(false),
                no_wait: Some(false),
                suspend_auto_scaling: None,
                rollback_events: None,
                update_service: Some(false),
                latest_task_definition: Some(false),
            }),
        ),
        (
            vec!["refresh"],
            SubOption::Refresh(DeployOption {
                dry_run: Some(false),
                desired_count: None,
                skip_task_definition: Some(true),
                force_new_deployment: Some(true),
                no_wait: Some(false),
                suspend_auto_scaling: None,
                rollback_events: None,
                update_service: Some(false),
                latest_task_definition: Some(false),
            }),
        ),
        (
            vec!["rollback"],
            SubOption::Rollback(RollbackOption {
                dry_run: Some(false),
                deregister_task_definition: Some(true),
                no_wait: Some(false),
                rollback_events: s(""),
            }),
        ),
        (
            vec!["rollback", "--no-deregister-task-definition"],
            SubOption::Rollback(RollbackOption {
                dry_run: Some(false),
                deregister_task_definition: Some(false),
                no_wait: Some(false),
                rollback_events: s(""),
            }),
        ),
        (
            vec!["delete"],
            SubOption::Delete(DeleteOption {
                dry_run: Some(false),
                force: Some(false),
            }),
        ),
        (
            vec!["delete", "--force"],
            SubOption::Delete(DeleteOption {
                dry_run: Some(false),
                force: Some(true),
            }),
        ),
        (vec!["run"], SubOption::Run(run_defaults.clone())),
        (
            vec![
                "run",
                "--task-def=foo.json",
                "--count",
                "2",
                "--watch-container",
                "app",
                "--propagate-tags",
                "SERVICE",
                "--overrides",
                r#"{"foo":"bar"}"#,
                "--overrides-file",
                "overrides.json",
                "--latest-task-definition",
                "--tags",
                "KeyFoo=ValueFoo,KeyBar=ValueBar",
                "--wait-until",
                "running",
                "--revision",
                "1",
            ],
            SubOption::Run(RunOption {
                task_definition: s("foo.json"),
                count: Some(2),
                watch_container: s("app"),
                propagate_tags: s("SERVICE"),
                task_override_str: s(r#"{"foo":"bar"}"#),
                task_override_file: s("overrides.json"),
                latest_task_definition: Some(true),
                tags: s("KeyFoo=ValueFoo,KeyBar=ValueBar"),
                wait_until: s("running"),
                revision: Some(1),
                ..run_defaults
            }),
        ),
        (
            vec!["register"],
            SubOption::Register(RegisterOption {
                dry_run: Some(false),
                output: Some(false),
            }),
        ),
        (
            vec!["register", "--output", "--dry-run"],
            SubOption::Register(RegisterOption {
                dry_run: Some(true),
                output: Some(true),
            }),
        ),
        (
            vec!["deregister"],
            SubOption::Deregister(DeregisterOption {
                dry_run: Some(false),
                revision: Some(0),
                keeps: Some(0),
                force: Some(false),
            }),
        ),
        (
            vec![
                "deregister",
                "--dry-run",
                "--revision",
                "123",
                "--keeps",
                "23",
                "--force",
            ],
            SubOption::Deregister(DeregisterOption {
                dry_run: Some(true),
                revision: Some(123),
                keeps: Some(23),
                force: Some(true),
            }),
        ),
        (
            vec!["revisions"],
            SubOption::Revisions(RevisionsOption {
                revision: Some(0),
                output: s("table"),
            }),
        ),
        (
            vec!["revisions", "--revision", "123", "--output", "json"],
            SubOption::Revisions(RevisionsOption {
                revision: Some(123),
                output: s("json"),
            }),
        ),
        (vec!["wait"], SubOption::Wait(WaitOption {})),
        (
            vec!["init", "--service", "myservice", "--config", "myconfig.yml"],
            SubOption::Init(init_record("myconfig.yml")),
        ),
        (
            vec![
                "init",
                "--service",
                "myservice",
                "--config",
                "myconfig.jsonnet",
                "--cluster",
                "mycluster",
                "--task-definition-path",
                "taskdef.jsonnet",
                "--service-definition-path",
                "servicedef.jsonnet",
                "--force-overwrite",
                "--jsonnet",
            ],
            SubOption::Init(InitOption {
                cluster: s("mycluster"),
                task_definition_path: s("taskdef.jsonnet"),
                service_definition_path: s("servicedef.jsonnet"),
                force_overwrite: Some(true),
                jsonnet: Some(true),
                ..init_record("myconfig.jsonnet")
            }),
        ),
        (
            vec!["diff"],
            SubOption::Diff(DiffOption {
                unified: Some(true),
            }),
        ),
        (
            vec!["diff", "--no-unified"],
            SubOption::Diff(DiffOption {
                unified: Some(false),
            }),
        ),
        (
            vec!["appspec"],
            SubOption::Appspec(AppSpecOption {
                task_definition: s("latest"),
                update_service: Some(true),
            }),
        ),
        (
            vec![
                "appspec",
                "--task-definition",
                "current",
                "--no-update-service",
            ],
            SubOption::Appspec(AppSpecOption {
                task_definition: s("current"),
                update_service: Some(false),
            }),
        ),
        (
            vec!["verify"],
            SubOption::Verify(VerifyOption {
                get_secrets: Some(true),
                put_logs: Some(true),
            }),
        ),
        (
            vec!["verify", "--no-get-secrets", "--no-put-logs"],
            SubOption::Verify(VerifyOption {
                get_secrets: Some(false),
                put_logs: Some(false),
            }),
        ),
        (
            vec!["render", "config", "taskdef", "servicedef"],
            SubOption::Render(RenderOption {
                targets: Some(vec![
                    "config".to_string(),
                    "taskdef".to_string(),
                    "servicedef".to_string(),
                ]),
            }),
        ),
        (
            vec!["tasks"],
            SubOption::Tasks(TasksOption {
                id: s(""),
                output: s("table"),
                find: Some(false),
                stop: Some(false),
                force: Some(false),
                trace: Some(false),
            }),
        ),
        (
            vec![
                "tasks", "--id", "abcdefff", "--output", "json", "--find", "--stop", "--force",
                "--trace",
            ],
            SubOption::Tasks(TasksOption {
                id: s("abcdefff"),
                output: s("json"),
                find: Some(true),
                stop: Some(true),
                force: Some(true),
                trace: Some(true),
            }),
        ),
        (
            vec!["exec"],
            SubOption::Exec(ExecOption {
                id: s(""),
                command: s("sh"),
                container: s(""),
                local_port: Some(0),
                port: Some(0),
                port_forward: Some(false),
            }),
        ),
        (
            vec![
                "exec",
                "--id",
                "abcdefff",
                "--command",
                "ls -la",
                "--container",
                "mycontainer",
                "--local-port",
                "8080",
                "--port",
                "80",
                "--port-forward",
            ],
            SubOption::Exec(ExecOption {
                id: s("abcdefff"),
                command: s("ls -la"),
                container: s("mycontainer"),
                local_port: Some(8080),
                port: Some(80),
                port_forward: Some(true),
            }),
        ),
    ]
}

#[test]
fn test_fixture_table() {
    for (args, expected) in fixtures() {
        let opts = parse(&args);
        let name = expected.sub_command().name();
        assert_eq!(opts.sub_command, expected.sub_command(), "{:?}", args);
        assert_eq!(opts.for_sub_command(name), Some(&expected), "{:?}", args);
    }
}

#[test]
fn test_every_subcommand_has_a_zero_flag_fixture() {
    let table = fixtures();
    // init has no valid zero-flag form: --service must be given.
    for sub in SubCommand::ALL.into_iter().filter(|sub| *sub != SubCommand::Init) {
        let mut bare = vec![sub.name()];
        if sub == SubCommand::Render {
            bare.extend(["config", "taskdef", "servicedef"]);
        }
        assert!(
            table.iter().any(|(args, _)| *args == bare),
            "no default fixture for {}",
            sub
        );
    }
}

#[test]
fn test_accessor_matches_direct_parse() {
    let registry = Registry::new().unwrap();
    for (args, _) in fixtures() {
        let direct = registry.parse(args.iter().copied()).unwrap();
        let direct = registry.resolve(direct, &no_env);
        let opts = parse(&args);
        assert_eq!(
            opts.for_sub_command(opts.sub_command.name()),
            Some(direct.option()),
            "{:?}",
            args
        );
    }
}

#[test]
fn test_accessor_is_a_projection_for_the_parsed_subcommand_only() {
    let opts = parse(&["status"]);
    assert!(opts.for_sub_command("deploy").is_none());
    assert!(opts.for_sub_command("nonexistent").is_none());
}

#[test]
fn test_global_options_with_envfile() {
    let dir = TempDir::new().unwrap();
    let envfile = dir.path().join("envfile");
    fs::write(&envfile, "ECSDEPLOY_PARSE_CLI_TEST=ok\n").unwrap();
    let envfile_arg = envfile.to_str().unwrap();

    let opts = parse_options(
        [
            "status",
            "--config",
            "config.yml",
            "--debug",
            "--envfile",
            envfile_arg,
            "--ext-str",
            "s1=v1",
            "--ext-str",
            "s2=v2",
            "--ext-code",
            "c1=123",
            "--ext-code",
            "c2=1+2",
        ],
        &ProcessEnv,
    )
    .unwrap();

    assert_eq!(opts.global.config_file_path, "config.yml");
    assert!(opts.global.debug);
    assert_eq!(
        opts.global.ext_str,
        BTreeMap::from([
            ("s1".to_string(), "v1".to_string()),
            ("s2".to_string(), "v2".to_string()),
        ])
    );
    assert_eq!(
        opts.global.ext_code,
        BTreeMap::from([
            ("c1".to_string(), "123".to_string()),
            ("c2".to_string(), "1+2".to_string()),
        ])
    );
    assert_eq!(opts.global.init, None);
    assert_eq!(
        opts.option(),
        &SubOption::Status(StatusOption { events: Some(2) })
    );
    assert_eq!(
        std::env::var("ECSDEPLOY_PARSE_CLI_TEST").as_deref(),
        Ok("ok")
    );
}

#[test]
fn test_global_options_before_subcommand() {
    let opts = parse(&["--config", "config.yml", "--debug", "status", "--events=10"]);
    assert_eq!(opts.global.config_file_path, "config.yml");
    assert!(opts.global.debug);
    assert!(opts.global.ext_str.is_empty());
    assert!(opts.global.ext_code.is_empty());
    assert_eq!(
        opts.option(),
        &SubOption::Status(StatusOption { events: Some(10) })
    );
}

#[test]
fn test_init_attached_to_global() {
    let opts = parse(&["init", "--service", "myservice", "--config", "myconfig.yml"]);
    assert_eq!(opts.sub_command, SubCommand::Init);
    assert_eq!(opts.global.config_file_path, "myconfig.yml");
    assert!(!opts.global.debug);
    assert_eq!(opts.global.init, Some(init_record("myconfig.yml")));
}

#[test]
fn test_region_default_from_environment() {
    let env = |key: &str| (key == "AWS_REGION").then(|| "us-west-2".to_string());
    let opts = parse_options(["init", "--service", "myservice"], &env).unwrap();
    let Some(SubOption::Init(init)) = opts.for_sub_command("init") else {
        panic!("expected init options");
    };
    assert_eq!(init.region.as_deref(), Some("us-west-2"));
}

#[test]
fn test_parse_errors_stop_before_resolution() {
    for args in [
        &["deploy2"][..],
        &["status", "--unknown"],
        &["status", "--events", "many"],
        &["render"],
        &[],
    ] {
        let err = parse_options(args.iter().copied(), &no_env).unwrap_err();
        assert!(
            matches!(err, CliError::Parse(ParseError::Usage(_))),
            "{:?}: {:?}",
            args,
            err
        );
    }
}

#[test]
fn test_validation_runs_after_defaulting() {
    let err = parse_options(["init"], &no_env).unwrap_err();
    assert!(matches!(err, CliError::Validation(_)));

    let err = parse_options(["tasks", "--output", "yaml"], &no_env).unwrap_err();
    assert!(matches!(err, CliError::Validation(_)));
}

#[test]
fn test_missing_envfile_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.env");
    let err = parse_options(
        ["status", "--envfile", missing.to_str().unwrap()],
        &no_env,
    )
    .unwrap_err();
    assert!(matches!(err, CliError::EnvFile(_)));
}
