//! Property-based tests for parse and resolve

use ecsdeploy::cli::{parse_options, profile, CliOptions, DefaultEntry, Registry, SubCommand};
use ecsdeploy::cli::schema::{FieldValue, OptionRecord, Slot, ValueKind};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn no_env(_: &str) -> Option<String> {
    None
}

fn parse(args: &[String]) -> CliOptions {
    parse_options(args.iter().cloned(), &no_env).unwrap()
}

fn key() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,6}"
}

fn value() -> impl Strategy<Value = String> {
    "[A-Za-z0-9+=:._-]{0,12}"
}

/// Boolean fields exposed by a subcommand whose default is `true`.
fn true_default_bools(sub: SubCommand) -> Vec<(&'static str, String)> {
    let registry = Registry::new().unwrap();
    let entry = registry.entry(sub).unwrap();
    entry
        .exposed_fields()
        .filter(|field| field.kind == ValueKind::Bool)
        .filter(|field| {
            entry.profile.get(field.name) == Some(DefaultEntry::Value(FieldValue::Bool(true)))
        })
        .filter_map(|field| entry.negation(field).map(|neg| (field.name, neg)))
        .collect()
}

/// Minimal valid command line for `sub`.
fn base_args(sub: SubCommand) -> Vec<String> {
    let mut args = vec![sub.name().to_string()];
    match sub {
        SubCommand::Init => args.extend(["--service".to_string(), "web".to_string()]),
        SubCommand::Render => args.push("config".to_string()),
        _ => {}
    }
    args
}

fn field_value(opts: &CliOptions, name: &str) -> String {
    let mut option = opts.option().clone();
    let record: &mut dyn OptionRecord = option.record_mut();
    match record.slot(name) {
        Some(Slot::Bool(v)) => format!("{:?}", v),
        Some(Slot::Str(v)) => format!("{:?}", v),
        Some(Slot::Int32(v)) => format!("{:?}", v),
        Some(Slot::Int64(v)) => format!("{:?}", v),
        Some(Slot::Strings(v)) => format!("{:?}", v),
        None => "<none>".to_string(),
    }
}

proptest! {
    #[test]
    fn test_parse_is_idempotent(
        events in 0i32..100,
        pairs in proptest::collection::vec((key(), value()), 0..5),
        debug in any::<bool>(),
    ) {
        let mut args = vec!["status".to_string(), format!("--events={}", events)];
        if debug {
            args.push("--debug".to_string());
        }
        for (k, v) in &pairs {
            args.push("--ext-str".to_string());
            args.push(format!("{}={}", k, v));
        }
        prop_assert_eq!(parse(&args), parse(&args));
    }

    #[test]
    fn test_ext_maps_accumulate_last_wins(
        str_pairs in proptest::collection::vec((key(), value()), 0..8),
        code_pairs in proptest::collection::vec((key(), value()), 0..8),
    ) {
        let mut args = Vec::new();
        for (k, v) in &str_pairs {
            args.push("--ext-str".to_string());
            args.push(format!("{}={}", k, v));
        }
        args.push("wait".to_string());
        for (k, v) in &code_pairs {
            args.push(format!("--ext-code={}={}", k, v));
        }

        let opts = parse(&args);
        let expected_str: BTreeMap<String, String> = str_pairs.into_iter().collect();
        let expected_code: BTreeMap<String, String> = code_pairs.into_iter().collect();
        prop_assert_eq!(opts.global.ext_str, expected_str);
        prop_assert_eq!(opts.global.ext_code, expected_code);
    }

    #[test]
    fn test_ext_maps_accumulate_across_subcommand_token(
        pairs in proptest::collection::vec((key(), value()), 0..10),
        split in 0usize..10,
        flag in prop::sample::select(vec!["--ext-str", "--ext-code"]),
    ) {
        let split = split.min(pairs.len());
        let mut args = Vec::new();
        for (i, (k, v)) in pairs.iter().enumerate() {
            if i == split {
                args.push("status".to_string());
            }
            args.push(flag.to_string());
            args.push(format!("{}={}", k, v));
        }
        if split == pairs.len() {
            args.push("status".to_string());
        }

        let opts = parse(&args);
        let expected: BTreeMap<String, String> = pairs.into_iter().collect();
        let actual = if flag == "--ext-str" {
            opts.global.ext_str
        } else {
            opts.global.ext_code
        };
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn test_negation_sets_only_its_field(index in 0usize..SubCommand::ALL.len()) {
        let sub = SubCommand::ALL[index];
        let baseline = parse(&base_args(sub));
        let names: Vec<&str> = profile(sub).entries.iter().map(|(name, _)| *name).collect();

        for (field, negation) in true_default_bools(sub) {
            let mut args = base_args(sub);
            args.push(format!("--{}", negation));
            let negated = parse(&args);
            for name in &names {
                let expected = if *name == field {
                    "Some(false)".to_string()
                } else {
                    field_value(&baseline, name)
                };
                prop_assert_eq!(field_value(&negated, name), expected, "{} --{}", sub, negation);
            }
        }
    }
}
