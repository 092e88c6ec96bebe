//! CLI parse: raw token list to raw option records. No defaulting happens
//! here; every subcommand field not named on the command line stays absent.

use super::options::{GlobalOption, SubCommand, SubOption};
use super::registry::{
    negation_id, Entry, Registry, GLOBAL_CONFIG, GLOBAL_DEBUG, GLOBAL_ENVFILE, GLOBAL_EXT_CODE,
    GLOBAL_EXT_STR, GLOBAL_LOG_FORMAT, GLOBAL_TIMEOUT,
};
use super::schema::{OptionRecord, Slot};
use crate::error::ParseError;
use clap::ArgMatches;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

/// Parser output: the subcommand, its global options, and the raw record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCli {
    pub sub_command: SubCommand,
    pub global: GlobalOption,
    pub option: SubOption,
}

impl Registry {
    /// Parse the post-program-name token list.
    pub fn parse<I, T>(&self, args: I) -> Result<ParsedCli, ParseError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let argv = std::iter::once(OsString::from(super::BIN_NAME))
            .chain(args.into_iter().map(Into::into));
        let matches = self.command().try_get_matches_from(argv)?;

        let (name, sub_matches) = matches
            .subcommand()
            .ok_or(ParseError::MissingSubcommand)?;
        let sub_command: SubCommand = name.parse().map_err(ParseError::UnknownSubcommand)?;
        let entry = self
            .entry(sub_command)
            .ok_or_else(|| ParseError::UnknownSubcommand(name.to_string()))?;

        let global = decode_global(&matches, sub_matches);

        let mut option = SubOption::empty(sub_command);
        decode_fields(entry, sub_matches, option.record_mut());

        tracing::trace!(subcommand = %sub_command, "parsed command line");
        Ok(ParsedCli {
            sub_command,
            global,
            option,
        })
    }
}

/// Scalar globals are propagated by clap, so the subcommand's matches hold
/// the last occurrence. Repeated globals are read from the root first, then
/// the subcommand, which is command-line order.
fn decode_global(root: &ArgMatches, matches: &ArgMatches) -> GlobalOption {
    let defaults = GlobalOption::default();
    GlobalOption {
        config_file_path: matches
            .get_one::<String>(GLOBAL_CONFIG)
            .cloned()
            .unwrap_or(defaults.config_file_path),
        debug: matches.get_one::<bool>(GLOBAL_DEBUG).copied().unwrap_or(false),
        envfiles: [root, matches]
            .into_iter()
            .filter_map(|m| m.get_many::<PathBuf>(GLOBAL_ENVFILE))
            .flatten()
            .cloned()
            .collect(),
        ext_str: collect_map(root, matches, GLOBAL_EXT_STR),
        ext_code: collect_map(root, matches, GLOBAL_EXT_CODE),
        timeout: matches
            .get_one::<i64>(GLOBAL_TIMEOUT)
            .map(|secs| Duration::from_secs(*secs as u64)),
        log_format: matches
            .get_one::<String>(GLOBAL_LOG_FORMAT)
            .cloned()
            .unwrap_or(defaults.log_format),
        init: None,
    }
}

/// Repeated `key=value` flags in command-line order; a later key wins.
fn collect_map(root: &ArgMatches, matches: &ArgMatches, id: &str) -> BTreeMap<String, String> {
    [root, matches]
        .into_iter()
        .filter_map(|m| m.get_many::<(String, String)>(id))
        .flatten()
        .cloned()
        .collect()
}

fn decode_fields(entry: &Entry, matches: &ArgMatches, record: &mut dyn OptionRecord) {
    for field in entry.exposed_fields() {
        let negation = entry.negation(field).map(|_| negation_id(field));
        let Some(slot) = record.slot(field.name) else {
            continue;
        };
        match slot {
            Slot::Bool(value) => {
                // Positive and negated spellings override each other, so at
                // most one of them is present.
                if let Some(v) = matches.get_one::<bool>(field.name) {
                    *value = Some(*v);
                }
                if let Some(id) = negation {
                    if let Some(v) = matches.get_one::<bool>(&id) {
                        *value = Some(!*v);
                    }
                }
            }
            Slot::Str(value) => {
                if let Some(v) = matches.get_one::<String>(field.name) {
                    *value = Some(v.clone());
                }
            }
            Slot::Int32(value) => {
                if let Some(v) = matches.get_one::<i32>(field.name) {
                    *value = Some(*v);
                }
            }
            Slot::Int64(value) => {
                if let Some(v) = matches.get_one::<i64>(field.name) {
                    *value = Some(*v);
                }
            }
            Slot::Strings(value) => {
                if let Some(v) = matches.get_many::<String>(field.name) {
                    *value = Some(v.cloned().collect());
                }
            }
        }
    }
}
