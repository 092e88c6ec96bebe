//! Default resolver: fills every absent field of a parsed record from the
//! subcommand's default profile.
//!
//! Precedence per field: command line, then the field's environment
//! variable (if it declares one), then the profile entry.

use super::options::{CliOptions, SubOption};
use super::parse::ParsedCli;
use super::profile::DefaultEntry;
use super::registry::{Entry, Registry};
use super::schema::{FieldValue, OptionRecord};
use tracing::debug;

/// Source of environment-backed defaults.
pub trait EnvLookup {
    fn var(&self, key: &str) -> Option<String>;
}

impl<F> EnvLookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn var(&self, key: &str) -> Option<String> {
        self(key)
    }
}

/// Reads the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

enum Fill {
    Value(FieldValue),
    Text(String),
}

impl Registry {
    /// Apply the default profile of the parsed subcommand.
    ///
    /// Must run after env files are loaded so env-backed defaults see them.
    pub fn resolve(&self, parsed: ParsedCli, env: &dyn EnvLookup) -> CliOptions {
        let ParsedCli {
            sub_command,
            mut global,
            mut option,
        } = parsed;

        if let Some(entry) = self.entry(sub_command) {
            apply_defaults(entry, &global.config_file_path, option.record_mut(), env);
        }
        if let SubOption::Init(init) = &option {
            global.init = Some(init.clone());
        }

        CliOptions {
            sub_command,
            global,
            option,
        }
    }
}

fn apply_defaults(
    entry: &Entry,
    config_file_path: &str,
    record: &mut dyn OptionRecord,
    env: &dyn EnvLookup,
) {
    let command = entry.spec.sub.name();
    for field in entry.spec.fields {
        let fill = match record.slot(field.name) {
            Some(slot) if !slot.is_set() => {
                if let Some(value) = field.env.and_then(|key| env.var(key)) {
                    debug!(command, field = field.name, "default taken from environment");
                    Some(Fill::Text(value))
                } else {
                    match entry.profile.get(field.name) {
                        Some(DefaultEntry::Value(value)) => Some(Fill::Value(value)),
                        Some(DefaultEntry::GlobalConfigPath) => {
                            Some(Fill::Text(config_file_path.to_string()))
                        }
                        Some(DefaultEntry::Absent) | None => None,
                    }
                }
            }
            _ => None,
        };
        let Some(fill) = fill else {
            continue;
        };
        if let Some(slot) = record.slot(field.name) {
            let filled = match fill {
                Fill::Value(value) => slot.fill(value),
                Fill::Text(text) => slot.fill_str(text),
            };
            debug_assert!(filled, "{}.{}: default kind checked at registry build", command, field.name);
        }
    }
}
