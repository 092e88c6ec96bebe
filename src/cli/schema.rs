//! Schema registry primitives: field specs, value kinds, and typed slots.
//!
//! Every subcommand option record is declared with [`option_record!`], which
//! generates the record struct (all fields `Option<T>`) together with its
//! static field table. The table drives both the clap command and the
//! default resolver, so the shape of a record is declared exactly once.

use std::fmt;

/// Kind of value a flag carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Str,
    Int32,
    Int64,
    /// Repeated `--flag key=value`, accumulated into a map.
    Map,
    /// Repeated `--flag value`, accumulated into a list.
    Repeated,
    /// Ordered positional arguments; at least one is required.
    Positional,
}

/// One declared option field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name in the option record.
    pub name: &'static str,
    /// Long flag spelling, without the leading `--`.
    pub flag: &'static str,
    /// Additional long spellings.
    pub aliases: &'static [&'static str],
    /// Explicit negation spelling for a boolean field. When absent, a
    /// `no-<flag>` spelling is derived if the field's default is `true`.
    pub negation: Option<&'static str>,
    pub kind: ValueKind,
    /// Environment variable consulted before the profile default.
    pub env: Option<&'static str>,
    pub help: &'static str,
}

/// A default value carried by a profile entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue {
    Bool(bool),
    Str(&'static str),
    Int32(i32),
    Int64(i64),
}

impl FieldValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            FieldValue::Bool(_) => ValueKind::Bool,
            FieldValue::Str(_) => ValueKind::Str,
            FieldValue::Int32(_) => ValueKind::Int32,
            FieldValue::Int64(_) => ValueKind::Int64,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(v) => write!(f, "{}", v),
            FieldValue::Str(v) => write!(f, "{:?}", v),
            FieldValue::Int32(v) => write!(f, "{}", v),
            FieldValue::Int64(v) => write!(f, "{}", v),
        }
    }
}

/// Mutable view of one record field.
#[derive(Debug)]
pub enum Slot<'a> {
    Bool(&'a mut Option<bool>),
    Str(&'a mut Option<String>),
    Int32(&'a mut Option<i32>),
    Int64(&'a mut Option<i64>),
    Strings(&'a mut Option<Vec<String>>),
}

impl Slot<'_> {
    pub fn is_set(&self) -> bool {
        match self {
            Slot::Bool(v) => v.is_some(),
            Slot::Str(v) => v.is_some(),
            Slot::Int32(v) => v.is_some(),
            Slot::Int64(v) => v.is_some(),
            Slot::Strings(v) => v.is_some(),
        }
    }

    /// Write `value` into the slot. Returns `false` when the kinds differ.
    pub fn fill(self, value: FieldValue) -> bool {
        match (self, value) {
            (Slot::Bool(slot), FieldValue::Bool(v)) => *slot = Some(v),
            (Slot::Str(slot), FieldValue::Str(v)) => *slot = Some(v.to_string()),
            (Slot::Int32(slot), FieldValue::Int32(v)) => *slot = Some(v),
            (Slot::Int64(slot), FieldValue::Int64(v)) => *slot = Some(v),
            _ => return false,
        }
        true
    }

    /// Write an environment-provided string. Only string fields take env fallbacks.
    pub fn fill_str(self, value: String) -> bool {
        match self {
            Slot::Str(slot) => {
                *slot = Some(value);
                true
            }
            _ => false,
        }
    }
}

/// Rust types allowed as option record fields.
pub trait FieldType: Sized {
    const KIND: ValueKind;

    fn slot(value: &mut Option<Self>) -> Slot<'_>;
}

impl FieldType for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn slot(value: &mut Option<Self>) -> Slot<'_> {
        Slot::Bool(value)
    }
}

impl FieldType for String {
    const KIND: ValueKind = ValueKind::Str;

    fn slot(value: &mut Option<Self>) -> Slot<'_> {
        Slot::Str(value)
    }
}

impl FieldType for i32 {
    const KIND: ValueKind = ValueKind::Int32;

    fn slot(value: &mut Option<Self>) -> Slot<'_> {
        Slot::Int32(value)
    }
}

impl FieldType for i64 {
    const KIND: ValueKind = ValueKind::Int64;

    fn slot(value: &mut Option<Self>) -> Slot<'_> {
        Slot::Int64(value)
    }
}

impl FieldType for Vec<String> {
    const KIND: ValueKind = ValueKind::Positional;

    fn slot(value: &mut Option<Self>) -> Slot<'_> {
        Slot::Strings(value)
    }
}

/// Object-safe access to an option record's fields.
pub trait OptionRecord {
    fn fields(&self) -> &'static [FieldSpec];

    /// Slot for the named field, or `None` if the record has no such field.
    fn slot(&mut self, name: &str) -> Option<Slot<'_>>;
}

#[doc(hidden)]
#[macro_export]
macro_rules! __opt_literal {
    () => {
        None
    };
    ($lit:literal) => {
        Some($lit)
    };
}

/// Declare an option record and its field table.
///
/// ```ignore
/// option_record! {
///     pub struct StatusOption {
///         /// Number of events to show
///         events: i32 => "events";
///     }
/// }
/// ```
///
/// Each field accepts optional `alias = "..."`, `negation = "..."` and
/// `env = "..."` clauses after the flag spelling.
macro_rules! option_record {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(
                #[doc = $doc:literal]
                $field:ident : $ty:ty => $flag:literal
                    $(, alias = $alias:literal)*
                    $(, negation = $neg:literal)?
                    $(, env = $env:literal)?
                ;
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
        pub struct $name {
            $(
                #[doc = $doc]
                pub $field: Option<$ty>,
            )*
        }

        impl $name {
            pub const FIELDS: &'static [$crate::cli::schema::FieldSpec] = &[
                $(
                    $crate::cli::schema::FieldSpec {
                        name: stringify!($field),
                        flag: $flag,
                        aliases: &[$($alias),*],
                        negation: $crate::__opt_literal!($($neg)?),
                        kind: <$ty as $crate::cli::schema::FieldType>::KIND,
                        env: $crate::__opt_literal!($($env)?),
                        help: $doc,
                    },
                )*
            ];
        }

        impl $crate::cli::schema::OptionRecord for $name {
            fn fields(&self) -> &'static [$crate::cli::schema::FieldSpec] {
                Self::FIELDS
            }

            #[allow(unused_variables)]
            fn slot(&mut self, name: &str) -> Option<$crate::cli::schema::Slot<'_>> {
                $(
                    if name == stringify!($field) {
                        return Some(<$ty as $crate::cli::schema::FieldType>::slot(&mut self.$field));
                    }
                )*
                None
            }
        }
    };
}

pub(crate) use option_record;
