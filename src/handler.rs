// SPDX-License-Identifier: MIT OR Apache-2.0

//! The inner handler abstraction and the pieces shared by the bundled handlers.
//!
//! A [`Handler`] is where records finally go: it decides whether a level is enabled, formats
//! the record and writes it somewhere. [`ContextHandler`](crate::ContextHandler) wraps one
//! and only adds attributes; it never formats or writes anything itself.
//!
//! Three handlers are bundled:
//!
//! - [`TextHandler`](crate::TextHandler): `key=value` lines, the default provider writes these
//!   to standard output
//! - [`JsonHandler`](crate::JsonHandler): one JSON object per line
//! - [`InMemoryHandler`](crate::InMemoryHandler): text lines kept in memory, for tests

use crate::Level;
use crate::attr::{Attr, Value};
use crate::context::Context;
use crate::level::log_level;
use crate::log_record::LogRecord;
use chrono::SecondsFormat;
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use std::fmt::Debug;
use std::fmt::Write as _;
use std::sync::Arc;

/// Errors a handler may report from [`Handler::handle`].
///
/// The logging layer passes these through unchanged; it never retries or suppresses them.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum HandleError {
    #[error("failed to write log record: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode log record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("log record rejected: {0}")]
    Rejected(String),
}

/// Receives fully-formed log records.
///
/// Handlers are shared by reference between every logger derived from them and are called
/// concurrently, so implementations must be safe for concurrent use.
pub trait Handler: Debug + Send + Sync {
    /// Whether records at `level` should be built at all.
    fn enabled(&self, ctx: &Context, level: Level) -> bool;

    /// Formats and emits `record`.
    fn handle(&self, ctx: &Context, record: LogRecord) -> Result<(), HandleError>;

    /// Returns a handler that also emits `attrs` on every record, before the record's own
    /// attributes.
    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler>;

    /// Returns a handler that qualifies all later attribute keys with group `name`.
    fn with_group(&self, name: &str) -> Arc<dyn Handler>;
}

/// Options shared by the bundled handlers.
///
/// ```
/// use ctxlog::{HandlerOptions, Level};
///
/// let options = HandlerOptions {
///     level: Some(Level::Debug),
///     ..HandlerOptions::default()
/// };
/// assert_eq!(options.min_level(), Level::Debug);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandlerOptions {
    /// Minimum enabled level. `None` follows the process-wide [`log_level`].
    pub level: Option<Level>,
    /// Emit the call site of each record.
    pub add_source: bool,
    /// Leave out the timestamp, for reproducible output.
    pub omit_time: bool,
}

impl HandlerOptions {
    pub fn min_level(&self) -> Level {
        self.level.unwrap_or_else(log_level)
    }
}

/// An attribute added through `with_attrs`, remembered with the groups open at the time.
#[derive(Debug, Clone, PartialEq)]
struct ScopedAttr {
    groups: Vec<String>,
    attr: Attr,
}

/// The `with_attrs`/`with_group` state of a bundled handler.
///
/// Each derivation clones it, so handlers derived from a common ancestor never see each
/// other's attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Scope {
    attrs: Vec<ScopedAttr>,
    groups: Vec<String>,
}

impl Scope {
    pub(crate) fn with_attrs(&self, attrs: Vec<Attr>) -> Scope {
        let mut scope = self.clone();
        scope.attrs.extend(attrs.into_iter().map(|attr| ScopedAttr {
            groups: self.groups.clone(),
            attr,
        }));
        scope
    }

    pub(crate) fn with_group(&self, name: &str) -> Scope {
        let mut scope = self.clone();
        if !name.is_empty() {
            scope.groups.push(name.to_string());
        }
        scope
    }

    /// Renders `record` as a single `key=value` line, without the trailing newline.
    pub(crate) fn encode_text(&self, record: &LogRecord, options: &HandlerOptions) -> String {
        let mut line = String::new();
        if !options.omit_time {
            let time = record.time().to_rfc3339_opts(SecondsFormat::Millis, false);
            let _ = write!(line, "time={} ", time);
        }
        let _ = write!(line, "level={}", record.level());
        if options.add_source {
            if let Some(source) = record.source() {
                let _ = write!(line, " source={}", quote_if_needed(&source.to_string()));
            }
        }
        let _ = write!(line, " msg={}", quote_if_needed(record.message()));
        for scoped in &self.attrs {
            write_text_attr(&mut line, &group_prefix(&scoped.groups), &scoped.attr);
        }
        let prefix = group_prefix(&self.groups);
        for attr in record.attrs() {
            write_text_attr(&mut line, &prefix, attr);
        }
        line
    }

    /// Renders `record` as a JSON object.
    ///
    /// Keys are never overwritten: an attribute that repeats a built-in or an earlier key is
    /// written again, so the encoded object may carry the same key more than once.
    pub(crate) fn encode_json(&self, record: &LogRecord, options: &HandlerOptions) -> JsonFields {
        use serde_json::Value as Json;

        let mut object = JsonFields::default();
        if !options.omit_time {
            object.push(
                "time",
                Json::String(record.time().to_rfc3339_opts(SecondsFormat::Millis, false)),
            );
        }
        object.push("level", Json::String(record.level().to_string()));
        if options.add_source {
            if let Some(source) = record.source() {
                let mut src = serde_json::Map::new();
                src.insert("file".to_string(), Json::String(source.file.to_string()));
                src.insert("line".to_string(), Json::from(source.line));
                object.push("source", Json::Object(src));
            }
        }
        object.push("msg", Json::String(record.message().to_string()));
        for scoped in &self.attrs {
            insert_json_attr(object.groups(&scoped.groups), &scoped.attr);
        }
        if record.attrs().iter().any(|attr| !is_empty_attr(attr)) {
            let target = object.groups(&self.groups);
            for attr in record.attrs() {
                insert_json_attr(target, attr);
            }
        }
        object
    }
}

/// A JSON object that keeps every key it is given, in order, duplicates included.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct JsonFields(Vec<(String, JsonField)>);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub(crate) enum JsonField {
    Scalar(serde_json::Value),
    Group(JsonFields),
}

impl Serialize for JsonFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, field) in &self.0 {
            map.serialize_entry(key, field)?;
        }
        map.end()
    }
}

impl JsonFields {
    fn push(&mut self, key: &str, value: serde_json::Value) {
        self.0.push((key.to_string(), JsonField::Scalar(value)));
    }

    /// The nested object for `key`, opened after the existing fields if no group of that name
    /// exists yet. A scalar under the same key stays where it is.
    fn group(&mut self, key: &str) -> &mut JsonFields {
        let found = self
            .0
            .iter()
            .position(|(k, field)| k == key && matches!(field, JsonField::Group(_)));
        let index = match found {
            Some(index) => index,
            None => {
                self.0
                    .push((key.to_string(), JsonField::Group(JsonFields::default())));
                self.0.len() - 1
            }
        };
        match &mut self.0[index].1 {
            JsonField::Group(fields) => fields,
            JsonField::Scalar(_) => unreachable!("index points at a group"),
        }
    }

    fn groups(&mut self, path: &[String]) -> &mut JsonFields {
        let mut object = self;
        for group in path {
            object = object.group(group);
        }
        object
    }
}

fn group_prefix(groups: &[String]) -> String {
    let mut prefix = String::new();
    for group in groups {
        prefix.push_str(group);
        prefix.push('.');
    }
    prefix
}

fn is_empty_attr(attr: &Attr) -> bool {
    match &attr.value {
        Value::Group(inner) => inner.iter().all(is_empty_attr),
        _ => attr.key.is_empty(),
    }
}

fn needs_quoting(s: &str) -> bool {
    s.is_empty()
        || s
            .chars()
            .any(|c| c.is_whitespace() || c == '=' || c == '"' || c.is_control())
}

/// Quotes `s` with Go-style escapes when it would not survive as a bare logfmt value.
fn quote_if_needed(s: &str) -> String {
    if !needs_quoting(s) {
        return s.to_string();
    }
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c.is_control() && u32::from(c) < 0x80 => {
                let _ = write!(quoted, "\\x{:02x}", u32::from(c));
            }
            c if c.is_control() => {
                let _ = write!(quoted, "\\u{:04x}", u32::from(c));
            }
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

fn write_text_attr(line: &mut String, prefix: &str, attr: &Attr) {
    match &attr.value {
        Value::Group(inner) => {
            // an empty key inlines the group's attributes
            let prefix = if attr.key.is_empty() {
                prefix.to_string()
            } else {
                format!("{}{}.", prefix, attr.key)
            };
            for attr in inner {
                write_text_attr(line, &prefix, attr);
            }
        }
        _ if attr.key.is_empty() => {}
        value => {
            let key = quote_if_needed(&format!("{}{}", prefix, attr.key));
            let value = match value {
                Value::String(s) => quote_if_needed(s),
                other => quote_if_needed(&other.to_string()),
            };
            let _ = write!(line, " {}={}", key, value);
        }
    }
}

fn insert_json_attr(object: &mut JsonFields, attr: &Attr) {
    use serde_json::Value as Json;

    match &attr.value {
        Value::Group(inner) => {
            if is_empty_attr(attr) {
                return;
            }
            let target = if attr.key.is_empty() {
                object
            } else {
                object.group(&attr.key)
            };
            for attr in inner {
                insert_json_attr(target, attr);
            }
        }
        _ if attr.key.is_empty() => {}
        value => {
            let json = match value {
                Value::String(s) => Json::String(s.clone()),
                Value::Int(v) => Json::from(*v),
                Value::Uint(v) => Json::from(*v),
                Value::Float(v) => serde_json::Number::from_f64(*v)
                    .map(Json::Number)
                    .unwrap_or_else(|| Json::String(v.to_string())),
                Value::Bool(v) => Json::Bool(*v),
                Value::Duration(d) => Json::from(u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)),
                Value::Group(_) => unreachable!("groups handled above"),
            };
            object.push(&attr.key, json);
        }
    }
}
