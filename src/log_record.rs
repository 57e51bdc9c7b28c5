// SPDX-License-Identifier: MIT OR Apache-2.0

//! Log record type handed to [`Handler`](crate::Handler)s.
//!
//! A [`LogRecord`] is created by a [`Logger`](crate::Logger) entry point once the level has
//! passed the handler's `enabled` check. It carries the time, level, message, the
//! attributes supplied at the call, and the call site. The
//! [`ContextHandler`](crate::ContextHandler) then appends its context-derived attributes
//! before passing the record on.
//!
//! # Example
//!
//! ```rust
//! use ctxlog::{Attr, Level, LogRecord};
//!
//! let mut record = LogRecord::new(Level::Info, "request finished");
//! record.add_attrs([Attr::int("code", 200)]);
//! assert_eq!(record.attrs().len(), 1);
//! assert_eq!(record.to_string(), "INFO request finished code=200");
//! ```

use crate::Level;
use crate::attr::Attr;
use chrono::{DateTime, Local};
use std::fmt::Display;
use std::panic::Location;

/// Where a log call was made.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
}

impl CallSite {
    /// The call site of the caller, following `#[track_caller]` frames.
    #[track_caller]
    pub fn caller() -> Self {
        Self::from(Location::caller())
    }
}

impl From<&'static Location<'static>> for CallSite {
    fn from(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
            column: location.column(),
        }
    }
}

impl Display for CallSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/**
A log record.

Records are owned values; each logging call builds its own, so no buffer is shared between
threads while a record is being assembled.
*/
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    time: DateTime<Local>,
    level: Level,
    message: String,
    attrs: Vec<Attr>,
    source: Option<CallSite>,
}

impl LogRecord {
    /// Creates a record stamped with the current time and no call site.
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            time: Local::now(),
            level,
            message: message.into(),
            attrs: Vec::new(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: CallSite) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_time(mut self, time: DateTime<Local>) -> Self {
        self.time = time;
        self
    }

    /// Appends attributes after the ones already present.
    pub fn add_attrs(&mut self, attrs: impl IntoIterator<Item = Attr>) {
        self.attrs.extend(attrs);
    }

    pub fn push_attr(&mut self, attr: Attr) {
        self.attrs.push(attr);
    }

    pub fn time(&self) -> DateTime<Local> {
        self.time
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    pub fn source(&self) -> Option<CallSite> {
        self.source
    }
}

impl Display for LogRecord {
    /// `LEVEL message k=v ...`, without time or source.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.level, self.message)?;
        for attr in &self.attrs {
            write!(f, " {}", attr)?;
        }
        Ok(())
    }
}
/*
Boilerplate notes for LogRecord:

IMPLEMENTED:
- Debug, Clone, PartialEq: derived; handlers forward and tests compare records
- Display: compact single-line form for diagnostics

NOT IMPLEMENTED:
- Eq/Hash: Value may hold floats
- Default: a record without a message and level is not meaningful
- Copy: owns heap data
*/

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_site_tracks_caller() {
        let here = CallSite::caller();
        assert!(here.file.ends_with("log_record.rs"));
        assert_eq!(here.line, line!() - 2);
    }

    #[test]
    fn attrs_keep_insertion_order() {
        let mut record = LogRecord::new(Level::Warn, "w");
        record.push_attr(Attr::int("a", 1));
        record.add_attrs(vec![Attr::int("b", 2), Attr::int("c", 3)]);
        let keys: Vec<_> = record.attrs().iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, ["a", "b", "c"]);
        assert_eq!(record.source(), None);
    }
}
