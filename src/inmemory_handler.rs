// SPDX-License-Identifier: MIT OR Apache-2.0

//! # In-Memory Handler
//!
//! This module provides an in-memory handler for testing and debugging purposes.
//! [`InMemoryHandler`] keeps every record it receives, both as the record itself and as the
//! `key=value` line a [`TextHandler`](crate::TextHandler) would have written, making it
//! ideal for:
//!
//! - Unit testing code that logs through ctxlog
//! - Asserting on exactly which context attributes were attached to a record
//! - Capturing logs where standard output is not available
//!
//! ## Architecture
//!
//! The captured entries live behind an `Arc<Mutex<..>>` shared by every handler derived
//! through `with_attrs`/`with_group`, so a test can hold the original handler and read
//! what any derived logger wrote.

use crate::Level;
use crate::attr::Attr;
use crate::context::Context;
use crate::handler::{HandleError, Handler, HandlerOptions, Scope};
use crate::log_record::LogRecord;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Captured {
    lines: Vec<String>,
    records: Vec<LogRecord>,
}

/// A handler that stores log output in memory.
///
/// Lines are rendered without timestamps so they can be compared exactly.
///
/// # Example
///
/// ```rust
/// use ctxlog::{InMemoryHandler, Level, Logger};
/// use ctxlog::context::{Context, with_log_context};
/// use std::sync::Arc;
///
/// let handler = Arc::new(InMemoryHandler::with_level(Level::Debug));
/// let logger = Logger::new(handler.clone());
///
/// logger.info("plain", &[]);
/// let ctx = with_log_context(&Context::background());
/// logger.info_context(&ctx, "tagged", &[]);
///
/// let logs = handler.drain_logs();
/// assert!(logs.starts_with("level=INFO msg=plain\n"));
/// assert!(logs.contains("msg=tagged logId="));
/// assert_eq!(handler.drain_logs(), "");
/// ```
#[derive(Debug)]
pub struct InMemoryHandler {
    captured: Arc<Mutex<Captured>>,
    options: HandlerOptions,
    scope: Scope,
}

// ============================================================================
// BOILERPLATE TRAIT IMPLEMENTATIONS
// ============================================================================
//
// - Debug: derived, required by Handler
// - Default: follows the process-wide level, like the default provider's handler
// - Clone: NOT implemented; derive through with_attrs/with_group so the buffer stays shared
// - PartialEq/Eq/Hash: NOT implemented, equality of handlers is not meaningful

impl Default for InMemoryHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryHandler {
    /// A handler that follows the process-wide level.
    pub fn new() -> Self {
        Self::with_options(HandlerOptions::default())
    }

    /// A handler with its own fixed minimum level.
    pub fn with_level(level: Level) -> Self {
        Self::with_options(HandlerOptions {
            level: Some(level),
            ..HandlerOptions::default()
        })
    }

    /// Timestamps are always left out of the captured lines.
    pub fn with_options(options: HandlerOptions) -> Self {
        Self {
            captured: Arc::new(Mutex::new(Captured::default())),
            options: HandlerOptions {
                omit_time: true,
                ..options
            },
            scope: Scope::default(),
        }
    }

    /// Returns all captured lines joined by newlines and clears the buffer.
    pub fn drain_logs(&self) -> String {
        let mut captured = self.captured.lock();
        let result = captured.lines.join("\n");
        captured.lines.clear();
        captured.records.clear();
        result
    }

    /// Returns and clears the captured lines.
    pub fn drain_lines(&self) -> Vec<String> {
        let mut captured = self.captured.lock();
        captured.records.clear();
        std::mem::take(&mut captured.lines)
    }

    /// The records received so far, with the context attributes already appended.
    pub fn records(&self) -> Vec<LogRecord> {
        self.captured.lock().records.clone()
    }

    /// Number of records received since the last drain.
    pub fn len(&self) -> usize {
        self.captured.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes the captured lines to stderr and clears the buffer.
    pub fn drain_to_console(&self) {
        for line in self.drain_lines() {
            eprintln!("{}", line);
        }
    }
}

impl Handler for InMemoryHandler {
    fn enabled(&self, _ctx: &Context, level: Level) -> bool {
        level >= self.options.min_level()
    }

    fn handle(&self, _ctx: &Context, record: LogRecord) -> Result<(), HandleError> {
        let line = self.scope.encode_text(&record, &self.options);
        let mut captured = self.captured.lock();
        captured.lines.push(line);
        captured.records.push(record);
        Ok(())
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler> {
        Arc::new(Self {
            captured: self.captured.clone(),
            options: self.options.clone(),
            scope: self.scope.with_attrs(attrs),
        })
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        Arc::new(Self {
            captured: self.captured.clone(),
            options: self.options.clone(),
            scope: self.scope.with_group(name),
        })
    }
}
