// SPDX-License-Identifier: MIT OR Apache-2.0

//! The [`Logger`] facade.
//!
//! A `Logger` holds no per-call state. Every entry point takes the context of the call (or
//! uses [`Context::background`]), asks the handler whether the level is enabled, and only
//! then builds a [`LogRecord`] and hands it on. A disabled level costs one `enabled` check:
//! no record is built and no descriptor is resolved.
//!
//! # Call sites
//!
//! Every logging method is `#[track_caller]`, so the record's [`CallSite`] is the line that
//! called the logger. A wrapper that is itself `#[track_caller]` passes its caller's location
//! through:
//!
//! ```
//! use ctxlog::{Attr, Logger};
//!
//! #[track_caller]
//! fn audit(logger: &Logger, what: &str) {
//!     logger.info(what, &[Attr::string("audit", "yes")]);
//! }
//! ```
//!
//! For deeper indirection, capture a [`CallSite`] once and pass it to
//! [`Logger::handle_log`].

use crate::Level;
use crate::attr::Attr;
use crate::context::Context;
use crate::context_attr::ContextAttr;
use crate::context_handler::ContextHandler;
use crate::handler::{HandleError, Handler};
use crate::log_record::{CallSite, LogRecord};
use std::sync::Arc;

/**
Logs records through a [`ContextHandler`].

```
use ctxlog::{Attr, ContextAttr, InMemoryHandler, Level, Logger};
use ctxlog::context::{Context, with_log_context};
use std::sync::Arc;

struct UserKey;

let memory = Arc::new(InMemoryHandler::with_level(Level::Info));
let logger = Logger::new(memory.clone())
    .with_context_attrs([ContextAttr::from_context::<UserKey, String>("user")]);

let ctx = Context::background().with_value::<UserKey>("ada".to_string());
logger.info_context(&ctx, "login", &[Attr::int("attempt", 1)]);
logger.debug("not emitted", &[]);

assert_eq!(memory.drain_logs(), "level=INFO msg=login attempt=1 user=ada");
```
*/
#[derive(Debug, Clone)]
pub struct Logger {
    handler: ContextHandler,
}

impl Logger {
    /// A logger over `inner`, tagging records with the built-in log id attributes.
    pub fn new(inner: Arc<dyn Handler>) -> Self {
        Self::from_context_handler(ContextHandler::new(inner))
    }

    pub fn from_context_handler(handler: ContextHandler) -> Self {
        Self { handler }
    }

    pub fn handler(&self) -> &ContextHandler {
        &self.handler
    }

    pub fn enabled(&self, ctx: &Context, level: Level) -> bool {
        self.handler.enabled(ctx, level)
    }

    /// A logger that emits `attrs` on every record.
    pub fn with(&self, attrs: Vec<Attr>) -> Logger {
        Self::from_context_handler(self.handler.derive_with_attrs(attrs))
    }

    /// A logger that qualifies later attribute keys with group `name`.
    pub fn with_group(&self, name: &str) -> Logger {
        Self::from_context_handler(self.handler.derive_with_group(name))
    }

    /// A logger with `attrs` appended to its descriptors.
    pub fn with_context_attrs(&self, attrs: impl IntoIterator<Item = ContextAttr>) -> Logger {
        Self::from_context_handler(self.handler.with_context_attrs(attrs))
    }

    /// A logger whose descriptors are exactly `attrs`.
    pub fn set_context_attrs(&self, attrs: Vec<ContextAttr>) -> Logger {
        Self::from_context_handler(self.handler.set_context_attrs(attrs))
    }

    /// Logs at `level` with the attributes in `attrs`.
    ///
    /// Errors from the handler are returned unchanged.
    #[track_caller]
    pub fn log(
        &self,
        ctx: &Context,
        level: Level,
        msg: &str,
        attrs: &[Attr],
    ) -> Result<(), HandleError> {
        if !self.enabled(ctx, level) {
            return Ok(());
        }
        self.emit(ctx, level, CallSite::caller(), msg, attrs.to_vec())
    }

    /// Like [`log`](Self::log), taking ownership of the attributes.
    #[track_caller]
    pub fn log_attrs(
        &self,
        ctx: &Context,
        level: Level,
        msg: &str,
        attrs: Vec<Attr>,
    ) -> Result<(), HandleError> {
        if !self.enabled(ctx, level) {
            return Ok(());
        }
        self.emit(ctx, level, CallSite::caller(), msg, attrs)
    }

    /// Logs with an explicitly supplied call site.
    pub fn handle_log(
        &self,
        ctx: &Context,
        level: Level,
        source: CallSite,
        msg: &str,
        attrs: &[Attr],
    ) -> Result<(), HandleError> {
        if !self.enabled(ctx, level) {
            return Ok(());
        }
        self.emit(ctx, level, source, msg, attrs.to_vec())
    }

    /// Like [`handle_log`](Self::handle_log), taking ownership of the attributes.
    pub fn handle_log_attrs(
        &self,
        ctx: &Context,
        level: Level,
        source: CallSite,
        msg: &str,
        attrs: Vec<Attr>,
    ) -> Result<(), HandleError> {
        if !self.enabled(ctx, level) {
            return Ok(());
        }
        self.emit(ctx, level, source, msg, attrs)
    }

    fn emit(
        &self,
        ctx: &Context,
        level: Level,
        source: CallSite,
        msg: &str,
        attrs: Vec<Attr>,
    ) -> Result<(), HandleError> {
        let mut record = LogRecord::new(level, msg).with_source(source);
        record.add_attrs(attrs);
        self.handler.handle(ctx, record)
    }

    #[track_caller]
    pub fn debug(&self, msg: &str, attrs: &[Attr]) {
        let _ = self.log(&Context::background(), Level::Debug, msg, attrs);
    }

    #[track_caller]
    pub fn info(&self, msg: &str, attrs: &[Attr]) {
        let _ = self.log(&Context::background(), Level::Info, msg, attrs);
    }

    #[track_caller]
    pub fn warn(&self, msg: &str, attrs: &[Attr]) {
        let _ = self.log(&Context::background(), Level::Warn, msg, attrs);
    }

    #[track_caller]
    pub fn error(&self, msg: &str, attrs: &[Attr]) {
        let _ = self.log(&Context::background(), Level::Error, msg, attrs);
    }

    #[track_caller]
    pub fn debug_context(&self, ctx: &Context, msg: &str, attrs: &[Attr]) {
        let _ = self.log(ctx, Level::Debug, msg, attrs);
    }

    #[track_caller]
    pub fn info_context(&self, ctx: &Context, msg: &str, attrs: &[Attr]) {
        let _ = self.log(ctx, Level::Info, msg, attrs);
    }

    #[track_caller]
    pub fn warn_context(&self, ctx: &Context, msg: &str, attrs: &[Attr]) {
        let _ = self.log(ctx, Level::Warn, msg, attrs);
    }

    #[track_caller]
    pub fn error_context(&self, ctx: &Context, msg: &str, attrs: &[Attr]) {
        let _ = self.log(ctx, Level::Error, msg, attrs);
    }
}

/*
Boilerplate notes.

# Logger

Clone is cheap: one Arc bump for the inner handler and a copy of the descriptor list.
PartialEq/Hash would have to compare handlers by identity; nothing needs it, so no.
Default would have to pick a destination; use default_logger() for that.
Display, From/Into, Deref: no.
*/
