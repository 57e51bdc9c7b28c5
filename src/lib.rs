// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# ctxlog

ctxlog is a structured-logging layer that tags every record with attributes taken from the
context of the call, and keeps track of which unit of work a record belongs to.

# The problem

A server handles many requests at once. Each request logs from many places, often through
one shared logger. Afterwards, you want to find every line a single request wrote, and when
a request fans out into sub-tasks, you want to know which task belongs to which parent.

Passing a request id into every log call by hand is tedious and easy to forget. Baking it
into a logger at construction means building a logger per request and threading it everywhere.

# The approach

ctxlog resolves attributes **when a record is logged**, from a [`Context`](context::Context)
passed to that call:

* A [`Context`](context::Context) is an immutable, layered key/value snapshot threaded
  explicitly through the call chain. Adding a value returns a new snapshot.
* A [`ContextAttr`] is a rule for one output attribute: a key, an optional default, an
  optional resolver reading the context, and an optional formatter.
* A [`ContextHandler`] wraps the handler that actually writes records and appends the
  attributes its rules resolve from the context of each call.

Two rules are built in: `logId` and `parentLogId`. Neither is emitted when its id is unset.

# Lineage

```rust
use ctxlog::{InMemoryHandler, Level, LoggerProvider};
use ctxlog::context::Context;
use std::sync::Arc;

let memory = Arc::new(InMemoryHandler::with_level(Level::Info));
let provider = LoggerProvider::new(memory.clone());

// start a unit of work
let (ctx, logger) = provider.bind(&Context::background());
logger.info("start request", &[]);

// a sub-task: its parent id is the request's id
let (_task_ctx, task_logger) = provider.bind_child(&ctx);
task_logger.info("start task", &[]);

let lines = memory.drain_lines();
assert!(lines[0].contains("logId="));
assert!(lines[1].contains("parentLogId="));
```

# The process-wide provider

The free functions ([`info`], [`bind`], [`add_context_attrs`], ...) log through a default
provider that writes `key=value` lines to standard output. Replace its destination with
[`set_handler`], [`set_text_handler`] or [`set_json_handler`], and its threshold with
[`set_log_level`]. For deterministic ids in tests, install a [`CountingIdGenerator`] with
[`set_id_generator`].

# Call sites

Every logging entry point is `#[track_caller]`. A helper that wraps a logger and is itself
marked `#[track_caller]` reports its caller's location rather than its own.
*/

mod attr;
pub mod context;
mod context_attr;
mod context_handler;
pub mod global;
mod handler;
mod id_generator;
mod inmemory_handler;
mod json_handler;
mod level;
mod log_id;
mod log_record;
mod logger;
mod macros;
mod provider;
mod text_handler;

pub use attr::{Attr, Value};
pub use context_attr::{ContextAttr, FormatFn, LOG_ID_KEY, PARENT_LOG_ID_KEY, ResolveFn};
pub use context_handler::ContextHandler;
pub use global::{
    add_context_attrs, bind, bind_child, debug, debug_context, default_logger, default_provider,
    error, error_context, info, info_context, log, log_attrs, set_default_provider, set_handler,
    set_inner_handler, set_json_handler, set_text_handler, warn, warn_context,
};
pub use handler::{HandleError, Handler, HandlerOptions};
pub use id_generator::{
    CountingIdGenerator, IdGenerator, RandomIdGenerator, id_generator, new_id, set_id_generator,
};
pub use inmemory_handler::InMemoryHandler;
pub use json_handler::JsonHandler;
pub use level::{Level, ParseLevelError, log_level, set_log_level};
pub use log_id::LogId;
pub use log_record::{CallSite, LogRecord};
pub use logger::Logger;
pub use provider::LoggerProvider;
pub use text_handler::TextHandler;
