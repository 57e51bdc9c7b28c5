// SPDX-License-Identifier: MIT OR Apache-2.0

//! The process-wide default provider and the convenience functions that log through it.
//!
//! Until something replaces it, the default provider writes `key=value` lines to standard
//! output through a [`TextHandler`] that follows the process-wide level
//! ([`set_log_level`](crate::set_log_level)).
//!
//! # Examples
//!
//! ## Logging through the default provider
//!
//! ```
//! use ctxlog::context::Context;
//!
//! let (ctx, logger) = ctxlog::bind(&Context::background());
//! logger.info("request started", &[]);
//! ctxlog::info_context(&ctx, "also tagged", &[]);
//! ```
//!
//! ## Replacing the destination
//!
//! ```
//! use ctxlog::{HandlerOptions, Level};
//!
//! ctxlog::set_json_handler(std::io::stderr(), HandlerOptions {
//!     level: Some(Level::Debug),
//!     ..HandlerOptions::default()
//! });
//! ctxlog::debug("now JSON on stderr", &[]);
//! ```
//!
//! # Implementation Notes
//!
//! The provider sits behind an `RwLock<Arc<..>>`. Readers clone the `Arc` and release the lock
//! before logging, so a replacement never waits for in-flight log calls, and those calls
//! finish against the provider they started with.

use crate::Level;
use crate::attr::Attr;
use crate::context::Context;
use crate::context_attr::ContextAttr;
use crate::handler::{HandleError, Handler, HandlerOptions};
use crate::json_handler::JsonHandler;
use crate::logger::Logger;
use crate::provider::LoggerProvider;
use crate::text_handler::TextHandler;
use parking_lot::RwLock;
use std::io::Write;
use std::sync::{Arc, OnceLock};

static DEFAULT_PROVIDER: OnceLock<RwLock<Arc<LoggerProvider>>> = OnceLock::new();

fn initial_provider() -> LoggerProvider {
    LoggerProvider::new(Arc::new(TextHandler::stdout()))
}

fn provider_slot() -> &'static RwLock<Arc<LoggerProvider>> {
    DEFAULT_PROVIDER.get_or_init(|| RwLock::new(Arc::new(initial_provider())))
}

/// The current default provider.
pub fn default_provider() -> Arc<LoggerProvider> {
    provider_slot().read().clone()
}

/// Replaces the default provider.
pub fn set_default_provider(provider: LoggerProvider) {
    *provider_slot().write() = Arc::new(provider);
}

/// A logger over the default provider, with no bound context.
pub fn default_logger() -> Logger {
    default_provider().logger()
}

/// Replaces the default provider with one over `handler`.
///
/// Only the built-in log id descriptors are kept; use [`set_inner_handler`] to keep the
/// registered ones.
pub fn set_handler(handler: Arc<dyn Handler>) {
    set_default_provider(LoggerProvider::new(handler));
}

/// Swaps the handler under the default provider, keeping its descriptors.
pub fn set_inner_handler(handler: Arc<dyn Handler>) {
    let mut slot = provider_slot().write();
    let context_handler = slot.handler().with_inner(handler);
    *slot = Arc::new(LoggerProvider::from_context_handler(context_handler));
}

/// Writes `key=value` lines to `writer` from now on.
pub fn set_text_handler<W: Write + Send + 'static>(writer: W, options: HandlerOptions) {
    set_handler(Arc::new(TextHandler::new(writer, options)));
}

/// Writes JSON lines to `writer` from now on.
pub fn set_json_handler<W: Write + Send + 'static>(writer: W, options: HandlerOptions) {
    set_handler(Arc::new(JsonHandler::new(writer, options)));
}

/// Registers more descriptors on the default provider.
///
/// Loggers obtained earlier keep the descriptors they were built with.
pub fn add_context_attrs(attrs: impl IntoIterator<Item = ContextAttr>) {
    let mut slot = provider_slot().write();
    let provider = slot.with_context_attrs(attrs);
    *slot = Arc::new(provider);
}

/// Binds a logger from the default provider to `ctx`; see [`LoggerProvider::bind`].
pub fn bind(ctx: &Context) -> (Context, Logger) {
    default_provider().bind(ctx)
}

/// See [`LoggerProvider::bind_child`].
pub fn bind_child(ctx: &Context) -> (Context, Logger) {
    default_provider().bind_child(ctx)
}

#[track_caller]
pub fn log(ctx: &Context, level: Level, msg: &str, attrs: &[Attr]) -> Result<(), HandleError> {
    default_logger().log(ctx, level, msg, attrs)
}

#[track_caller]
pub fn log_attrs(
    ctx: &Context,
    level: Level,
    msg: &str,
    attrs: Vec<Attr>,
) -> Result<(), HandleError> {
    default_logger().log_attrs(ctx, level, msg, attrs)
}

#[track_caller]
pub fn debug(msg: &str, attrs: &[Attr]) {
    default_logger().debug(msg, attrs);
}

#[track_caller]
pub fn info(msg: &str, attrs: &[Attr]) {
    default_logger().info(msg, attrs);
}

#[track_caller]
pub fn warn(msg: &str, attrs: &[Attr]) {
    default_logger().warn(msg, attrs);
}

#[track_caller]
pub fn error(msg: &str, attrs: &[Attr]) {
    default_logger().error(msg, attrs);
}

#[track_caller]
pub fn debug_context(ctx: &Context, msg: &str, attrs: &[Attr]) {
    default_logger().debug_context(ctx, msg, attrs);
}

#[track_caller]
pub fn info_context(ctx: &Context, msg: &str, attrs: &[Attr]) {
    default_logger().info_context(ctx, msg, attrs);
}

#[track_caller]
pub fn warn_context(ctx: &Context, msg: &str, attrs: &[Attr]) {
    default_logger().warn_context(ctx, msg, attrs);
}

#[track_caller]
pub fn error_context(ctx: &Context, msg: &str, attrs: &[Attr]) {
    default_logger().error_context(ctx, msg, attrs);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryHandler;
    use crate::context::{log_id, parent_log_id};
    use crate::id_generator::{CountingIdGenerator, set_id_generator};
    use crate::level::set_log_level;
    use crate::test_support::global_guard;

    struct RequestKey;

    fn install() -> Arc<InMemoryHandler> {
        let memory = Arc::new(InMemoryHandler::new());
        set_handler(memory.clone());
        set_log_level(Level::Info);
        memory
    }

    #[test]
    fn default_is_a_stdout_text_handler() {
        let provider = initial_provider();
        let inner = format!("{:?}", provider.handler().inner());
        assert!(inner.starts_with("TextHandler"), "{inner}");
        assert!(inner.contains("level: None"), "{inner}");
        let keys: Vec<&str> = provider
            .handler()
            .context_attrs()
            .iter()
            .map(ContextAttr::key)
            .collect();
        assert_eq!(keys, ["logId", "parentLogId"]);
    }

    #[test]
    fn convenience_functions_use_the_default_provider() {
        let _guard = global_guard();
        let memory = install();
        set_id_generator(Arc::new(CountingIdGenerator::new()));

        let (ctx, _logger) = bind(&Context::background());
        debug("hidden", &[]);
        info("i", &[]);
        warn_context(&ctx, "w", &[]);
        error("e", &[Attr::int("n", 1)]);
        log(&ctx, Level::Info, "l", &[]).expect("in-memory handle never fails");
        log_attrs(&Context::background(), Level::Error, "la", vec![])
            .expect("in-memory handle never fails");

        assert_eq!(
            memory.drain_lines(),
            vec![
                "level=INFO msg=i",
                "level=WARN msg=w logId=0000000000000000",
                "level=ERROR msg=e n=1",
                "level=INFO msg=l logId=0000000000000000",
                "level=ERROR msg=la",
            ]
        );
    }

    #[test]
    fn set_log_level_changes_what_is_enabled() {
        let _guard = global_guard();
        let memory = install();
        set_log_level(Level::Debug);
        debug_context(&Context::background(), "d", &[]);
        set_log_level(Level::Error);
        info_context(&Context::background(), "i", &[]);
        error_context(&Context::background(), "e", &[]);
        set_log_level(Level::Info);
        assert_eq!(memory.drain_logs(), "level=DEBUG msg=d\nlevel=ERROR msg=e");
    }

    #[test]
    fn inner_handler_swap_keeps_descriptors() {
        let _guard = global_guard();
        let first = install();
        add_context_attrs([ContextAttr::new("svc").with_default("api")]);
        let second = Arc::new(InMemoryHandler::new());
        set_inner_handler(second.clone());
        info("m", &[]);
        assert!(first.is_empty());
        assert_eq!(second.drain_logs(), "level=INFO msg=m svc=api");

        // set_handler resets to the built-ins
        set_handler(second.clone());
        info("m", &[]);
        assert_eq!(second.drain_logs(), "level=INFO msg=m");
    }

    #[test]
    fn earlier_loggers_keep_their_descriptors() {
        let _guard = global_guard();
        let memory = install();
        let before = default_logger();
        add_context_attrs([ContextAttr::from_context::<RequestKey, String>("req")]);
        let ctx = Context::background().with_value::<RequestKey>("r1".to_string());
        before.info_context(&ctx, "before", &[]);
        default_logger().info_context(&ctx, "after", &[]);
        assert_eq!(memory.drain_logs(), "level=INFO msg=before\nlevel=INFO msg=after req=r1");
    }

    #[test]
    fn bind_child_through_the_default_provider() {
        let _guard = global_guard();
        let memory = install();
        set_id_generator(Arc::new(CountingIdGenerator::new()));
        let (parent, _) = bind(&Context::background());
        let (child, logger) = bind_child(&parent);
        assert_eq!(parent_log_id(&child), log_id(&parent));
        logger.info("child", &[]);
        assert_eq!(
            memory.drain_logs(),
            "level=INFO msg=child logId=0000000000000001 parentLogId=0000000000000000"
        );
    }

    #[test]
    fn text_and_json_destinations() {
        let _guard = global_guard();
        set_text_handler(std::io::sink(), HandlerOptions::default());
        assert!(format!("{:?}", default_provider().handler().inner()).starts_with("TextHandler"));
        set_json_handler(std::io::sink(), HandlerOptions::default());
        assert!(format!("{:?}", default_provider().handler().inner()).starts_with("JsonHandler"));
        info("discarded", &[]);
    }
}
