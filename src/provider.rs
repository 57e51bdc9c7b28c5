// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`LoggerProvider`]: builds loggers, and binds them to a context.

use crate::context::{Context, log_id, with_child_log_context, with_log_context};
use crate::context_attr::ContextAttr;
use crate::context_handler::ContextHandler;
use crate::handler::Handler;
use crate::logger::Logger;
use std::sync::Arc;

/**
Owns a [`ContextHandler`] and hands out [`Logger`]s over it.

Binding is the usual way to start a unit of work:

```
use ctxlog::{InMemoryHandler, Level, LoggerProvider};
use ctxlog::context::{Context, log_id, parent_log_id};
use std::sync::Arc;

let memory = Arc::new(InMemoryHandler::with_level(Level::Info));
let provider = LoggerProvider::new(memory.clone());

let (ctx, logger) = provider.bind(&Context::background());
let (child_ctx, child) = provider.bind_child(&ctx);
assert_eq!(parent_log_id(&child_ctx), log_id(&ctx));

// no context passed, the ids captured at bind time are still emitted
logger.info("parent", &[]);
child.info("child", &[]);
let lines = memory.drain_lines();
assert_eq!(lines[0], format!("level=INFO msg=parent logId={}", log_id(&ctx)));
assert_eq!(
    lines[1],
    format!("level=INFO msg=child logId={} parentLogId={}", log_id(&child_ctx), log_id(&ctx))
);
```

A provider is an ordinary value; the process-wide one lives in [`crate::global`].
*/
#[derive(Debug, Clone)]
pub struct LoggerProvider {
    handler: ContextHandler,
}

impl LoggerProvider {
    /// A provider over `inner` with the built-in log id descriptors.
    pub fn new(inner: Arc<dyn Handler>) -> Self {
        Self::from_context_handler(ContextHandler::new(inner))
    }

    pub fn from_context_handler(handler: ContextHandler) -> Self {
        Self { handler }
    }

    pub fn handler(&self) -> &ContextHandler {
        &self.handler
    }

    /// A logger over this provider's handler, with no bound context.
    pub fn logger(&self) -> Logger {
        Logger::from_context_handler(self.handler.clone())
    }

    /// A provider whose handler also carries `attrs`.
    pub fn with_context_attrs(&self, attrs: impl IntoIterator<Item = ContextAttr>) -> Self {
        Self::from_context_handler(self.handler.with_context_attrs(attrs))
    }

    /// Binds a logger to `ctx`.
    ///
    /// If `ctx` has no log id, a fresh one is bound first. The returned logger carries
    /// the ids of the returned context, and the values its other descriptors resolve to in
    /// that context, as defaults. They are emitted even by calls that pass no context; a
    /// call whose context resolves a value of its own overrides them.
    pub fn bind(&self, ctx: &Context) -> (Context, Logger) {
        let ctx = if log_id(ctx).is_nil() {
            with_log_context(ctx)
        } else {
            ctx.clone()
        };
        let handler = self.handler.set_context_attrs(self.handler.bound_attrs(&ctx));
        (ctx, Logger::from_context_handler(handler))
    }

    /// Starts a child of the work in `ctx` and binds a logger to it.
    pub fn bind_child(&self, ctx: &Context) -> (Context, Logger) {
        self.bind(&with_child_log_context(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{parent_log_id, set_log_id, set_parent_log_id};
    use crate::log_id::LogId;
    use crate::test_support::global_guard;
    use crate::{InMemoryHandler, Level};

    struct TenantKey;

    fn provider() -> (Arc<InMemoryHandler>, LoggerProvider) {
        let memory = Arc::new(InMemoryHandler::with_level(Level::Info));
        let provider = LoggerProvider::new(memory.clone());
        (memory, provider)
    }

    #[test]
    fn bind_keeps_an_existing_id() {
        let (_memory, provider) = provider();
        let ctx = set_log_id(&Context::background(), LogId::from_string("existing"));
        let (bound, _logger) = provider.bind(&ctx);
        assert_eq!(bound, ctx);
        assert_eq!(log_id(&bound).to_string(), "existing");
    }

    #[test]
    fn bind_generates_a_missing_id() {
        // draws from the shared id generator
        let _guard = global_guard();
        let (memory, provider) = provider();
        let (bound, logger) = provider.bind(&Context::background());
        assert!(!log_id(&bound).is_nil());
        assert!(parent_log_id(&bound).is_nil());
        logger.info("m", &[]);
        assert_eq!(memory.drain_logs(), format!("level=INFO msg=m logId={}", log_id(&bound)));
    }

    #[test]
    fn live_context_overrides_bound_ids() {
        let _guard = global_guard();
        let (memory, provider) = provider();
        let (_bound, logger) = provider.bind(&Context::background());
        let other = set_log_id(&Context::background(), LogId::from_string("other"));
        logger.info_context(&other, "m", &[]);
        assert!(memory.drain_logs().ends_with("logId=other"));
    }

    #[test]
    fn bound_ids_are_replaced_as_a_pair() {
        let (memory, provider) = provider();
        let parent = set_log_id(&Context::background(), LogId::from_string("root"));
        let task = set_log_id(&parent, LogId::from_string("task"));
        let child = set_parent_log_id(&task, log_id(&parent));
        let (_bound, logger) = provider.bind(&child);

        logger.info("bound", &[]);
        let unrelated = set_log_id(&Context::background(), LogId::from_string("other"));
        logger.info_context(&unrelated, "unrelated", &[]);
        let nested = set_parent_log_id(&unrelated, LogId::from_string("up"));
        logger.info_context(&nested, "nested", &[]);

        assert_eq!(
            memory.drain_lines(),
            vec![
                "level=INFO msg=bound logId=task parentLogId=root",
                "level=INFO msg=unrelated logId=other",
                "level=INFO msg=nested logId=other parentLogId=up",
            ]
        );
    }

    #[test]
    fn bind_pins_custom_descriptors() {
        let (memory, provider) = provider();
        let provider = provider.with_context_attrs([
            ContextAttr::from_context::<TenantKey, String>("tenant").with_default("none"),
        ]);
        let ctx = set_log_id(&Context::background(), LogId::from_string("id"))
            .with_value::<TenantKey>("acme".to_string());
        let (_bound, logger) = provider.bind(&ctx);

        logger.info("pinned", &[]);
        let later = Context::background().with_value::<TenantKey>("globex".to_string());
        logger.info_context(&later, "live", &[]);
        // the provider itself is unchanged
        provider.logger().info("provider", &[]);

        assert_eq!(
            memory.drain_lines(),
            vec![
                "level=INFO msg=pinned logId=id tenant=acme",
                "level=INFO msg=live logId=id tenant=globex",
                "level=INFO msg=provider tenant=none",
            ]
        );
    }

    #[test]
    fn bind_replaces_the_descriptor_list() {
        let _guard = global_guard();
        let (_memory, provider) = provider();
        let provider = provider.with_context_attrs([ContextAttr::new("a").with_default(1)]);
        let (_ctx, logger) = provider.bind(&Context::background());
        let keys: Vec<&str> = logger
            .handler()
            .context_attrs()
            .iter()
            .map(ContextAttr::key)
            .collect();
        assert_eq!(keys, ["logId", "parentLogId", "a"]);
        assert_eq!(provider.handler().context_attrs().len(), 3);
    }
}
