// SPDX-License-Identifier: MIT OR Apache-2.0

//! The handler that attaches context-derived attributes to each record.

use crate::Level;
use crate::attr::{Attr, Value};
use crate::context::{Context, log_id, parent_log_id};
use crate::context_attr::ContextAttr;
use crate::handler::{HandleError, Handler};
use crate::log_record::LogRecord;
use std::sync::Arc;

/**
Wraps an inner [`Handler`] and, for every record, appends the attributes its
[`ContextAttr`] descriptors resolve from the context passed to that call.

Attributes are resolved when a record is handled, never when the handler is built. One
long-lived `ContextHandler` therefore tags the records of many concurrent requests, each
with its own log id.

The inner handler is shared by reference between every handler derived from this one. The
descriptor list is copied on every derivation, so adding a descriptor to a derived handler
never changes what the original emits.

```
use ctxlog::{ContextAttr, ContextHandler, InMemoryHandler, Level, Logger};
use std::sync::Arc;

let memory = Arc::new(InMemoryHandler::with_level(Level::Info));
let base = ContextHandler::new(memory.clone());
let tagged = base.add_context_attr(ContextAttr::new("svc").with_default("api"));

Logger::from_context_handler(base).info("base", &[]);
Logger::from_context_handler(tagged).info("tagged", &[]);
assert_eq!(memory.drain_logs(), "level=INFO msg=base\nlevel=INFO msg=tagged svc=api");
```
*/
#[derive(Debug, Clone)]
pub struct ContextHandler {
    inner: Arc<dyn Handler>,
    attrs: Vec<ContextAttr>,
}

impl ContextHandler {
    /// Wraps `inner` with the built-in `logId` and `parentLogId` descriptors.
    pub fn new(inner: Arc<dyn Handler>) -> Self {
        Self::with_attrs_list(inner, vec![ContextAttr::log_id(), ContextAttr::parent_log_id()])
    }

    /// Wraps `inner` with exactly `attrs`, without the built-ins.
    pub fn with_attrs_list(inner: Arc<dyn Handler>, attrs: Vec<ContextAttr>) -> Self {
        Self { inner, attrs }
    }

    pub fn inner(&self) -> &Arc<dyn Handler> {
        &self.inner
    }

    pub fn context_attrs(&self) -> &[ContextAttr] {
        &self.attrs
    }

    /// A copy whose descriptor list is replaced by `attrs`.
    pub fn set_context_attrs(&self, attrs: Vec<ContextAttr>) -> Self {
        Self::with_attrs_list(self.inner.clone(), attrs)
    }

    /// A copy with `attr` appended to the descriptor list.
    pub fn add_context_attr(&self, attr: ContextAttr) -> Self {
        self.with_context_attrs([attr])
    }

    /// A copy with `attrs` appended to the descriptor list.
    pub fn with_context_attrs(&self, attrs: impl IntoIterator<Item = ContextAttr>) -> Self {
        let mut list = self.attrs.clone();
        list.extend(attrs);
        Self::with_attrs_list(self.inner.clone(), list)
    }

    /// A copy with the same descriptors over a different inner handler.
    pub fn with_inner(&self, inner: Arc<dyn Handler>) -> Self {
        Self::with_attrs_list(inner, self.attrs.clone())
    }

    /// Like [`Handler::with_attrs`], but keeps the concrete type.
    pub fn derive_with_attrs(&self, attrs: Vec<Attr>) -> Self {
        self.with_inner(self.inner.with_attrs(attrs))
    }

    /// Like [`Handler::with_group`], but keeps the concrete type.
    pub fn derive_with_group(&self, name: &str) -> Self {
        self.with_inner(self.inner.with_group(name))
    }

    /// The descriptor list a logger bound to `ctx` uses.
    ///
    /// The id descriptors come first. `logId` defaults to the id in `ctx`; `parentLogId`
    /// falls back to the parent in `ctx` only for a call context that has no lineage of its
    /// own, so the pair never mixes ids from two contexts. Every other descriptor keeps its
    /// key, resolver and formatter, with its default pinned to the value it resolves to in
    /// `ctx`.
    pub(crate) fn bound_attrs(&self, ctx: &Context) -> Vec<ContextAttr> {
        let bound_parent = parent_log_id(ctx);
        let parent = ContextAttr::parent_log_id().with_resolver(move |live: &Context| {
            let id = if log_id(live).is_nil() && parent_log_id(live).is_nil() {
                bound_parent.clone()
            } else {
                parent_log_id(live)
            };
            (!id.is_nil()).then(|| Value::from(&id))
        });
        let mut attrs = Vec::with_capacity(self.attrs.len() + 2);
        attrs.push(ContextAttr::log_id().with_default_id(&log_id(ctx)));
        attrs.push(parent);
        attrs.extend(
            self.attrs
                .iter()
                .filter(|attr| !attr.is_lineage())
                .map(|attr| attr.pinned(ctx)),
        );
        attrs
    }

    /// Appends the resolved attributes to `record`, in descriptor order.
    fn augment(&self, ctx: &Context, record: &mut LogRecord) {
        record.add_attrs(self.attrs.iter().filter_map(|attr| attr.attr(ctx)));
    }
}

impl Handler for ContextHandler {
    fn enabled(&self, ctx: &Context, level: Level) -> bool {
        self.inner.enabled(ctx, level)
    }

    fn handle(&self, ctx: &Context, mut record: LogRecord) -> Result<(), HandleError> {
        self.augment(ctx, &mut record);
        self.inner.handle(ctx, record)
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler> {
        Arc::new(self.derive_with_attrs(attrs))
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        Arc::new(self.derive_with_group(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryHandler;
    use crate::context::{set_log_id, set_parent_log_id};
    use crate::log_id::LogId;

    fn memory() -> Arc<InMemoryHandler> {
        Arc::new(InMemoryHandler::with_level(Level::Debug))
    }

    fn handle(handler: &ContextHandler, ctx: &Context, msg: &str) {
        handler
            .handle(ctx, LogRecord::new(Level::Info, msg))
            .expect("in-memory handle never fails");
    }

    #[derive(Debug)]
    struct Failing;

    impl Handler for Failing {
        fn enabled(&self, _ctx: &Context, _level: Level) -> bool {
            true
        }
        fn handle(&self, _ctx: &Context, _record: LogRecord) -> Result<(), HandleError> {
            Err(HandleError::Rejected("full".to_string()))
        }
        fn with_attrs(&self, _attrs: Vec<Attr>) -> Arc<dyn Handler> {
            Arc::new(Failing)
        }
        fn with_group(&self, _name: &str) -> Arc<dyn Handler> {
            Arc::new(Failing)
        }
    }

    #[test]
    fn appends_after_record_attrs_in_order() {
        let mem = memory();
        let handler = ContextHandler::new(mem.clone()).with_context_attrs([
            ContextAttr::new("a").with_default(1),
            ContextAttr::new("b").with_default(2),
        ]);
        let ctx = set_parent_log_id(
            &set_log_id(&Context::background(), LogId::from_string("c")),
            LogId::from_string("p"),
        );
        let mut record = LogRecord::new(Level::Info, "m");
        record.push_attr(Attr::int("own", 0));
        handler.handle(&ctx, record).expect("in-memory handle never fails");
        assert_eq!(
            mem.drain_logs(),
            "level=INFO msg=m own=0 logId=c parentLogId=p a=1 b=2"
        );
    }

    #[test]
    fn nil_ids_are_omitted() {
        let mem = memory();
        let handler = ContextHandler::new(mem.clone());
        handle(&handler, &Context::background(), "m");
        let ctx = set_log_id(&Context::background(), LogId::from_string("only"));
        handle(&handler, &ctx, "n");
        assert_eq!(mem.drain_logs(), "level=INFO msg=m\nlevel=INFO msg=n logId=only");
    }

    #[test]
    fn clones_are_independent() {
        let mem = memory();
        let base = ContextHandler::new(mem.clone());
        let derived = base.add_context_attr(ContextAttr::new("extra").with_default("x"));
        let replaced = derived.set_context_attrs(vec![ContextAttr::new("only").with_default(1)]);

        assert_eq!(base.context_attrs().len(), 2);
        assert_eq!(derived.context_attrs().len(), 3);
        assert_eq!(replaced.context_attrs().len(), 1);

        let ctx = set_log_id(&Context::background(), LogId::from_string("id"));
        handle(&base, &ctx, "base");
        handle(&derived, &ctx, "derived");
        handle(&replaced, &ctx, "replaced");
        assert_eq!(
            mem.drain_logs(),
            "level=INFO msg=base logId=id\n\
             level=INFO msg=derived logId=id extra=x\n\
             level=INFO msg=replaced only=1"
        );
    }

    #[test]
    fn structural_derivations_reach_the_inner_handler() {
        let mem = memory();
        let handler = ContextHandler::new(mem.clone())
            .add_context_attr(ContextAttr::new("svc").with_default("api"))
            .derive_with_attrs(vec![Attr::int("static", 1)])
            .derive_with_group("g");
        assert_eq!(handler.context_attrs().len(), 3);
        handle(&handler, &Context::background(), "m");
        assert_eq!(mem.drain_logs(), "level=INFO msg=m static=1 g.svc=api");
    }

    #[test]
    fn enabled_is_delegated() {
        let handler = ContextHandler::new(Arc::new(InMemoryHandler::with_level(Level::Warn)));
        let ctx = Context::background();
        assert!(!handler.enabled(&ctx, Level::Info));
        assert!(handler.enabled(&ctx, Level::Error));
    }

    #[test]
    fn inner_errors_are_propagated() {
        let handler = ContextHandler::new(Arc::new(Failing));
        let err = handler
            .handle(&Context::background(), LogRecord::new(Level::Info, "m"))
            .expect_err("inner handler fails");
        assert!(matches!(err, HandleError::Rejected(reason) if reason == "full"));
    }

    #[test]
    fn bound_attrs_put_ids_first() {
        let handler = ContextHandler::new(memory()).set_context_attrs(vec![
            ContextAttr::new("svc").with_default("api"),
            ContextAttr::log_id(),
        ]);
        let ctx = set_log_id(&Context::background(), LogId::from_string("c"));
        let bound = handler.bound_attrs(&ctx);
        let keys: Vec<&str> = bound.iter().map(ContextAttr::key).collect();
        assert_eq!(keys, ["logId", "parentLogId", "svc"]);
        assert_eq!(bound[0].default_value(), Some(&crate::Value::from("c")));
        assert_eq!(bound[1].default_value(), None);
    }
}
