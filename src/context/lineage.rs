// SPDX-License-Identifier: MIT OR Apache-2.0

//! Log id lineage stored in a [`Context`].

use super::context_impl::Context;
use crate::id_generator::new_id;
use crate::log_id::LogId;

// Private key types; nothing outside this module can read or shadow these slots.
struct CurrentLogIdKey;
struct ParentLogIdKey;

/// Returns the current log id of `ctx`, or [`LogId::NIL`] if none is bound.
pub fn log_id(ctx: &Context) -> LogId {
    ctx.get::<CurrentLogIdKey, LogId>().unwrap_or(LogId::NIL)
}

/// Returns the parent log id of `ctx`, or [`LogId::NIL`] if none is bound.
pub fn parent_log_id(ctx: &Context) -> LogId {
    ctx.get::<ParentLogIdKey, LogId>().unwrap_or(LogId::NIL)
}

pub fn set_log_id(ctx: &Context, id: LogId) -> Context {
    ctx.with_value::<CurrentLogIdKey>(id)
}

pub fn set_parent_log_id(ctx: &Context, id: LogId) -> Context {
    ctx.with_value::<ParentLogIdKey>(id)
}

/// Returns a context carrying a freshly generated log id.
///
/// A log id already present in `ctx` is replaced in the returned context; the parent id is
/// left as it was.
pub fn with_log_context(ctx: &Context) -> Context {
    set_log_id(ctx, new_id())
}

/// Returns a child context: the current log id of `ctx` becomes the parent id and a fresh
/// log id is generated.
///
/// ```
/// use ctxlog::context::{Context, log_id, parent_log_id, with_child_log_context, with_log_context};
///
/// let parent = with_log_context(&Context::background());
/// let child = with_child_log_context(&parent);
/// assert_eq!(parent_log_id(&child), log_id(&parent));
/// assert_ne!(log_id(&child), log_id(&parent));
/// ```
pub fn with_child_log_context(ctx: &Context) -> Context {
    let parent = log_id(ctx);
    let child = set_parent_log_id(ctx, parent);
    set_log_id(&child, new_id())
}

/// Resolver for the built-in `logId` attribute.
pub(crate) fn log_id_value(ctx: &Context) -> Option<crate::Value> {
    let id = log_id(ctx);
    (!id.is_nil()).then(|| crate::Value::from(id))
}

/// Resolver for the built-in `parentLogId` attribute.
pub(crate) fn parent_log_id_value(ctx: &Context) -> Option<crate::Value> {
    let id = parent_log_id(ctx);
    (!id.is_nil()).then(|| crate::Value::from(id))
}
