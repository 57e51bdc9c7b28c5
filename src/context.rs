// SPDX-License-Identifier: MIT OR Apache-2.0

//! Immutable, layered contexts and the log id lineage they carry.
//!
//! A [`Context`] is the request- or task-scoped snapshot threaded explicitly through a call
//! chain. The logging layer only ever *reads* it: at each logging call the
//! [`ContextHandler`](crate::ContextHandler) resolves its attribute descriptors against the
//! context passed to that call.
//!
//! # Lineage
//!
//! Two slots are reserved for the log id lineage:
//!
//! - the *current* log id, written by [`with_log_context`], and
//! - the *parent* log id, written by [`with_child_log_context`], which shifts the current id
//!   into the parent slot and mints a new current id.
//!
//! ```rust
//! use ctxlog::context::{Context, log_id, parent_log_id, with_child_log_context, with_log_context};
//!
//! let request = with_log_context(&Context::background());
//! let task = with_child_log_context(&request);
//!
//! assert_eq!(parent_log_id(&task), log_id(&request));
//! // the request context is untouched
//! assert!(parent_log_id(&request).is_nil());
//! ```
//!
//! Reads never fail: a missing slot, or a slot holding a value of an unexpected type, yields
//! [`LogId::NIL`](crate::LogId::NIL).

mod context_impl;
mod lineage;


pub use context_impl::Context;
pub use lineage::{
    log_id, parent_log_id, set_log_id, set_parent_log_id, with_child_log_context,
    with_log_context,
};
pub(crate) use lineage::{log_id_value, parent_log_id_value};
