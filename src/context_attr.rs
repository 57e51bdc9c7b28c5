// SPDX-License-Identifier: MIT OR Apache-2.0

//! Declarative rules for deriving log attributes from a [`Context`].
//!
//! A [`ContextAttr`] describes one output attribute:
//!
//! - a **key**; an empty key suppresses the attribute entirely
//! - an optional **default** value
//! - an optional **resolver** reading a value out of the context of the current call
//! - an optional **formatter** turning the resolved value into the attribute that is
//!   actually emitted, or suppressing it
//!
//! Resolution: when the resolver finds a value it wins over the default; otherwise the
//! default is used, which may itself be absent. Without a formatter the attribute is emitted
//! as `(key, value)` unless the value is absent.
//!
//! One mechanism covers "always emit this value", "emit the log id if there is one" and
//! "emit whatever the request stored under this key":
//!
//! ```rust
//! use ctxlog::{Attr, ContextAttr, Value};
//! use ctxlog::context::Context;
//!
//! struct TenantKey;
//!
//! let service = ContextAttr::new("service").with_default("billing");
//! let tenant = ContextAttr::from_context::<TenantKey, String>("tenant");
//!
//! let ctx = Context::background().with_value::<TenantKey>("acme".to_string());
//! assert_eq!(service.attr(&ctx), Some(Attr::new("service", "billing")));
//! assert_eq!(tenant.attr(&ctx), Some(Attr::new("tenant", "acme")));
//! assert_eq!(tenant.attr(&Context::background()), None);
//! ```

use crate::attr::{Attr, Value};
use crate::context::{Context, log_id_value, parent_log_id_value};
use crate::log_id::LogId;
use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

/// Output key of the current log id.
pub const LOG_ID_KEY: &str = "logId";
/// Output key of the parent log id.
pub const PARENT_LOG_ID_KEY: &str = "parentLogId";

/// Reads a value out of a context; `None` means "not found".
pub type ResolveFn = Arc<dyn Fn(&Context) -> Option<Value> + Send + Sync>;

/// Turns `(key, resolved value)` into the emitted attribute; `None` suppresses it.
pub type FormatFn = Arc<dyn Fn(&str, Option<&Value>) -> Option<Attr> + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    LogId,
    ParentLogId,
    Custom,
}

/// A rule deriving one log attribute from the context of each logging call.
///
/// Descriptors are immutable; the `with_*` builders return a modified copy.
#[derive(Clone)]
pub struct ContextAttr {
    key: String,
    default: Option<Value>,
    resolve: Option<ResolveFn>,
    format: Option<FormatFn>,
    kind: Kind,
}

impl ContextAttr {
    /// A descriptor with only a key. It emits nothing until given a default or resolver.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            default: None,
            resolve: None,
            format: None,
            kind: Kind::Custom,
        }
    }

    /// A descriptor emitting the value stored in the context under key type `K`.
    ///
    /// The value is found only if it is a `V`; a value of any other type reads as not found.
    pub fn from_context<K: 'static, V>(key: impl Into<String>) -> Self
    where
        V: Any + Clone + Into<Value>,
    {
        Self::new(key).with_resolver(|ctx: &Context| ctx.get::<K, V>().map(Into::into))
    }

    /// The built-in `logId` descriptor.
    pub fn log_id() -> Self {
        Self {
            kind: Kind::LogId,
            ..Self::new(LOG_ID_KEY).with_resolver(log_id_value)
        }
    }

    /// The built-in `parentLogId` descriptor.
    pub fn parent_log_id() -> Self {
        Self {
            kind: Kind::ParentLogId,
            ..Self::new(PARENT_LOG_ID_KEY).with_resolver(parent_log_id_value)
        }
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Like [`with_default`](Self::with_default), but `None` clears the default.
    pub fn with_default_opt(mut self, value: Option<Value>) -> Self {
        self.default = value;
        self
    }

    /// Uses `id` as default, or no default if `id` is nil.
    pub(crate) fn with_default_id(self, id: &LogId) -> Self {
        let value = (!id.is_nil()).then(|| Value::from(id));
        self.with_default_opt(value)
    }

    pub fn with_resolver<F>(mut self, resolve: F) -> Self
    where
        F: Fn(&Context) -> Option<Value> + Send + Sync + 'static,
    {
        self.resolve = Some(Arc::new(resolve));
        self
    }

    pub fn with_formatter<F>(mut self, format: F) -> Self
    where
        F: Fn(&str, Option<&Value>) -> Option<Attr> + Send + Sync + 'static,
    {
        self.format = Some(Arc::new(format));
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Whether this is one of the built-in log id descriptors.
    pub fn is_lineage(&self) -> bool {
        self.kind != Kind::Custom
    }

    /// The value this descriptor resolves to in `ctx`, before formatting.
    pub fn resolve_value(&self, ctx: &Context) -> Option<Value> {
        self.resolve
            .as_ref()
            .and_then(|resolve| resolve(ctx))
            .or_else(|| self.default.clone())
    }

    /// The attribute to emit for `ctx`, if any.
    pub fn attr(&self, ctx: &Context) -> Option<Attr> {
        if self.key.is_empty() {
            return None;
        }
        let value = self.resolve_value(ctx);
        match &self.format {
            Some(format) => format(&self.key, value.as_ref()),
            None => Self::default_format(&self.key, value.as_ref()),
        }
    }

    /// The formatter used when none is set: `(key, value)`, or nothing if the key is empty
    /// or the value absent.
    pub fn default_format(key: &str, value: Option<&Value>) -> Option<Attr> {
        if key.is_empty() {
            return None;
        }
        value.map(|value| Attr::new(key, value.clone()))
    }

    /// A copy whose default is pinned to the value resolved from `ctx`.
    ///
    /// Used when binding a logger: calls that later pass no context still see the value
    /// that was current at bind time, while a context that does carry a value still wins.
    pub(crate) fn pinned(&self, ctx: &Context) -> Self {
        let value = self.resolve_value(ctx);
        self.clone().with_default_opt(value)
    }
}

impl Debug for ContextAttr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextAttr")
            .field("key", &self.key)
            .field("default", &self.default)
            .field("resolve", &self.resolve.is_some())
            .field("format", &self.format.is_some())
            .field("kind", &self.kind)
            .finish()
    }
}
