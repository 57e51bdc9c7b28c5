// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core Context implementation.

use std::any::{Any, TypeId};
use std::fmt::Debug;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// One binding layered on top of a parent context.
pub(crate) struct ContextInner {
    pub(crate) parent: Option<Arc<ContextInner>>,
    pub(crate) key: TypeId,
    pub(crate) key_name: &'static str,
    pub(crate) value: Arc<dyn Any + Send + Sync>,
}

/// An immutable, layered key/value snapshot passed along a call chain.
///
/// Keys are *types*: any `'static` type, typically a private zero-sized struct, names a slot,
/// so two libraries can never collide on a key by accident. Values may be of any
/// `Send + Sync` type.
///
/// Binding a value never changes an existing context; [`with_value`](Context::with_value)
/// returns a new context that layers the binding on top of the old one, and the old context
/// stays valid and unchanged for everyone still holding it. Contexts are cheap to clone
/// (one `Arc`).
///
/// # Examples
///
/// ```rust
/// use ctxlog::context::Context;
///
/// struct RequestId;
///
/// let root = Context::background();
/// let request = root.with_value::<RequestId>("6c8b715a".to_string());
///
/// assert_eq!(request.get::<RequestId, String>().as_deref(), Some("6c8b715a"));
/// assert_eq!(root.get::<RequestId, String>(), None);
///
/// // The stored value is a String, so asking for another type finds nothing.
/// assert_eq!(request.get::<RequestId, u64>(), None);
/// ```
#[derive(Clone, Default)]
pub struct Context {
    pub(crate) inner: Option<Arc<ContextInner>>,
}

impl Context {
    /// The empty context.
    #[inline]
    pub const fn background() -> Context {
        Context { inner: None }
    }

    /// Returns a new context where key `K` is bound to `value`.
    ///
    /// An earlier binding of `K` is shadowed in the returned context only.
    pub fn with_value<K: 'static>(&self, value: impl Any + Send + Sync) -> Context {
        Context {
            inner: Some(Arc::new(ContextInner {
                parent: self.inner.clone(),
                key: TypeId::of::<K>(),
                key_name: std::any::type_name::<K>(),
                value: Arc::new(value),
            })),
        }
    }

    /// Returns the value bound to key `K`, whatever its type.
    pub fn value<K: 'static>(&self) -> Option<&(dyn Any + Send + Sync)> {
        let key = TypeId::of::<K>();
        let mut cursor = self.inner.as_deref();
        while let Some(node) = cursor {
            if node.key == key {
                return Some(node.value.as_ref());
            }
            cursor = node.parent.as_deref();
        }
        None
    }

    /// Returns a clone of the value bound to key `K` if it is a `V`.
    ///
    /// A binding of another type is treated exactly like a missing binding.
    pub fn get<K: 'static, V: Any + Clone>(&self) -> Option<V> {
        self.value::<K>()?.downcast_ref::<V>().cloned()
    }

    /// Whether no values have been bound.
    pub fn is_empty(&self) -> bool {
        self.inner.is_none()
    }

    /// Number of bindings layered in this context, shadowed ones included.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut cursor = self.inner.as_deref();
        while let Some(node) = cursor {
            depth += 1;
            cursor = node.parent.as_deref();
        }
        depth
    }
}

impl PartialEq for Context {
    /// Two contexts are equal when they are the same snapshot.
    fn eq(&self, other: &Self) -> bool {
        match (&self.inner, &other.inner) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Context {}

impl Hash for Context {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.as_ref().map(Arc::as_ptr).hash(state);
    }
}

impl Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys = Vec::new();
        let mut cursor = self.inner.as_deref();
        while let Some(node) = cursor {
            keys.push(node.key_name);
            cursor = node.parent.as_deref();
        }
        f.debug_struct("Context").field("keys", &keys).finish()
    }
}
