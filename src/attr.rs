// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key/value attributes carried by log records.

use crate::log_id::LogId;
use std::fmt::Display;
use std::time::Duration;

/// The value half of an [`Attr`].
///
/// Absence is not a `Value`; places where a value may be missing use `Option<Value>`, so an
/// absent value is never confused with an empty string or a zero.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Duration(Duration),
    /// A nested set of attributes. Handlers qualify the inner keys with the group key.
    Group(Vec<Attr>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Int(v) => write!(f, "{}", v),
            Value::Uint(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Duration(d) => write!(f, "{:?}", d),
            Value::Group(attrs) => {
                f.write_str("[")?;
                for (i, attr) in attrs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", attr)?;
                }
                f.write_str("]")
            }
        }
    }
}

macro_rules! value_from {
    ($variant:ident, $target:ty; $($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v as $target)
                }
            }
        )*
    };
}

value_from!(Int, i64; i8, i16, i32, i64, isize);
value_from!(Uint, u64; u8, u16, u32, u64, usize);
value_from!(Float, f64; f32, f64);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::String(v.clone())
    }
}

impl From<Duration> for Value {
    fn from(v: Duration) -> Self {
        Value::Duration(v)
    }
}

impl From<Vec<Attr>> for Value {
    fn from(v: Vec<Attr>) -> Self {
        Value::Group(v)
    }
}

impl From<LogId> for Value {
    fn from(v: LogId) -> Self {
        Value::String(v.to_string())
    }
}

impl From<&LogId> for Value {
    fn from(v: &LogId) -> Self {
        Value::String(v.to_string())
    }
}

/// A key/value pair attached to a log record.
///
/// ```
/// use ctxlog::{Attr, Value};
///
/// let attr = Attr::group("http", vec![Attr::new("status", 200), Attr::new("path", "/")]);
/// assert_eq!(attr.to_string(), "http=[status=200 path=/]");
/// assert_eq!(Attr::new("ok", true).value, Value::Bool(true));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub key: String,
    pub value: Value,
}

impl Attr {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Attr {
        Attr {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Attr {
        Attr::new(key, Value::String(value.into()))
    }

    pub fn int(key: impl Into<String>, value: i64) -> Attr {
        Attr::new(key, Value::Int(value))
    }

    pub fn duration(key: impl Into<String>, value: Duration) -> Attr {
        Attr::new(key, Value::Duration(value))
    }

    pub fn group(key: impl Into<String>, attrs: Vec<Attr>) -> Attr {
        Attr::new(key, Value::Group(attrs))
    }
}

impl<K: Into<String>, V: Into<Value>> From<(K, V)> for Attr {
    fn from((key, value): (K, V)) -> Self {
        Attr::new(key, value)
    }
}

impl Display for Attr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Builds a `Vec<Attr>` from `key = value` pairs, `"key" => value` pairs and prebuilt
/// [`Attr`]s, in any mix.
///
/// ```
/// use ctxlog::{Attr, attrs};
///
/// let extra = Attr::int("c", 3);
/// let attrs = attrs![a = 1, "b-key" => "two", extra];
/// assert_eq!(attrs.len(), 3);
/// assert_eq!(attrs[1].key, "b-key");
/// ```
#[macro_export]
macro_rules! attrs {
    (@acc [$($out:expr),*]) => {
        ::std::vec![$($out),*]
    };
    (@acc [$($out:expr),*] $key:ident = $value:expr $(, $($rest:tt)*)?) => {
        $crate::attrs!(@acc [$($out,)* $crate::Attr::new(stringify!($key), $value)] $($($rest)*)?)
    };
    (@acc [$($out:expr),*] $key:literal => $value:expr $(, $($rest:tt)*)?) => {
        $crate::attrs!(@acc [$($out,)* $crate::Attr::new($key, $value)] $($($rest)*)?)
    };
    (@acc [$($out:expr),*] $attr:expr $(, $($rest:tt)*)?) => {
        $crate::attrs!(@acc [$($out,)* $crate::Attr::from($attr)] $($($rest)*)?)
    };
    ($($rest:tt)*) => {
        $crate::attrs!(@acc [] $($rest)*)
    };
}
