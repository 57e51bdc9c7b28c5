// SPDX-License-Identifier: MIT OR Apache-2.0

//! The lineage identifier attached to log records.

use std::fmt::{Debug, Display};
use std::sync::Arc;

#[derive(Clone, PartialEq, Eq, Hash)]
enum Repr {
    Nil,
    Bytes([u8; 8]),
    Text(Arc<str>),
}

/**
Identifies one logical operation (a request, a spawned task) in log output.

A `LogId` is either eight random bytes, rendered as lowercase hex, or an opaque string
rendered as-is (useful for deterministic generators). There is exactly one zero value,
[`LogId::NIL`], meaning "no identifier assigned"; the all-zero byte array and the empty
string both normalize to it.

```
use ctxlog::LogId;

let id = LogId::from_bytes([0xde, 0xad, 0xbe, 0xef, 0, 0, 0, 1]);
assert_eq!(id.to_string(), "deadbeef00000001");
assert!(LogId::from_bytes([0; 8]).is_nil());
assert!(LogId::from_string("").is_nil());
```
*/
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct LogId(Repr);

impl LogId {
    /// The distinguished "absent" identifier.
    pub const NIL: LogId = LogId(Repr::Nil);

    pub fn from_bytes(bytes: [u8; 8]) -> LogId {
        if bytes == [0; 8] {
            LogId::NIL
        } else {
            LogId(Repr::Bytes(bytes))
        }
    }

    pub fn from_string(s: impl Into<String>) -> LogId {
        let s = s.into();
        if s.is_empty() {
            LogId::NIL
        } else {
            LogId(Repr::Text(Arc::from(s)))
        }
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        self.0 == Repr::Nil
    }

    /// The raw bytes, if this is a byte identifier.
    pub fn as_bytes(&self) -> Option<&[u8; 8]> {
        match &self.0 {
            Repr::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

impl Default for LogId {
    fn default() -> Self {
        LogId::NIL
    }
}

impl Display for LogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Repr::Nil => Ok(()),
            Repr::Bytes(b) => f.write_str(&hex::encode(b)),
            Repr::Text(s) => f.write_str(s),
        }
    }
}

impl Debug for LogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_nil() {
            f.write_str("LogId(nil)")
        } else {
            write!(f, "LogId({})", self)
        }
    }
}

/*
Boilerplate notes for LogId:

- Clone but not Copy: the string form is reference counted.
- PartialEq/Eq/Hash: derived; normalization in the constructors keeps NIL unique.
- Default: NIL.
- Ord: no meaningful ordering between random identifiers.
- From<&str>: deliberately absent, a string id should be an explicit choice.
*/
