// SPDX-License-Identifier: MIT OR Apache-2.0

//! Logging macros.
//!
//! The macros take the attributes in [`attrs!`](crate::attrs) syntax and only evaluate them
//! when the level is enabled:
//!
//! ```
//! use ctxlog::{InMemoryHandler, Level, Logger, info, debug};
//! use ctxlog::context::{Context, with_log_context};
//! use std::sync::Arc;
//!
//! fn expensive() -> u64 {
//!     panic!("not evaluated for disabled levels")
//! }
//!
//! let memory = Arc::new(InMemoryHandler::with_level(Level::Info));
//! let logger = Logger::new(memory.clone());
//! let ctx = with_log_context(&Context::background());
//!
//! debug!(logger, "skipped", cost = expensive());
//! info!(logger, "started", port = 8080, "peer-addr" => "10.0.0.1");
//! info!(logger, ctx = ctx, "tagged");
//!
//! let lines = memory.drain_lines();
//! assert_eq!(lines[0], "level=INFO msg=started port=8080 peer-addr=10.0.0.1");
//! assert!(lines[1].starts_with("level=INFO msg=tagged logId="));
//! ```

/// Logs through a [`Logger`](crate::Logger) at a level chosen at runtime.
///
/// ```
/// use ctxlog::{InMemoryHandler, Level, Logger, log};
/// use ctxlog::context::Context;
/// use std::sync::Arc;
///
/// let memory = Arc::new(InMemoryHandler::with_level(Level::Debug));
/// let logger = Logger::new(memory.clone());
/// let level: Level = "warn".parse().unwrap();
/// log!(logger, level, format!("retry {}", 3), attempt = 3);
/// log!(logger, ctx = Context::background(), Level::Debug, "plain");
/// assert_eq!(memory.drain_logs(), "level=WARN msg=\"retry 3\" attempt=3\nlevel=DEBUG msg=plain");
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, ctx = $ctx:expr, $level:expr, $msg:expr $(, $($attrs:tt)*)?) => {{
        let logger: &$crate::Logger = &$logger;
        let ctx: &$crate::context::Context = &$ctx;
        let level: $crate::Level = $level;
        if logger.enabled(ctx, level) {
            let _ = logger.log_attrs(
                ctx,
                level,
                ::core::convert::AsRef::<str>::as_ref(&$msg),
                $crate::attrs![$($($attrs)*)?],
            );
        }
    }};
    ($logger:expr, $level:expr, $msg:expr $(, $($attrs:tt)*)?) => {
        $crate::log!(
            $logger,
            ctx = $crate::context::Context::background(),
            $level,
            $msg $(, $($attrs)*)?
        )
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, ctx = $ctx:expr, $msg:expr $(, $($attrs:tt)*)?) => {
        $crate::log!($logger, ctx = $ctx, $crate::Level::Debug, $msg $(, $($attrs)*)?)
    };
    ($logger:expr, $msg:expr $(, $($attrs:tt)*)?) => {
        $crate::log!($logger, $crate::Level::Debug, $msg $(, $($attrs)*)?)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, ctx = $ctx:expr, $msg:expr $(, $($attrs:tt)*)?) => {
        $crate::log!($logger, ctx = $ctx, $crate::Level::Info, $msg $(, $($attrs)*)?)
    };
    ($logger:expr, $msg:expr $(, $($attrs:tt)*)?) => {
        $crate::log!($logger, $crate::Level::Info, $msg $(, $($attrs)*)?)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, ctx = $ctx:expr, $msg:expr $(, $($attrs:tt)*)?) => {
        $crate::log!($logger, ctx = $ctx, $crate::Level::Warn, $msg $(, $($attrs)*)?)
    };
    ($logger:expr, $msg:expr $(, $($attrs:tt)*)?) => {
        $crate::log!($logger, $crate::Level::Warn, $msg $(, $($attrs)*)?)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, ctx = $ctx:expr, $msg:expr $(, $($attrs:tt)*)?) => {
        $crate::log!($logger, ctx = $ctx, $crate::Level::Error, $msg $(, $($attrs)*)?)
    };
    ($logger:expr, $msg:expr $(, $($attrs:tt)*)?) => {
        $crate::log!($logger, $crate::Level::Error, $msg $(, $($attrs)*)?)
    };
}

#[cfg(test)]
mod tests {
    use crate::context::{Context, set_log_id};
    use crate::log_id::LogId;
    use crate::{InMemoryHandler, Level, Logger};
    use std::cell::Cell;
    use std::sync::Arc;

    fn setup(level: Level) -> (Arc<InMemoryHandler>, Logger) {
        let memory = Arc::new(InMemoryHandler::with_level(level));
        let logger = Logger::new(memory.clone());
        (memory, logger)
    }

    #[test]
    fn leveled_macros() {
        let (memory, logger) = setup(Level::Debug);
        let ctx = set_log_id(&Context::background(), LogId::from_string("m1"));
        debug!(logger, "d");
        info!(logger, "i", a = 1);
        warn!(logger, ctx = ctx, "w", "b" => true,);
        error!(&logger, String::from("e"));
        assert_eq!(
            memory.drain_lines(),
            vec![
                "level=DEBUG msg=d",
                "level=INFO msg=i a=1",
                "level=WARN msg=w b=true logId=m1",
                "level=ERROR msg=e",
            ]
        );
    }

    #[test]
    fn disabled_levels_skip_attribute_evaluation() {
        let (memory, logger) = setup(Level::Error);
        let evaluated = Cell::new(0);
        let count = || {
            evaluated.set(evaluated.get() + 1);
            1
        };
        info!(logger, "skipped", n = count());
        error!(logger, "kept", n = count());
        assert_eq!(evaluated.get(), 1);
        assert_eq!(memory.drain_logs(), "level=ERROR msg=kept n=1");
    }

    #[test]
    fn macro_call_site_is_the_invocation() {
        let (memory, logger) = setup(Level::Info);
        let line = line!() + 1;
        info!(logger, "here");
        let source = memory.records()[0].source().expect("call site recorded");
        assert_eq!(source.line, line);
        assert!(source.file.ends_with("macros.rs"));
    }
}
