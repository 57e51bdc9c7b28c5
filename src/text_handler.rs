// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::Level;
use crate::attr::Attr;
use crate::context::Context;
use crate::handler::{HandleError, Handler, HandlerOptions, Scope};
use crate::log_record::LogRecord;
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/**
A handler that writes `key=value` lines.

```text
time=2024-05-01T10:00:00.000+02:00 level=INFO msg="start request" logId=3f1c0a9e2b7d4c51
```

The writer is shared by every handler derived through [`Handler::with_attrs`] and
[`Handler::with_group`]; each line is written under one lock, so lines from concurrent
callers never interleave.
 */
pub struct TextHandler<W> {
    writer: Arc<Mutex<W>>,
    options: HandlerOptions,
    scope: Scope,
}

impl TextHandler<std::io::Stdout> {
    /// A handler writing to standard output that follows the process-wide level.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout(), HandlerOptions::default())
    }
}

impl<W: Write + Send + 'static> TextHandler<W> {
    pub fn new(writer: W, options: HandlerOptions) -> Self {
        Self {
            writer: Arc::new(Mutex::new(writer)),
            options,
            scope: Scope::default(),
        }
    }

    pub fn options(&self) -> &HandlerOptions {
        &self.options
    }

    fn derive(&self, scope: Scope) -> Self {
        Self {
            writer: self.writer.clone(),
            options: self.options.clone(),
            scope,
        }
    }
}

impl<W> std::fmt::Debug for TextHandler<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextHandler")
            .field("options", &self.options)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl<W: Write + Send + 'static> Handler for TextHandler<W> {
    fn enabled(&self, _ctx: &Context, level: Level) -> bool {
        level >= self.options.min_level()
    }

    fn handle(&self, _ctx: &Context, record: LogRecord) -> Result<(), HandleError> {
        let mut line = self.scope.encode_text(&record, &self.options);
        line.push('\n');
        let mut writer = self.writer.lock();
        writer.write_all(line.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler> {
        Arc::new(self.derive(self.scope.with_attrs(attrs)))
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        Arc::new(self.derive(self.scope.with_group(name)))
    }
}
