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
A handler that writes one JSON object per line.

```text
{"time":"2024-05-01T10:00:00.000+02:00","level":"INFO","msg":"end request","code":200,"logId":"3f1c0a9e2b7d4c51"}
```

Keys keep the order in which they were added and are never overwritten: an attribute
that repeats a key, including `time`, `level` or `msg`, is written again. Groups become
nested objects; durations are written as integer nanoseconds.
*/
pub struct JsonHandler<W> {
    writer: Arc<Mutex<W>>,
    options: HandlerOptions,
    scope: Scope,
}

impl<W: Write + Send + 'static> JsonHandler<W> {
    pub fn new(writer: W, options: HandlerOptions) -> Self {
        Self {
            writer: Arc::new(Mutex::new(writer)),
            options,
            scope: Scope::default(),
        }
    }

    fn derive(&self, scope: Scope) -> Self {
        Self {
            writer: self.writer.clone(),
            options: self.options.clone(),
            scope,
        }
    }
}

impl<W> std::fmt::Debug for JsonHandler<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonHandler")
            .field("options", &self.options)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl<W: Write + Send + 'static> Handler for JsonHandler<W> {
    fn enabled(&self, _ctx: &Context, level: Level) -> bool {
        level >= self.options.min_level()
    }

    fn handle(&self, _ctx: &Context, record: LogRecord) -> Result<(), HandleError> {
        let object = self.scope.encode_json(&record, &self.options);
        let mut line = serde_json::to_vec(&object)?;
        line.push(b'\n');
        let mut writer = self.writer.lock();
        writer.write_all(&line)?;
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
