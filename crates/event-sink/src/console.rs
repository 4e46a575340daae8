//! Console sink: pretty-printed records on stdout.

use crate::error::DeliveryError;
use crate::traits::{OutputSink, SinkHandle};
use serde_json::Value;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Line printed after every record.
pub const SEPARATOR: &str = "----------------------------------------";

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Prints each record as indented JSON followed by a separator line.
pub struct ConsoleSink {
    writer: SharedWriter,
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleSink {
    /// Console sink writing to stdout.
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }

    /// Console sink writing to any writer.
    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
        }
    }
}

#[async_trait::async_trait]
impl OutputSink for ConsoleSink {
    fn name(&self) -> &str {
        "console"
    }

    async fn open(&self) -> Result<Box<dyn SinkHandle>, DeliveryError> {
        Ok(Box::new(ConsoleHandle {
            writer: Arc::clone(&self.writer),
        }))
    }
}

struct ConsoleHandle {
    writer: SharedWriter,
}

impl ConsoleHandle {
    fn locked<T>(&self, f: impl FnOnce(&mut dyn Write) -> io::Result<T>) -> io::Result<T> {
        let mut guard = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut **guard)
    }
}

#[async_trait::async_trait]
impl SinkHandle for ConsoleHandle {
    async fn deliver(&mut self, record: &Value) -> Result<(), DeliveryError> {
        let rendered = serde_json::to_string_pretty(record)?;
        self.locked(|out| {
            writeln!(out, "{rendered}")?;
            writeln!(out, "{SEPARATOR}")?;
            out.flush()
        })?;
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), DeliveryError> {
        self.locked(|out| out.flush())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_console_prints_pretty_json_and_separator() {
        let buffer = Buffer::default();
        let sink = ConsoleSink::with_writer(buffer.clone());

        let mut handle = sink.open().await.unwrap();
        handle.deliver(&json!({"id": "p1234", "age": 30})).await.unwrap();
        handle.deliver(&json!({"id": "p5678"})).await.unwrap();
        handle.close().await.unwrap();

        let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert_eq!(output.matches(SEPARATOR).count(), 2);
        assert!(output.starts_with("{\n  \""));
        assert!(output.contains("  \"id\": \"p1234\""));
        assert!(output.contains(&format!("}}\n{SEPARATOR}\n")));
        assert_eq!(SEPARATOR.len(), 40);
    }
}
