//! JSON Lines file sink.

use crate::error::DeliveryError;
use crate::traits::{OutputSink, SinkHandle};
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default buffer size for JSONL writing.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Writes one compact JSON object per line.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
    append: bool,
}

impl FileSink {
    /// File sink that truncates `path` when opened.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            append: false,
        }
    }

    /// Append to an existing file instead of truncating it.
    pub fn with_append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl OutputSink for FileSink {
    fn name(&self) -> &str {
        "file"
    }

    async fn open(&self) -> Result<Box<dyn SinkHandle>, DeliveryError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(self.append)
            .truncate(!self.append)
            .open(&self.path)?;

        info!(
            "Writing events to '{}'{}",
            self.path.display(),
            if self.append { " (append)" } else { "" }
        );

        Ok(Box::new(FileHandle {
            path: self.path.clone(),
            writer: BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file),
            lines: 0,
        }))
    }
}

struct FileHandle {
    path: PathBuf,
    writer: BufWriter<File>,
    lines: u64,
}

#[async_trait::async_trait]
impl SinkHandle for FileHandle {
    async fn deliver(&mut self, record: &Value) -> Result<(), DeliveryError> {
        serde_json::to_writer(&mut self.writer, record)?;
        writeln!(self.writer)?;
        self.lines += 1;
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), DeliveryError> {
        let mut handle = *self;
        handle.writer.flush()?;
        debug!("Closed '{}' after {} lines", handle.path.display(), handle.lines);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    async fn write_records(sink: &FileSink, records: &[Value]) {
        let mut handle = sink.open().await.unwrap();
        for record in records {
            handle.deliver(record).await.unwrap();
        }
        handle.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_file_sink_writes_json_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.jsonl");
        let sink = FileSink::new(&path);

        write_records(&sink, &[json!({"id": "a"}), json!({"id": "b", "tags": ["x"]})]).await;

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(serde_json::from_str::<Value>(lines[1]).unwrap(), json!({"id": "b", "tags": ["x"]}));
        assert!(!lines[0].contains('\n'));
    }

    #[tokio::test]
    async fn test_file_sink_truncates_by_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.jsonl");
        std::fs::write(&path, "old line\nold line\nold line\n").unwrap();

        write_records(&FileSink::new(&path), &[json!({"id": "new"})]).await;

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "{\"id\":\"new\"}\n");
    }

    #[tokio::test]
    async fn test_file_sink_append() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.jsonl");
        let sink = FileSink::new(&path).with_append(true);

        write_records(&sink, &[json!({"n": 1})]).await;
        write_records(&sink, &[json!({"n": 2})]).await;

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[tokio::test]
    async fn test_file_sink_open_fails_for_missing_directory() {
        let dir = TempDir::new().unwrap();
        let sink = FileSink::new(dir.path().join("missing").join("events.jsonl"));

        let result = sink.open().await;
        assert!(matches!(result, Err(DeliveryError::Io(_))));
    }
}
