//! Output sinks shared between exporters.
//!
//! A [`SharedSink`] is one lock around one destination. Exporters that write
//! to the same destination must hold clones of the same `SharedSink`; the
//! [`SinkRegistry`] hands those out.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Where logfmt lines are written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    #[default]
    Stdout,
    Stderr,
    /// Append to a file, creating it if missing.
    File(PathBuf),
}

/// Cloneable handle to a locked writer.
#[derive(Clone)]
pub struct SharedSink {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl SharedSink {
    /// Wrap an arbitrary writer.
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Sink writing to the process standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Sink writing to the process standard error.
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// Buffered sink appending to `path`.
    pub fn file(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Ok(Self::new(BufWriter::new(file)))
    }

    /// Open the sink for a destination.
    pub fn open(destination: &Destination) -> io::Result<Self> {
        match destination {
            Destination::Stdout => Ok(Self::stdout()),
            Destination::Stderr => Ok(Self::stderr()),
            Destination::File(path) => Self::file(path),
        }
    }

    /// Write `bytes` as one unit; no other writer on this sink can interleave.
    pub fn write_all(&self, bytes: &[u8]) -> io::Result<()> {
        self.inner.lock().write_all(bytes)
    }

    /// Flush the underlying writer.
    pub fn flush(&self) -> io::Result<()> {
        self.inner.lock().flush()
    }

    /// Whether two handles share the same lock.
    pub fn same_as(&self, other: &SharedSink) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for SharedSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSink")
            .field("handles", &Arc::strong_count(&self.inner))
            .finish()
    }
}

/// Hands out one [`SharedSink`] per distinct destination.
#[derive(Debug, Default)]
pub struct SinkRegistry {
    sinks: Mutex<HashMap<Destination, SharedSink>>,
}

impl SinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the sink for `destination`, opening it on first use.
    pub fn sink(&self, destination: &Destination) -> io::Result<SharedSink> {
        let mut sinks = self.sinks.lock();
        if let Some(sink) = sinks.get(destination) {
            return Ok(sink.clone());
        }
        let sink = SharedSink::open(destination)?;
        sinks.insert(destination.clone(), sink.clone());
        Ok(sink)
    }

    /// Number of distinct destinations opened so far.
    pub fn len(&self) -> usize {
        self.sinks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory writer, cloneable so tests can read back what exporters wrote.
#[derive(Debug, Clone, Default)]
pub struct BufferSink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discard everything written so far.
    pub fn clear(&self) {
        self.buf.lock().clear();
    }

    /// A [`SharedSink`] writing into this buffer.
    pub fn shared(&self) -> SharedSink {
        SharedSink::new(self.clone())
    }
}

impl Write for BufferSink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
