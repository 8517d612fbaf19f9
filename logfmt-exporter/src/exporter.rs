//! Exporter lifecycle shared by the log, span and metric exporters.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::sink::SharedSink;

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Exporter is shut down")]
    ShutDown,

    #[error("Unexpected {found} record in a {expected} batch")]
    UnexpectedRecord {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Sink error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Formatting error")]
    Format(#[from] fmt::Error),
}

/// Outcome of an exporter operation.
pub type ExportResult = Result<(), ExportError>;

/// Common exporter operations.
pub trait Exporter: Send + Sync {
    /// What one `export` call consumes.
    type Batch: ?Sized;

    /// Render and write a batch. Fails without writing once shut down.
    fn export(&self, batch: &Self::Batch) -> ExportResult;

    /// Flush the sink. The timeout is accepted but not enforced.
    fn force_flush(&self, timeout: Duration) -> ExportResult;

    /// Stop accepting batches. Idempotent.
    fn shutdown(&self, timeout: Duration) -> ExportResult;
}

/// Exporters that hand out empty records for the pipeline to populate.
pub trait MakeRecordable {
    type Record;

    fn make_recordable(&self) -> Self::Record;
}

/// Monotonic shut-down flag; never resets once set.
#[derive(Debug, Default)]
pub struct ShutdownFlag(AtomicBool);

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_shut_down(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Set the flag. Returns `true` if this call performed the transition.
    pub fn trigger(&self) -> bool {
        !self.0.swap(true, Ordering::SeqCst)
    }
}

/// Statistics for one exporter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExporterStats {
    pub batches_exported: u64,
    pub records_exported: u64,
    pub records_skipped: u64,
    pub export_failures: u64,
}

/// Lines written and entries skipped while rendering one batch.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct BatchOutcome {
    pub written: u64,
    pub skipped: u64,
}

/// State embedded by every exporter: sink, shut-down flag and statistics.
#[derive(Debug)]
pub(crate) struct ExportState {
    signal: &'static str,
    sink: SharedSink,
    shutdown: ShutdownFlag,
    stats: RwLock<ExporterStats>,
}

impl ExportState {
    pub fn new(signal: &'static str, sink: SharedSink) -> Self {
        Self {
            signal,
            sink,
            shutdown: ShutdownFlag::new(),
            stats: RwLock::new(ExporterStats::default()),
        }
    }

    /// Render a batch into memory, then write it to the sink in one locked
    /// write. Nothing reaches the sink if rendering fails.
    pub fn export_with<F>(&self, render: F) -> ExportResult
    where
        F: FnOnce(&mut String) -> Result<BatchOutcome, ExportError>,
    {
        if self.shutdown.is_shut_down() {
            warn!(signal = self.signal, "Export rejected, exporter is shut down");
            self.stats.write().export_failures += 1;
            return Err(ExportError::ShutDown);
        }

        let mut buf = String::new();
        let result = render(&mut buf).and_then(|outcome| {
            if !buf.is_empty() {
                self.sink.write_all(buf.as_bytes())?;
            }
            Ok(outcome)
        });

        let mut stats = self.stats.write();
        match result {
            Ok(outcome) => {
                stats.batches_exported += 1;
                stats.records_exported += outcome.written;
                stats.records_skipped += outcome.skipped;
                debug!(
                    signal = self.signal,
                    written = outcome.written,
                    skipped = outcome.skipped,
                    "Exported batch"
                );
                Ok(())
            }
            Err(e) => {
                stats.export_failures += 1;
                warn!(signal = self.signal, error = %e, "Export failed");
                Err(e)
            }
        }
    }

    pub fn force_flush(&self) -> ExportResult {
        trace!(signal = self.signal, "Flushing sink");
        self.sink.flush()?;
        Ok(())
    }

    pub fn shutdown(&self) -> ExportResult {
        if self.shutdown.trigger() {
            info!(signal = self.signal, "Exporter shut down");
        }
        Ok(())
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_shut_down()
    }

    pub fn stats(&self) -> ExporterStats {
        self.stats.read().clone()
    }
}
