//! Logfmt exporters for logs, spans and metrics.
//!
//! This crate renders telemetry records as single-line `key=value` text and
//! writes them to a shared sink.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐
//! │ Record source   │────>│ Log/Span/Metric │────>│  Shared sink    │
//! │ (batches)       │     │ exporters       │     │ (stdout, file)  │
//! └─────────────────┘     └─────────────────┘     └─────────────────┘
//! ```
//!
//! # Output
//!
//! ```text
//! level=INFO msg="hello" user="alice"
//! level=DEBUG name="child" start=2024-01-01T00:00:00 duration=5 parent_span_id=0101010101010101
//! level=INFO meter="m" instrument="i" value=42 unit=ms
//! ```
//!
//! Strings are quoted and backslash-escaped, arrays render as `[a,b]`,
//! identifiers as lowercase hex, and invalid identifiers are omitted.
//!
//! # Configuration
//!
//! See [`config::ExporterConfig`] for configuration options.

pub mod config;
pub mod encode;
pub mod exporter;
pub mod layer;
pub mod logs;
pub mod metrics;
pub mod pipeline;
pub mod sink;
pub mod spans;

pub use config::ExporterConfig;
pub use exporter::{
    ExportError, ExportResult, Exporter, ExporterStats, MakeRecordable, ShutdownFlag,
};
pub use layer::LogfmtLayer;
pub use logs::{EventNameKey, LogExporter};
pub use metrics::MetricExporter;
pub use pipeline::ExporterSet;
pub use sink::{BufferSink, Destination, SharedSink, SinkRegistry};
pub use spans::SpanExporter;
