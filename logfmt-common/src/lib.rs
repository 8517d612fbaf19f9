//! Logfmt Common Library
//!
//! This crate provides the telemetry record model consumed by the logfmt exporters:
//!
//! - [`attribute`] - Typed attribute values (`AttributeValue`, `Array`, `KeyValue`)
//! - [`id`] - Fixed-width trace and span identifiers
//! - [`record`] - Log records and finished spans
//! - [`metrics`] - Metric collection batches
//! - [`otel`] - Conversions from OpenTelemetry API types
//! - [`error`] - Error types

pub mod attribute;
pub mod error;
pub mod id;
pub mod metrics;
pub mod otel;
pub mod record;
pub mod serde_nanos;

// Re-export commonly used types at the crate root
pub use attribute::{Array, AttributeValue, KeyValue};
pub use error::{Error, Result};
pub use id::{Identifier, SpanId, TraceId};
pub use metrics::{
    HistogramPoint, InstrumentDescriptor, InstrumentKind, InstrumentationScope, MetricData,
    Number, PointData, PointDataAttributes, ResourceMetrics, ScopeMetrics, Temporality,
};
pub use record::{LogRecord, Record, Severity, SpanData};
