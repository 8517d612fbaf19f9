//! Log records and finished spans.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::attribute::{AttributeValue, KeyValue};
use crate::id::{SpanId, TraceId};

/// Log severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Severity {
    /// Get the severity text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A log record handed to the log exporter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Severity text, rendered verbatim.
    #[serde(default)]
    pub severity_text: String,

    /// Message body.
    pub body: AttributeValue,

    /// Attributes in insertion order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<KeyValue>,

    #[serde(default)]
    pub trace_id: TraceId,

    #[serde(default)]
    pub span_id: SpanId,

    /// Numeric event id, 0 when absent.
    #[serde(default)]
    pub event_id: i64,

    /// Event name, empty when absent.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub event_name: String,
}

impl Default for LogRecord {
    fn default() -> Self {
        Self {
            severity_text: String::new(),
            body: AttributeValue::String(String::new()),
            attributes: Vec::new(),
            trace_id: TraceId::INVALID,
            span_id: SpanId::INVALID,
            event_id: 0,
            event_name: String::new(),
        }
    }
}

impl LogRecord {
    /// Create a record with the given severity and body.
    pub fn new(severity: Severity, body: impl Into<AttributeValue>) -> Self {
        Self {
            severity_text: severity.as_str().to_string(),
            body: body.into(),
            ..Default::default()
        }
    }

    /// Set the severity text.
    pub fn set_severity(&mut self, severity: Severity) {
        self.severity_text = severity.as_str().to_string();
    }

    /// Set the body.
    pub fn set_body(&mut self, body: impl Into<AttributeValue>) {
        self.body = body.into();
    }

    /// Append an attribute.
    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.push(KeyValue::new(key, value));
    }

    /// Add an attribute to this record.
    pub fn with_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.add_attribute(key, value);
        self
    }

    /// Attach the trace context.
    pub fn with_trace_context(mut self, trace_id: TraceId, span_id: SpanId) -> Self {
        self.trace_id = trace_id;
        self.span_id = span_id;
        self
    }

    /// Attach an event id and name.
    pub fn with_event(mut self, id: i64, name: impl Into<String>) -> Self {
        self.event_id = id;
        self.event_name = name.into();
        self
    }
}

/// A finished span handed to the span exporter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanData {
    pub name: String,

    /// Start time, UTC.
    pub start_time: DateTime<Utc>,

    /// Elapsed time, serialized as integer nanoseconds.
    #[serde(with = "crate::serde_nanos")]
    pub duration: Duration,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<KeyValue>,

    /// Status description, empty when absent.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default)]
    pub trace_id: TraceId,

    #[serde(default)]
    pub span_id: SpanId,

    /// Invalid for root spans.
    #[serde(default)]
    pub parent_span_id: SpanId,
}

impl Default for SpanData {
    fn default() -> Self {
        Self {
            name: String::new(),
            start_time: DateTime::<Utc>::default(),
            duration: Duration::ZERO,
            attributes: Vec::new(),
            description: String::new(),
            trace_id: TraceId::INVALID,
            span_id: SpanId::INVALID,
            parent_span_id: SpanId::INVALID,
        }
    }
}

impl SpanData {
    /// Create a span with the given name, start time and duration.
    pub fn new(name: impl Into<String>, start_time: DateTime<Utc>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            start_time,
            duration,
            ..Default::default()
        }
    }

    /// Whether this span has no parent.
    pub fn is_root(&self) -> bool {
        !self.parent_span_id.is_valid()
    }

    /// Append an attribute.
    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.push(KeyValue::new(key, value));
    }

    /// Add an attribute to this span.
    pub fn with_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.add_attribute(key, value);
        self
    }

    /// Set the span's own ids and its parent.
    pub fn with_ids(mut self, trace_id: TraceId, span_id: SpanId, parent_span_id: SpanId) -> Self {
        self.trace_id = trace_id;
        self.span_id = span_id;
        self.parent_span_id = parent_span_id;
        self
    }

    /// Set the status description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A single entry of a log or span export batch.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Log(LogRecord),
    Span(SpanData),
}

impl Record {
    /// Name of the record kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Record::Log(_) => "log",
            Record::Span(_) => "span",
        }
    }
}

impl From<LogRecord> for Record {
    fn from(r: LogRecord) -> Self {
        Record::Log(r)
    }
}

impl From<SpanData> for Record {
    fn from(s: SpanData) -> Self {
        Record::Span(s)
    }
}
