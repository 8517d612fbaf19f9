//! Bridge from `tracing` events to the log exporter.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use logfmt_common::{AttributeValue, KeyValue, LogRecord, Record, Severity};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

use crate::exporter::Exporter;
use crate::logs::LogExporter;

/// Events from this crate are not bridged; the exporter logs through `tracing`
/// itself.
const OWN_TARGET: &str = "logfmt_exporter";

/// Map a `tracing` level to a log severity.
pub fn level_to_severity(level: &Level) -> Severity {
    match *level {
        Level::TRACE => Severity::Trace,
        Level::DEBUG => Severity::Debug,
        Level::INFO => Severity::Info,
        Level::WARN => Severity::Warn,
        Level::ERROR => Severity::Error,
    }
}

/// A `tracing_subscriber` layer exporting every event as a log record.
///
/// Attributes are, in order: `basename`, `line`, `thread`, then the event's
/// own fields. The `message` field becomes the record body.
pub struct LogfmtLayer {
    exporter: Arc<LogExporter>,
}

impl LogfmtLayer {
    pub fn new(exporter: Arc<LogExporter>) -> Self {
        Self { exporter }
    }

    /// Build the log record for one event.
    pub fn record_for(event: &Event<'_>) -> LogRecord {
        let metadata = event.metadata();
        let mut record = LogRecord::new(level_to_severity(metadata.level()), "");

        if let Some(basename) = metadata
            .file()
            .and_then(|f| Path::new(f).file_name())
            .and_then(|f| f.to_str())
        {
            record.add_attribute("basename", basename);
        }
        if let Some(line) = metadata.line() {
            record.add_attribute("line", line);
        }
        let thread = std::thread::current();
        let thread_name = match thread.name() {
            Some(name) => name.to_string(),
            None => format!("{:?}", thread.id()),
        };
        record.add_attribute("thread", thread_name);

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        if let Some(message) = visitor.message {
            record.set_body(message);
        }
        record.attributes.extend(visitor.fields);
        record
    }
}

impl<S: Subscriber> Layer<S> for LogfmtLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if event.metadata().target().starts_with(OWN_TARGET) {
            return;
        }
        let record = Self::record_for(event);
        // Failures are counted in the exporter's stats; reporting them here
        // would re-enter this layer.
        let _ = self.exporter.export(&[Some(Record::Log(record))]);
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: Vec<KeyValue>,
}

impl FieldVisitor {
    fn push(&mut self, field: &Field, value: AttributeValue) {
        self.fields.push(KeyValue {
            key: field.name().to_string(),
            value,
        });
    }
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.push(field, value.into());
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, value.into());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, value.into());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field, value.into());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, value.into());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        } else {
            self.push(field, format!("{value:?}").into());
        }
    }
}
