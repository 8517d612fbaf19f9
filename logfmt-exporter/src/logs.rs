//! Log record encoding and the log exporter.

use std::fmt::Write;
use std::time::Duration;

use logfmt_common::{LogRecord, Record};
use serde::{Deserialize, Serialize};

use crate::encode::LineWriter;
use crate::exporter::{
    BatchOutcome, ExportError, ExportResult, ExportState, Exporter, ExporterStats, MakeRecordable,
};
use crate::sink::SharedSink;

/// Field name used for a log record's event name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventNameKey {
    /// `event_name="..."`.
    #[default]
    EventName,
    /// `event_id="..."`, sharing the key with the numeric event id.
    EventId,
}

impl EventNameKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventNameKey::EventName => "event_name",
            EventNameKey::EventId => "event_id",
        }
    }
}

/// Write one log record as a logfmt line.
///
/// Field order: `level`, `msg`, attributes, `trace_id`, `span_id`,
/// `event_id`, event name.
pub fn encode_log_record<W: Write>(
    out: &mut W,
    record: &LogRecord,
    event_name_key: EventNameKey,
) -> std::fmt::Result {
    let mut line = LineWriter::new(out);
    line.raw("level", &record.severity_text)?;
    line.value("msg", &record.body)?;
    line.attributes(&record.attributes)?;
    line.identifier("trace_id", &record.trace_id)?;
    line.identifier("span_id", &record.span_id)?;
    if record.event_id != 0 {
        line.raw("event_id", record.event_id)?;
    }
    if !record.event_name.is_empty() {
        line.quoted(event_name_key.as_str(), &record.event_name)?;
    }
    line.finish()
}

/// Exports log records as logfmt lines.
#[derive(Debug)]
pub struct LogExporter {
    state: ExportState,
    event_name_key: EventNameKey,
}

impl LogExporter {
    pub fn new(sink: SharedSink) -> Self {
        Self {
            state: ExportState::new("log", sink),
            event_name_key: EventNameKey::default(),
        }
    }

    /// Choose the field name used for event names.
    pub fn with_event_name_key(mut self, key: EventNameKey) -> Self {
        self.event_name_key = key;
        self
    }

    pub fn is_shut_down(&self) -> bool {
        self.state.is_shut_down()
    }

    pub fn stats(&self) -> ExporterStats {
        self.state.stats()
    }
}

impl Exporter for LogExporter {
    type Batch = [Option<Record>];

    fn export(&self, batch: &[Option<Record>]) -> ExportResult {
        self.state.export_with(|buf| {
            let mut outcome = BatchOutcome::default();
            for entry in batch {
                match entry {
                    None => outcome.skipped += 1,
                    Some(Record::Log(record)) => {
                        encode_log_record(&mut *buf, record, self.event_name_key)?;
                        outcome.written += 1;
                    }
                    Some(other) => {
                        return Err(ExportError::UnexpectedRecord {
                            expected: "log",
                            found: other.kind(),
                        });
                    }
                }
            }
            Ok(outcome)
        })
    }

    fn force_flush(&self, _timeout: Duration) -> ExportResult {
        self.state.force_flush()
    }

    fn shutdown(&self, _timeout: Duration) -> ExportResult {
        self.state.shutdown()
    }
}

impl MakeRecordable for LogExporter {
    type Record = LogRecord;

    fn make_recordable(&self) -> LogRecord {
        LogRecord::default()
    }
}
