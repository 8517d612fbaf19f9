//! Span encoding and the span exporter.

use std::fmt::Write;
use std::time::Duration;

use logfmt_common::{Record, SpanData};

use crate::encode::LineWriter;
use crate::exporter::{
    BatchOutcome, ExportError, ExportResult, ExportState, Exporter, ExporterStats, MakeRecordable,
};
use crate::sink::SharedSink;

/// Second-precision start time format.
pub const START_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Write one span as a logfmt line.
///
/// Child spans log at `DEBUG`, root spans at `INFO`. Duration is integer
/// nanoseconds.
pub fn encode_span<W: Write>(out: &mut W, span: &SpanData) -> std::fmt::Result {
    let mut line = LineWriter::new(out);
    line.raw("level", if span.is_root() { "INFO" } else { "DEBUG" })?;
    line.quoted("name", &span.name)?;
    line.attributes(&span.attributes)?;
    line.raw("start", span.start_time.format(START_FORMAT))?;
    line.raw("duration", span.duration.as_nanos())?;
    if !span.description.is_empty() {
        line.quoted("description", &span.description)?;
    }
    line.identifier("trace_id", &span.trace_id)?;
    line.identifier("span_id", &span.span_id)?;
    line.identifier("parent_span_id", &span.parent_span_id)?;
    line.finish()
}

/// Exports finished spans as logfmt lines.
#[derive(Debug)]
pub struct SpanExporter {
    state: ExportState,
}

impl SpanExporter {
    pub fn new(sink: SharedSink) -> Self {
        Self {
            state: ExportState::new("span", sink),
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.state.is_shut_down()
    }

    pub fn stats(&self) -> ExporterStats {
        self.state.stats()
    }
}

impl Exporter for SpanExporter {
    type Batch = [Option<Record>];

    fn export(&self, batch: &[Option<Record>]) -> ExportResult {
        self.state.export_with(|buf| {
            let mut outcome = BatchOutcome::default();
            for entry in batch {
                match entry {
                    None => outcome.skipped += 1,
                    Some(Record::Span(span)) => {
                        encode_span(&mut *buf, span)?;
                        outcome.written += 1;
                    }
                    Some(other) => {
                        return Err(ExportError::UnexpectedRecord {
                            expected: "span",
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

impl MakeRecordable for SpanExporter {
    type Record = SpanData;

    fn make_recordable(&self) -> SpanData {
        SpanData::default()
    }
}
