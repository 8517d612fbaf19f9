//! The log, span and metric exporters managed together.

use std::time::Duration;

use logfmt_common::Temporality;
use tracing::info;

use crate::exporter::{ExportResult, Exporter};
use crate::logs::{EventNameKey, LogExporter};
use crate::metrics::MetricExporter;
use crate::sink::SharedSink;
use crate::spans::SpanExporter;

/// One exporter per signal.
#[derive(Debug)]
pub struct ExporterSet {
    pub logs: LogExporter,
    pub spans: SpanExporter,
    pub metrics: MetricExporter,
}

impl ExporterSet {
    pub fn new(logs: SharedSink, spans: SharedSink, metrics: SharedSink) -> Self {
        Self {
            logs: LogExporter::new(logs),
            spans: SpanExporter::new(spans),
            metrics: MetricExporter::new(metrics),
        }
    }

    /// All three exporters writing to one sink.
    pub fn shared(sink: SharedSink) -> Self {
        Self::new(sink.clone(), sink.clone(), sink)
    }

    pub fn with_event_name_key(mut self, key: EventNameKey) -> Self {
        self.logs = self.logs.with_event_name_key(key);
        self
    }

    pub fn with_temporality(mut self, temporality: Temporality) -> Self {
        self.metrics = self.metrics.with_temporality(temporality);
        self
    }

    /// Flush every exporter; the first error is returned after all were tried.
    pub fn force_flush(&self, timeout: Duration) -> ExportResult {
        let results = [
            self.logs.force_flush(timeout),
            self.spans.force_flush(timeout),
            self.metrics.force_flush(timeout),
        ];
        results.into_iter().collect()
    }

    /// Shut every exporter down.
    pub fn shutdown(&self, timeout: Duration) -> ExportResult {
        info!("Shutting down logfmt exporters");
        let results = [
            self.logs.shutdown(timeout),
            self.spans.shutdown(timeout),
            self.metrics.shutdown(timeout),
        ];
        results.into_iter().collect()
    }
}
