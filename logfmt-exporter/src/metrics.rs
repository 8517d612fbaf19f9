//! Metric point encoding and the metric exporter.

use std::fmt::Write;
use std::time::Duration;

use logfmt_common::{
    AttributeValue, InstrumentDescriptor, InstrumentKind, PointData, PointDataAttributes,
    ResourceMetrics, Temporality,
};

use crate::encode::{LineWriter, write_display};
use crate::exporter::{BatchOutcome, ExportResult, ExportState, Exporter, ExporterStats};
use crate::sink::SharedSink;

/// Write one metric point as a logfmt line.
///
/// Field order: `level`, `meter`, `instrument`, point attributes, the
/// point's value fields, `unit`.
pub fn encode_point<W: Write>(
    out: &mut W,
    meter: &str,
    descriptor: &InstrumentDescriptor,
    point: &PointDataAttributes,
) -> std::fmt::Result {
    let mut line = LineWriter::new(out);
    line.raw("level", "INFO")?;
    line.quoted("meter", meter)?;
    line.quoted("instrument", &descriptor.name)?;
    line.attributes(&point.attributes)?;
    match &point.point {
        PointData::Drop => {}
        PointData::Sum { value } | PointData::LastValue { value } => {
            line.value("value", &AttributeValue::from(*value))?;
        }
        PointData::Histogram(h) => {
            line.seq("counts", &h.counts, write_display)?;
            line.seq("buckets", &h.boundaries, write_display)?;
        }
    }
    if !descriptor.unit.is_empty() {
        line.raw("unit", &descriptor.unit)?;
    }
    line.finish()
}

/// Write every point of a collection batch, one line each.
///
/// Returns the number of lines written.
pub fn encode_metrics<W: Write>(
    out: &mut W,
    metrics: &ResourceMetrics,
) -> Result<u64, std::fmt::Error> {
    let mut written = 0;
    for scope in &metrics.scope_metrics {
        for metric in &scope.metrics {
            for point in &metric.points {
                encode_point(&mut *out, &scope.scope.name, &metric.descriptor, point)?;
                written += 1;
            }
        }
    }
    Ok(written)
}

/// Exports metric collection batches as logfmt lines.
#[derive(Debug)]
pub struct MetricExporter {
    state: ExportState,
    temporality: Temporality,
}

impl MetricExporter {
    pub fn new(sink: SharedSink) -> Self {
        Self {
            state: ExportState::new("metric", sink),
            temporality: Temporality::default(),
        }
    }

    /// Set the aggregation temporality reported to the pipeline.
    pub fn with_temporality(mut self, temporality: Temporality) -> Self {
        self.temporality = temporality;
        self
    }

    /// Temporality requested from the collection pipeline; the same for every
    /// instrument kind.
    pub fn aggregation_temporality(&self, _kind: InstrumentKind) -> Temporality {
        self.temporality
    }

    pub fn is_shut_down(&self) -> bool {
        self.state.is_shut_down()
    }

    pub fn stats(&self) -> ExporterStats {
        self.state.stats()
    }
}

impl Exporter for MetricExporter {
    type Batch = ResourceMetrics;

    fn export(&self, batch: &ResourceMetrics) -> ExportResult {
        self.state.export_with(|buf| {
            let written = encode_metrics(buf, batch)?;
            Ok(BatchOutcome {
                written,
                skipped: 0,
            })
        })
    }

    fn force_flush(&self, _timeout: Duration) -> ExportResult {
        self.state.force_flush()
    }

    fn shutdown(&self, _timeout: Duration) -> ExportResult {
        self.state.shutdown()
    }
}
