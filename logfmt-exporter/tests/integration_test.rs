//! End-to-end tests for the logfmt exporters.
//!
//! Each test drives a public exporter into an in-memory or file sink and
//! checks the exact bytes written.

use std::time::Duration;

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use logfmt_common::{
    AttributeValue, HistogramPoint, InstrumentDescriptor, InstrumentKind, InstrumentationScope,
    KeyValue, LogRecord, MetricData, PointData, PointDataAttributes, Record, ResourceMetrics,
    ScopeMetrics, Severity, SpanData, SpanId, TraceId,
};
use logfmt_exporter::encode::{value_to_string, write_quoted};
use logfmt_exporter::{
    BufferSink, ExportError, Exporter, ExporterConfig, ExporterSet, LogExporter, MetricExporter,
    SharedSink, SpanExporter,
};

const TIMEOUT: Duration = Duration::from_secs(1);

fn single_metric(
    meter: &str,
    descriptor: InstrumentDescriptor,
    point: PointDataAttributes,
) -> ResourceMetrics {
    ResourceMetrics {
        scope_metrics: vec![ScopeMetrics {
            scope: InstrumentationScope::new(meter),
            metrics: vec![MetricData {
                descriptor,
                points: vec![point],
            }],
        }],
    }
}

/// Reverse the escaping done by `write_quoted`.
fn unquote(s: &str) -> String {
    let inner = &s[1..s.len() - 1];
    let mut out = String::new();
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => panic!("dangling escape in {s}"),
        }
    }
    out
}

// =============================================================================
// Log Export
// =============================================================================

#[test]
fn test_log_record_with_attribute() {
    let buffer = BufferSink::new();
    let exporter = LogExporter::new(buffer.shared());

    let record = LogRecord::new(Severity::Info, "hello").with_attribute("user", "alice");
    exporter.export(&[Some(Record::Log(record))]).unwrap();

    assert_eq!(buffer.contents(), "level=INFO msg=\"hello\" user=\"alice\"\n");
}

#[test]
fn test_log_record_with_array_attribute() {
    let buffer = BufferSink::new();
    let exporter = LogExporter::new(buffer.shared());

    let record = LogRecord::new(Severity::Warn, "tags").with_attribute("tags", vec!["a", "b"]);
    exporter.export(&[Some(Record::Log(record))]).unwrap();

    assert_eq!(buffer.contents(), "level=WARN msg=\"tags\" tags=[\"a\",\"b\"]\n");
}

#[test]
fn test_log_record_omits_invalid_identifiers() {
    let buffer = BufferSink::new();
    let exporter = LogExporter::new(buffer.shared());

    let record = LogRecord::new(Severity::Error, "boom")
        .with_trace_context(TraceId::INVALID, SpanId::from_bytes([0xab; 8]));
    exporter.export(&[Some(Record::Log(record))]).unwrap();

    let out = buffer.contents();
    assert!(!out.contains("trace_id="));
    assert!(out.ends_with(" span_id=abababababababab\n"));
}

#[test]
fn test_export_after_shutdown_writes_nothing() {
    let buffer = BufferSink::new();
    let exporter = LogExporter::new(buffer.shared());
    exporter.shutdown(TIMEOUT).unwrap();

    let batch: Vec<Option<Record>> =
        vec![Some(Record::Log(LogRecord::new(Severity::Info, "late")))];
    let before = batch.clone();

    assert!(matches!(exporter.export(&batch), Err(ExportError::ShutDown)));
    assert!(buffer.is_empty());
    assert_eq!(batch, before);
    assert_eq!(exporter.stats().export_failures, 1);

    // Shutdown stays idempotent.
    exporter.shutdown(TIMEOUT).unwrap();
}

#[test]
fn test_otel_attributes_feed_export() {
    let buffer = BufferSink::new();
    let exporter = LogExporter::new(buffer.shared());

    let mut record = LogRecord::new(Severity::Info, "otel");
    record
        .attributes
        .push(opentelemetry::KeyValue::new("service", "checkout").into());
    record
        .attributes
        .push(opentelemetry::KeyValue::new("retries", 2i64).into());
    exporter.export(&[Some(Record::Log(record))]).unwrap();

    assert_eq!(
        buffer.contents(),
        "level=INFO msg=\"otel\" service=\"checkout\" retries=2\n"
    );
}

// =============================================================================
// Span Export
// =============================================================================

#[test]
fn test_child_span() {
    let buffer = BufferSink::new();
    let exporter = SpanExporter::new(buffer.shared());

    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let span = SpanData::new("child", start, Duration::from_nanos(5)).with_ids(
        TraceId::INVALID,
        SpanId::INVALID,
        SpanId::from_bytes([1; 8]),
    );
    exporter.export(&[Some(Record::Span(span))]).unwrap();

    assert_eq!(
        buffer.contents(),
        "level=DEBUG name=\"child\" start=2024-01-01T00:00:00 duration=5 parent_span_id=0101010101010101\n"
    );
}

#[test]
fn test_log_exporter_rejects_span_batch() {
    let buffer = BufferSink::new();
    let exporter = LogExporter::new(buffer.shared());

    let batch: Vec<Option<Record>> = vec![
        Some(Record::Log(LogRecord::new(Severity::Info, "ok"))),
        Some(Record::Span(SpanData::default())),
    ];
    let result = exporter.export(&batch);

    assert!(matches!(result, Err(ExportError::UnexpectedRecord { .. })));
    assert!(buffer.is_empty());
}

// =============================================================================
// Metric Export
// =============================================================================

#[test]
fn test_sum_with_unit() {
    let buffer = BufferSink::new();
    let exporter = MetricExporter::new(buffer.shared());

    let metrics = single_metric(
        "m",
        InstrumentDescriptor::new("i", InstrumentKind::Counter).with_unit("ms"),
        PointDataAttributes::new(PointData::Sum { value: 42i64.into() }),
    );
    exporter.export(&metrics).unwrap();

    assert_eq!(
        buffer.contents(),
        "level=INFO meter=\"m\" instrument=\"i\" value=42 unit=ms\n"
    );
    assert_eq!(exporter.stats().records_exported, 1);
}

#[test]
fn test_histogram_counts_and_buckets() {
    let buffer = BufferSink::new();
    let exporter = MetricExporter::new(buffer.shared());

    let metrics = single_metric(
        "http",
        InstrumentDescriptor::new("latency", InstrumentKind::Histogram),
        PointDataAttributes::new(PointData::Histogram(HistogramPoint::new(
            vec![0.5, 1.0],
            vec![1, 2, 3],
        )))
        .with_attribute("route", "/"),
    );
    exporter.export(&metrics).unwrap();

    assert_eq!(
        buffer.contents(),
        "level=INFO meter=\"http\" instrument=\"latency\" route=\"/\" counts=[1,2,3] buckets=[0.5,1]\n"
    );
}

// =============================================================================
// Sinks and Configuration
// =============================================================================

#[test]
fn test_signals_share_file_destination() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.logfmt");
    let json = format!(
        r#"{{
            logs: {{ destination: {{ file: "{0}" }} }},
            traces: {{ destination: {{ file: "{0}" }} }},
            metrics: {{ destination: {{ file: "{0}" }} }},
        }}"#,
        path.display()
    );
    let set = ExporterConfig::parse(&json).unwrap().build().unwrap();

    set.logs
        .export(&[Some(Record::Log(LogRecord::new(Severity::Info, "one")))])
        .unwrap();
    set.metrics
        .export(&single_metric(
            "m",
            InstrumentDescriptor::new("g", InstrumentKind::Gauge),
            PointDataAttributes::new(PointData::LastValue { value: 1.5f64.into() }),
        ))
        .unwrap();
    set.force_flush(TIMEOUT).unwrap();
    set.shutdown(TIMEOUT).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        written,
        "level=INFO msg=\"one\"\nlevel=INFO meter=\"m\" instrument=\"g\" value=1.5\n"
    );
}

#[test]
fn test_concurrent_exporters_keep_lines_whole() {
    let buffer = BufferSink::new();
    let set = std::sync::Arc::new(ExporterSet::shared(buffer.shared()));

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let set = set.clone();
            std::thread::spawn(move || {
                for i in 0..50 {
                    let record = LogRecord::new(Severity::Info, format!("t{t}-{i}"));
                    set.logs.export(&[Some(Record::Log(record))]).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let out = buffer.contents();
    assert_eq!(out.lines().count(), 200);
    assert!(out.lines().all(|l| l.starts_with("level=INFO msg=\"t")));
}

/// Writer whose every write and flush fails with a broken pipe.
struct BrokenPipe;

impl std::io::Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::ErrorKind::BrokenPipe.into())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Err(std::io::ErrorKind::BrokenPipe.into())
    }
}

#[test]
fn test_sink_failure_is_reported() {
    let exporter = LogExporter::new(SharedSink::new(BrokenPipe));

    let result = exporter.export(&[Some(Record::Log(LogRecord::new(Severity::Info, "lost")))]);

    match result {
        Err(ExportError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::BrokenPipe),
        other => panic!("expected an I/O error, got {other:?}"),
    }
    let stats = exporter.stats();
    assert_eq!(stats.export_failures, 1);
    assert_eq!(stats.records_exported, 0);
    assert!(exporter.force_flush(TIMEOUT).is_err());

    // The exporter stays usable; shutdown still succeeds.
    exporter.shutdown(TIMEOUT).unwrap();
}

#[test]
fn test_custom_writer_sink() {
    let buffer = BufferSink::new();
    let sink = SharedSink::new(buffer.clone());
    let exporter = LogExporter::new(sink);

    exporter
        .export(&[Some(Record::Log(LogRecord::new(Severity::Debug, 7i64)))])
        .unwrap();
    assert_eq!(buffer.contents(), "level=DEBUG msg=7\n");
}

// =============================================================================
// Rendering Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_quoted_strings_round_trip(s in ".*") {
        let mut out = String::new();
        write_quoted(&mut out, &s).unwrap();

        prop_assert!(out.starts_with('"') && out.ends_with('"'));
        prop_assert!(!out.contains('\n'));
        prop_assert_eq!(unquote(&out), s);
    }

    #[test]
    fn prop_integers_parse_back(v in any::<i64>()) {
        let rendered = value_to_string(&AttributeValue::I64(v));
        prop_assert_eq!(rendered.parse::<i64>().unwrap(), v);
    }

    #[test]
    fn prop_booleans_parse_back(v in any::<bool>()) {
        let rendered = value_to_string(&AttributeValue::Bool(v));
        prop_assert_eq!(rendered.parse::<bool>().unwrap(), v);
    }

    #[test]
    fn prop_export_is_deterministic(
        body in "[a-z ]{0,16}",
        key in "[a-z]{1,8}",
        n in any::<i64>(),
    ) {
        let first = BufferSink::new();
        let second = BufferSink::new();
        let record = LogRecord::new(Severity::Info, body.as_str())
            .with_attribute(key.as_str(), n);

        LogExporter::new(first.shared())
            .export(&[Some(Record::Log(record.clone()))])
            .unwrap();
        LogExporter::new(second.shared())
            .export(&[Some(Record::Log(record))])
            .unwrap();

        prop_assert_eq!(first.contents(), second.contents());
    }

    #[test]
    fn prop_invalid_identifiers_never_rendered(name in "[a-z]{1,8}") {
        let buffer = BufferSink::new();
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let span = SpanData::new(name, start, Duration::ZERO);
        SpanExporter::new(buffer.shared())
            .export(&[Some(Record::Span(span))])
            .unwrap();

        let out = buffer.contents();
        prop_assert!(out.starts_with("level=INFO "));
        prop_assert!(!out.contains("_id="));
    }
}

#[test]
fn test_key_value_constructor() {
    let kv = KeyValue::new("ok", true);
    assert_eq!(kv.value, AttributeValue::Bool(true));
}
