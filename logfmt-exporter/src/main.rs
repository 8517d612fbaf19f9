//! Replays newline-delimited JSON telemetry records through the logfmt exporters.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use logfmt_common::{LogRecord, Record, ResourceMetrics, SpanData};
use logfmt_exporter::config::{LogFormat, LoggingConfig};
use logfmt_exporter::{
    Destination, ExportResult, Exporter, ExporterConfig, ExporterSet, LogExporter, LogfmtLayer,
    SinkRegistry,
};

const FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// Render telemetry records as logfmt.
#[derive(Parser, Debug)]
#[command(name = "logfmt-export")]
#[command(about = "Render newline-delimited JSON telemetry records as logfmt")]
#[command(version)]
struct Args {
    /// Path to configuration file (JSON5 format).
    #[arg(short, long)]
    config: Option<String>,

    /// Input file with one JSON record per line (defaults to stdin).
    #[arg(short, long)]
    input: Option<String>,

    /// Log level (trace, debug, info, warn, error); overrides config.
    #[arg(long)]
    log_level: Option<String>,
}

/// One input line, tagged by signal.
#[derive(Debug, Deserialize)]
#[serde(tag = "signal", rename_all = "lowercase")]
enum InputRecord {
    Log(LogRecord),
    Span(SpanData),
    Metrics(ResourceMetrics),
}

fn export(exporters: &ExporterSet, record: InputRecord) -> ExportResult {
    match record {
        InputRecord::Log(r) => exporters.logs.export(&[Some(Record::Log(r))]),
        InputRecord::Span(s) => exporters.spans.export(&[Some(Record::Span(s))]),
        InputRecord::Metrics(m) => exporters.metrics.export(&m),
    }
}

/// Export every line of `reader`. Malformed lines are logged and skipped.
///
/// Returns the number of malformed lines.
fn replay<R: BufRead>(reader: R, exporters: &ExporterSet) -> io::Result<u64> {
    let mut malformed = 0u64;
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<InputRecord>(&line) {
            Ok(record) => {
                if let Err(e) = export(exporters, record) {
                    error!(line = index + 1, error = %e, "Export failed");
                }
            }
            Err(e) => {
                malformed += 1;
                warn!(line = index + 1, error = %e, "Skipping malformed record");
            }
        }
    }
    Ok(malformed)
}

/// Initialize diagnostics on stderr. Returns the diagnostics exporter when the
/// `logfmt` format is selected.
fn init_logging(
    config: &LoggingConfig,
    registry: &SinkRegistry,
) -> anyhow::Result<Option<Arc<LogExporter>>> {
    let log_level = config.level.parse().unwrap_or(Level::INFO);
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("logfmt_export={}", log_level).parse()?)
        .add_directive(format!("logfmt_exporter={}", log_level).parse()?);

    match config.format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .json()
                .init();
            Ok(None)
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
            Ok(None)
        }
        LogFormat::Logfmt => {
            let exporter = Arc::new(LogExporter::new(registry.sink(&Destination::Stderr)?));
            tracing_subscriber::registry()
                .with(filter)
                .with(LogfmtLayer::new(exporter.clone()))
                .init();
            Ok(Some(exporter))
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = if let Some(config_path) = &args.config {
        ExporterConfig::load_from_file(config_path)
            .with_context(|| format!("loading {config_path}"))?
    } else {
        ExporterConfig::default()
    };

    // Override log level from CLI
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    let registry = SinkRegistry::new();
    let diagnostics = init_logging(&config.logging, &registry)?;

    info!(
        logs = ?config.logs.destination,
        traces = ?config.traces.destination,
        metrics = ?config.metrics.destination,
        "Configuration loaded"
    );

    let exporters = config.build_with(&registry)?;

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening {path}"))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let malformed = replay(reader, &exporters)?;

    exporters.force_flush(FLUSH_TIMEOUT)?;
    exporters.shutdown(FLUSH_TIMEOUT)?;

    let logs = exporters.logs.stats();
    let spans = exporters.spans.stats();
    let metrics = exporters.metrics.stats();
    info!(
        logs_exported = logs.records_exported,
        spans_exported = spans.records_exported,
        metric_points_exported = metrics.records_exported,
        export_failures = logs.export_failures + spans.export_failures + metrics.export_failures,
        malformed,
        "Final statistics"
    );

    if let Some(diagnostics) = diagnostics {
        diagnostics.force_flush(FLUSH_TIMEOUT)?;
    }

    Ok(())
}
