//! Metric collection batches.
//!
//! A batch is nested the way a collection cycle produces it: scopes (meters),
//! then instruments, then one point per distinct attribute set.

use serde::{Deserialize, Serialize};

use crate::attribute::{AttributeValue, KeyValue};

/// Numeric value of a sum or last-value point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl From<i64> for Number {
    fn from(v: i64) -> Self {
        Number::I64(v)
    }
}

impl From<u64> for Number {
    fn from(v: u64) -> Self {
        Number::U64(v)
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Number::F64(v)
    }
}

impl From<Number> for AttributeValue {
    fn from(n: Number) -> Self {
        match n {
            Number::I64(v) => AttributeValue::I64(v),
            Number::U64(v) => AttributeValue::U64(v),
            Number::F64(v) => AttributeValue::F64(v),
        }
    }
}

/// Instrument kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentKind {
    #[default]
    Counter,
    UpDownCounter,
    Histogram,
    Gauge,
    ObservableCounter,
    ObservableUpDownCounter,
    ObservableGauge,
}

/// Aggregation temporality reported by a metric exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Temporality {
    #[default]
    Cumulative,
    Delta,
}

/// Static description of an instrument.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InstrumentDescriptor {
    pub name: String,

    /// Carried through JSON input; not rendered.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Unit, empty when absent.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub unit: String,

    #[serde(default)]
    pub kind: InstrumentKind,
}

impl InstrumentDescriptor {
    /// Create a descriptor with the given name and kind.
    pub fn new(name: impl Into<String>, kind: InstrumentKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Default::default()
        }
    }

    /// Set the unit.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }
}

/// Histogram point: bucket boundaries and a parallel sequence of counts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HistogramPoint {
    pub boundaries: Vec<f64>,
    pub counts: Vec<u64>,
    /// `sum` and `count` are carried through JSON input; the line shows only
    /// counts and buckets.
    #[serde(default)]
    pub sum: f64,
    #[serde(default)]
    pub count: u64,
}

impl HistogramPoint {
    /// Create a histogram point; `sum` and `count` start at zero.
    pub fn new(boundaries: Vec<f64>, counts: Vec<u64>) -> Self {
        Self {
            boundaries,
            count: counts.iter().sum(),
            counts,
            sum: 0.0,
        }
    }
}

/// Aggregated value of one point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointData {
    /// Dropped aggregation, carries no value.
    Drop,
    Sum { value: Number },
    LastValue { value: Number },
    Histogram(HistogramPoint),
}

/// One point for a distinct attribute set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointDataAttributes {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<KeyValue>,
    pub point: PointData,
}

impl PointDataAttributes {
    /// Create a point with no attributes.
    pub fn new(point: PointData) -> Self {
        Self {
            attributes: Vec::new(),
            point,
        }
    }

    /// Add an attribute to this point.
    pub fn with_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.attributes.push(KeyValue::new(key, value));
        self
    }
}

/// All points collected for one instrument.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricData {
    pub descriptor: InstrumentDescriptor,
    #[serde(default)]
    pub points: Vec<PointDataAttributes>,
}

/// Instrumentation scope (meter) identity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InstrumentationScope {
    pub name: String,
    /// Carried through JSON input; not rendered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl InstrumentationScope {
    /// Create a scope with the given meter name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }
}

/// Metrics of one meter.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScopeMetrics {
    pub scope: InstrumentationScope,
    #[serde(default)]
    pub metrics: Vec<MetricData>,
}

/// A complete collection batch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceMetrics {
    #[serde(default)]
    pub scope_metrics: Vec<ScopeMetrics>,
}

impl ResourceMetrics {
    /// Total number of points across all meters and instruments.
    pub fn point_count(&self) -> usize {
        self.scope_metrics
            .iter()
            .flat_map(|s| &s.metrics)
            .map(|m| m.points.len())
            .sum()
    }
}
