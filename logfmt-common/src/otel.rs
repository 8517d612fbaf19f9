//! Conversions from OpenTelemetry API types.
//!
//! Lets records assembled by an OpenTelemetry-based pipeline be handed to the
//! logfmt exporters without re-encoding attribute values by hand.

use opentelemetry::trace::{SpanId as OtelSpanId, TraceId as OtelTraceId};
use opentelemetry::{Array as OtelArray, KeyValue as OtelKeyValue, Value};

use crate::attribute::{Array, AttributeValue, KeyValue};
use crate::id::{SpanId, TraceId};

impl From<Value> for AttributeValue {
    #[allow(unreachable_patterns)]
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(v) => AttributeValue::Bool(v),
            Value::I64(v) => AttributeValue::I64(v),
            Value::F64(v) => AttributeValue::F64(v),
            Value::String(v) => AttributeValue::String(v.to_string()),
            Value::Array(array) => AttributeValue::Array(Array::from(array)),
            other => AttributeValue::String(other.to_string()),
        }
    }
}

impl From<OtelArray> for Array {
    #[allow(unreachable_patterns)]
    fn from(array: OtelArray) -> Self {
        match array {
            OtelArray::Bool(v) => Array::Bool(v),
            OtelArray::I64(v) => Array::I64(v),
            OtelArray::F64(v) => Array::F64(v),
            OtelArray::String(v) => Array::String(v.iter().map(|s| s.to_string()).collect()),
            other => Array::String(vec![other.to_string()]),
        }
    }
}

impl From<OtelKeyValue> for KeyValue {
    fn from(kv: OtelKeyValue) -> Self {
        KeyValue {
            key: kv.key.as_str().to_string(),
            value: kv.value.into(),
        }
    }
}

impl From<OtelTraceId> for TraceId {
    fn from(id: OtelTraceId) -> Self {
        TraceId::from_bytes(id.to_bytes())
    }
}

impl From<OtelSpanId> for SpanId {
    fn from(id: OtelSpanId) -> Self {
        SpanId::from_bytes(id.to_bytes())
    }
}
