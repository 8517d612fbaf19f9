use serde::{Deserialize, Serialize};

/// Typed attribute value carried by log records, spans and metric points.
///
/// The set of variants is closed: every value entering the encoder is one of
/// these, so rendering never has an "unsupported type" path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Boolean value.
    Bool(bool),

    /// Signed integer (any narrower signed or unsigned width widens to this).
    I64(i64),

    /// Unsigned integer too wide for `I64`.
    U64(u64),

    /// Double-precision float.
    F64(f64),

    /// Text value.
    String(String),

    /// Homogeneous sequence of scalars.
    Array(Array),
}

/// Homogeneous array of attribute scalars.
///
/// One variant per element type keeps mixed-type sequences unrepresentable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Array {
    Bool(Vec<bool>),
    I64(Vec<i64>),
    U64(Vec<u64>),
    F64(Vec<f64>),
    String(Vec<String>),
}

impl Array {
    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            Array::Bool(v) => v.len(),
            Array::I64(v) => v.len(),
            Array::U64(v) => v.len(),
            Array::F64(v) => v.len(),
            Array::String(v) => v.len(),
        }
    }

    /// Whether the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

macro_rules! from_signed {
    ($($t:ty),*) => {
        $(
            impl From<$t> for AttributeValue {
                fn from(v: $t) -> Self {
                    AttributeValue::I64(i64::from(v))
                }
            }
        )*
    };
}

from_signed!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for AttributeValue {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(v) => AttributeValue::I64(v),
            Err(_) => AttributeValue::U64(v),
        }
    }
}

impl From<usize> for AttributeValue {
    fn from(v: usize) -> Self {
        AttributeValue::from(v as u64)
    }
}

impl From<isize> for AttributeValue {
    fn from(v: isize) -> Self {
        AttributeValue::I64(v as i64)
    }
}

impl From<f32> for AttributeValue {
    fn from(v: f32) -> Self {
        AttributeValue::F64(f64::from(v))
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::F64(v)
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        AttributeValue::Bool(v)
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::String(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::String(v.to_string())
    }
}

impl From<Array> for AttributeValue {
    fn from(v: Array) -> Self {
        AttributeValue::Array(v)
    }
}

impl From<Vec<bool>> for AttributeValue {
    fn from(v: Vec<bool>) -> Self {
        AttributeValue::Array(Array::Bool(v))
    }
}

impl From<Vec<i64>> for AttributeValue {
    fn from(v: Vec<i64>) -> Self {
        AttributeValue::Array(Array::I64(v))
    }
}

impl From<Vec<u64>> for AttributeValue {
    fn from(v: Vec<u64>) -> Self {
        AttributeValue::Array(Array::U64(v))
    }
}

impl From<Vec<f64>> for AttributeValue {
    fn from(v: Vec<f64>) -> Self {
        AttributeValue::Array(Array::F64(v))
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(v: Vec<String>) -> Self {
        AttributeValue::Array(Array::String(v))
    }
}

impl From<Vec<&str>> for AttributeValue {
    fn from(v: Vec<&str>) -> Self {
        AttributeValue::Array(Array::String(
            v.into_iter().map(str::to_string).collect(),
        ))
    }
}

/// A named attribute.
///
/// Records keep attributes as an ordered list of pairs; names are not required
/// to be unique and insertion order is the rendering order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: AttributeValue,
}

impl KeyValue {
    /// Create a new attribute pair.
    pub fn new(key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
