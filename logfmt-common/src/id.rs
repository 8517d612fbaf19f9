//! Fixed-width binary identifiers (trace and span ids).

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// A fixed-size binary identifier.
///
/// An all-zero identifier is invalid and is never rendered.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identifier<const N: usize>([u8; N]);

/// 16-byte trace identifier.
pub type TraceId = Identifier<16>;

/// 8-byte span identifier.
pub type SpanId = Identifier<8>;

impl<const N: usize> Identifier<N> {
    /// Size of the identifier in bytes.
    pub const SIZE: usize = N;

    /// The invalid (all-zero) identifier.
    pub const INVALID: Self = Self([0; N]);

    /// Create an identifier from raw bytes.
    pub const fn from_bytes(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    /// Raw bytes of the identifier.
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    /// Whether the identifier is valid (not all zeros).
    pub fn is_valid(&self) -> bool {
        self.0.iter().any(|b| *b != 0)
    }

    /// Lowercase hex rendering, exactly `2 * N` characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a hex string of exactly `2 * N` characters.
    pub fn from_hex(s: &str) -> Result<Self> {
        if s.len() != 2 * N {
            return Err(Error::InvalidIdentifier {
                expected: 2 * N,
                actual: s.len(),
            });
        }
        let mut bytes = [0u8; N];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl<const N: usize> Default for Identifier<N> {
    fn default() -> Self {
        Self::INVALID
    }
}

impl<const N: usize> From<[u8; N]> for Identifier<N> {
    fn from(bytes: [u8; N]) -> Self {
        Self(bytes)
    }
}

impl<const N: usize> fmt::Debug for Identifier<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({})", self.to_hex())
    }
}

impl<const N: usize> Serialize for Identifier<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de, const N: usize> Deserialize<'de> for Identifier<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
