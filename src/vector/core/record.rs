//! The stored record type.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::vector::core::distance::normalize;
use crate::vector::core::quantization::quantize;

/// String key/value metadata attached to a record.
pub type Metadata = HashMap<String, String>;

/// A single embedding with its identifier, metadata, and namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Caller-supplied unique identifier.
    pub id: String,
    /// The embedding, normalized to unit length unless it is the zero vector.
    pub vector: Vec<f32>,
    /// 8-bit codes of `vector`, one per component.
    pub quantized: Vec<i8>,
    /// Arbitrary string metadata, may be empty.
    pub metadata: Metadata,
    /// Partition tag. The empty string is an ordinary namespace.
    pub namespace: String,
}

impl Record {
    /// Build a record from a raw embedding: normalize, then quantize.
    pub fn from_raw(
        id: impl Into<String>,
        raw_vector: &[f32],
        metadata: Metadata,
        namespace: impl Into<String>,
    ) -> Self {
        let vector = normalize(raw_vector);
        let quantized = quantize(&vector);
        Self {
            id: id.into(),
            vector,
            quantized,
            metadata,
            namespace: namespace.into(),
        }
    }

    /// Dimension of the stored vector.
    pub fn dimension(&self) -> usize {
        self.vector.len()
    }
}
