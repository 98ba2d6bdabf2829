//! Core data structures for vector search.
//!
//! Vector math primitives, the 8-bit quantization primitive, and the stored
//! record type.

pub mod distance;
pub mod quantization;
pub mod record;
