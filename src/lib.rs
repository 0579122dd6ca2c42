//! Encode protobuf messages into schemaless nested documents.
//!
//! The encoder walks a [`prost_reflect::DynamicMessage`] through its
//! descriptor and produces a [`Document`] of named [`Value`]s, mapping
//! protobuf presence semantics onto document field absence. Zero-valued
//! proto3 scalars, empty strings and bytes, empty repeated and map fields,
//! and empty nested messages all encode to nothing under the default mode;
//! the other [`EncodingMode`]s add unpopulated fields back in controlled
//! ways.

mod encode;
mod error;
mod order;
mod range;
mod required;
mod value;
mod wkt;

/// Encoding entry points and runtime options.
pub use encode::{EncodeOptions, encode, encode_with_options};
/// Error and result aliases.
pub use error::{EncodeError, Result};
/// Presence policy selection.
pub use range::EncodingMode;
/// Document tree types.
pub use value::{Document, Value};
