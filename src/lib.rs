#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod builder;
mod coerce;
mod decode;
mod diagnostics;
#[cfg(feature = "kdl")]
mod document;
mod error;
mod impls;
mod macros;
mod node;
mod scalar;
mod shape;
mod value;

pub use coerce::coerce;
pub use decode::Decoder;
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, Diagnostics, LogSink, Severity};
#[cfg(feature = "kdl")]
pub use document::{document_to_node, from_kdl_str, parse_kdl};
pub use error::{AssignError, BoxError, DecodeError, DecodeErrorKind};
pub use node::{Node, NodeKind, Scalar, ScalarStyle};
pub use scalar::{CoreSchema, ScalarResolver};
pub use shape::{
    Decode, Def, FieldDescriptor, Record, RecordLayout, ScalarType, Shape, TypeDescriptor,
    resolve, shape_of,
};
pub use value::{Array, Instance, Map, MixedItem, Value, ValueKind};

#[doc(hidden)]
pub mod __private {
    pub use crate::shape::field_shape;
}

type Result<T> = std::result::Result<T, DecodeError>;

/// Decodes `node` into a `T`, forwarding diagnostics to the [`log`] facade.
///
/// Returns a [`DecodeError`] if a record cannot be constructed, a field rejects its value, or the
/// document does not fit `T`. Unknown keys, missing fields and unusable nodes are only logged.
pub fn decode<T: Decode>(node: &Node) -> Result<T> {
    Decoder::new(&mut LogSink).decode(node)
}

/// Decodes `node` without a schema, forwarding diagnostics to the [`log`] facade.
pub fn decode_value(node: &Node) -> Result<Value> {
    Decoder::new(&mut LogSink).decode_value(node)
}

/// Decodes `node` into a `T`, reporting diagnostics to `sink`.
pub fn decode_with<T: Decode>(node: &Node, sink: &mut dyn DiagnosticSink) -> Result<T> {
    Decoder::new(sink).decode(node)
}
