use thiserror::Error;

use crate::value::Document;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, EncodeError>;

/// Errors produced while encoding a message into a document value tree.
#[derive(Debug, Error)]
pub enum EncodeError {
	/// Message construct with no document representation: proto1 MessageSet
	/// wire format, or a rejected well-known type (nested or top-level).
	#[error("no document representation for {construct}")]
	UnsupportedConstruct {
		/// Description of the offending construct.
		construct: String,
	},
	/// A string field holds bytes that are not valid UTF-8.
	#[error("field {field} contains invalid UTF-8")]
	InvalidUtf8 {
		/// Full name of the offending field.
		field: String,
	},
	/// A well-known numeric field lies outside its defined domain.
	#[error("{field} value {value} is out of range")]
	OutOfRange {
		/// Full name of the offending field.
		field: String,
		/// The out-of-domain value.
		value: i64,
	},
	/// Message nesting exceeded the configured defensive ceiling.
	#[error("message nesting exceeded depth limit {max_depth}")]
	RecursionLimitExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// A legacy required field is unset somewhere in the populated shape.
	///
	/// Encoding itself succeeded; the partially useful document is carried
	/// alongside the error so callers may still persist it.
	#[error("required field {field} is not set")]
	IncompleteMessage {
		/// Full name of the first missing required field.
		field: String,
		/// The document produced before validation failed.
		document: Document,
	},
}

impl EncodeError {
	/// Extract the partial document carried by [`EncodeError::IncompleteMessage`].
	pub fn partial_document(self) -> Option<Document> {
		match self {
			EncodeError::IncompleteMessage { document, .. } => Some(document),
			_ => None,
		}
	}
}
