use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::ser::{Serialize, Serializer};

/// A single encoded document value.
///
/// Exactly one case is active at a time; the union is closed and mirrors the
/// value kinds a schemaless document store can hold natively.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Explicit null entry, written for collapsed list elements and null markers.
	Null,
	/// Boolean scalar.
	Bool(bool),
	/// 32-bit signed integer (`int32`, `sint32`, `sfixed32`).
	Int32(i32),
	/// 64-bit signed integer (`int64`, `sint64`, `sfixed64`) and unnamed enum numbers.
	Int64(i64),
	/// 32-bit unsigned integer (`uint32`, `fixed32`).
	UInt32(u32),
	/// 64-bit unsigned integer (`uint64`, `fixed64`).
	UInt64(u64),
	/// Single-precision float; NaN and infinities are preserved.
	Float32(f32),
	/// Double-precision float; NaN and infinities are preserved.
	Float64(f64),
	/// UTF-8 string.
	String(String),
	/// Raw byte string.
	Bytes(Vec<u8>),
	/// Absolute point in time from `google.protobuf.Timestamp`.
	Timestamp(DateTime<Utc>),
	/// Nested document from a message field.
	Document(Document),
	/// Ordered list from a repeated field.
	List(Vec<Value>),
	/// String-keyed map from a protobuf map field.
	Map(BTreeMap<String, Value>),
}

/// Mapping of output field names to encoded values for one message.
///
/// Iteration order is deterministic (sorted by key) and equality is
/// content-based, so repeated encode calls on the same input compare equal.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct Document {
	fields: BTreeMap<String, Value>,
}

impl Document {
	/// Create an empty document.
	pub fn new() -> Self {
		Self { fields: BTreeMap::new() }
	}

	/// Insert a value under an output field name, replacing any previous entry.
	pub fn insert(&mut self, name: impl Into<String>, value: Value) {
		self.fields.insert(name.into(), value);
	}

	/// Look up a value by output field name.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.fields.get(name)
	}

	/// Whether an output field name is present.
	pub fn contains_key(&self, name: &str) -> bool {
		self.fields.contains_key(name)
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.fields.len()
	}

	/// Whether the document has no entries.
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	/// Iterate entries in deterministic key order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.fields.iter().map(|(name, value)| (name.as_str(), value))
	}
}

impl FromIterator<(String, Value)> for Document {
	fn from_iter<I: IntoIterator<Item = (String, Value)>>(entries: I) -> Self {
		Self {
			fields: entries.into_iter().collect(),
		}
	}
}

impl IntoIterator for Document {
	type Item = (String, Value);
	type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.fields.into_iter()
	}
}

impl Serialize for Value {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Value::Null => serializer.serialize_unit(),
			Value::Bool(value) => serializer.serialize_bool(*value),
			Value::Int32(value) => serializer.serialize_i32(*value),
			Value::Int64(value) => serializer.serialize_i64(*value),
			Value::UInt32(value) => serializer.serialize_u32(*value),
			Value::UInt64(value) => serializer.serialize_u64(*value),
			Value::Float32(value) => serializer.serialize_f32(*value),
			Value::Float64(value) => serializer.serialize_f64(*value),
			Value::String(value) => serializer.serialize_str(value),
			Value::Bytes(value) => serializer.serialize_bytes(value),
			Value::Timestamp(value) => serializer.serialize_str(&value.to_rfc3339()),
			Value::Document(value) => value.serialize(serializer),
			Value::List(value) => value.serialize(serializer),
			Value::Map(value) => value.serialize(serializer),
		}
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Value::Bool(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Value::Int32(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Value::Int64(value)
	}
}

impl From<u32> for Value {
	fn from(value: u32) -> Self {
		Value::UInt32(value)
	}
}

impl From<u64> for Value {
	fn from(value: u64) -> Self {
		Value::UInt64(value)
	}
}

impl From<f32> for Value {
	fn from(value: f32) -> Self {
		Value::Float32(value)
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Value::Float64(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Value::String(value.to_owned())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Value::String(value)
	}
}

impl From<Vec<Value>> for Value {
	fn from(value: Vec<Value>) -> Self {
		Value::List(value)
	}
}

impl From<Document> for Value {
	fn from(value: Document) -> Self {
		Value::Document(value)
	}
}
