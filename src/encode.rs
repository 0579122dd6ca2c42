use std::collections::{BTreeMap, HashMap};

use prost_reflect::{DynamicMessage, Kind, MapKey, ReflectMessage};

use crate::error::{EncodeError, Result};
use crate::order;
use crate::range::{self, EncodingMode, FieldRef, RangedValue};
use crate::required;
use crate::value::{Document, Value};
use crate::wkt;

/// Runtime configuration for document encoding.
#[derive(Debug, Clone)]
pub struct EncodeOptions {
	/// Presence policy selecting which fields are visited.
	pub mode: EncodingMode,
	/// Maximum recursive message nesting depth.
	pub max_depth: u32,
}

impl Default for EncodeOptions {
	fn default() -> Self {
		Self {
			mode: EncodingMode::Compact,
			max_depth: 64,
		}
	}
}

impl EncodeOptions {
	/// Preset that adds unpopulated fields, with null markers for
	/// presence-sensing ones.
	pub fn emit_unpopulated() -> Self {
		Self {
			mode: EncodingMode::EmitUnpopulated,
			..Self::default()
		}
	}

	/// Preset that adds unpopulated fields but keeps presence-sensing ones
	/// fully absent.
	pub fn emit_default_values() -> Self {
		Self {
			mode: EncodingMode::EmitDefaultValues,
			..Self::default()
		}
	}

	/// Preset that adds unpopulated non-optional scalars at their zero value
	/// and preserves oneof arm discrimination.
	pub fn emit_firestore_defaults() -> Self {
		Self {
			mode: EncodingMode::EmitFirestoreDefaults,
			..Self::default()
		}
	}
}

/// Encode a message into a document using default options.
pub fn encode(message: &DynamicMessage) -> Result<Document> {
	encode_with_options(message, &EncodeOptions::default())
}

/// Encode a message into a document under explicit options.
///
/// On success the document holds every visited field that encoded to a
/// present value. When encoding succeeds but a legacy required field is unset
/// somewhere in the populated shape, the error is
/// [`EncodeError::IncompleteMessage`] and carries the document built so far.
pub fn encode_with_options(message: &DynamicMessage, options: &EncodeOptions) -> Result<Document> {
	let descriptor = message.descriptor();
	if wkt::well_known_type_marshaler(descriptor.full_name()).is_some() {
		return Err(EncodeError::UnsupportedConstruct {
			construct: format!("well-known type {} as a top-level document", descriptor.full_name()),
		});
	}

	let encoder = Encoder { options };
	let document = encoder.marshal_message(message, 0)?;

	if let Some(field) = required::find_unset_required(message) {
		return Err(EncodeError::IncompleteMessage { field, document });
	}
	Ok(document)
}

struct Encoder<'a> {
	options: &'a EncodeOptions,
}

impl Encoder<'_> {
	fn marshal_message(&self, message: &DynamicMessage, depth: u32) -> Result<Document> {
		if depth > self.options.max_depth {
			return Err(EncodeError::RecursionLimitExceeded {
				max_depth: self.options.max_depth,
			});
		}

		let descriptor = message.descriptor();
		if wkt::is_message_set(&descriptor) {
			return Err(EncodeError::UnsupportedConstruct {
				construct: "proto1 MessageSet wire format".to_owned(),
			});
		}

		let mut document = Document::new();
		for (field, ranged) in range::range_fields(message, self.options.mode) {
			match ranged {
				RangedValue::NullMarker => {
					document.insert(field.document_key(), Value::Null);
				}
				RangedValue::Present(value) => {
					if let Some(encoded) = self.marshal_field(&value, &field, depth)? {
						document.insert(field.document_key(), encoded);
					}
				}
			}
		}
		Ok(document)
	}

	fn marshal_field(&self, value: &prost_reflect::Value, field: &FieldRef, depth: u32) -> Result<Option<Value>> {
		let name = field.full_name();

		if field.is_map() {
			let entries = value.as_map().unwrap_or_else(|| kind_mismatch(&name, &field.kind()));
			let encoded = self.marshal_map(entries, &field.map_value_kind(), &name, depth)?;
			if encoded.is_empty() {
				return Ok(None);
			}
			return Ok(Some(Value::Map(encoded)));
		}

		if field.is_list() {
			let items = value.as_list().unwrap_or_else(|| kind_mismatch(&name, &field.kind()));
			return self.marshal_list(items, &field.kind(), &name, depth);
		}

		// A populated oneof arm must stay discriminable even when its payload
		// encodes to nothing.
		let keep_empty = self.options.mode == EncodingMode::EmitFirestoreDefaults && field.in_real_oneof();
		self.marshal_singular(value, &field.kind(), &name, keep_empty, depth)
	}

	fn marshal_singular(
		&self,
		value: &prost_reflect::Value,
		kind: &Kind,
		field: &str,
		keep_empty: bool,
		depth: u32,
	) -> Result<Option<Value>> {
		match kind {
			Kind::Bool => {
				let value = value.as_bool().unwrap_or_else(|| kind_mismatch(field, kind));
				Ok(Some(Value::Bool(value)))
			}

			Kind::String => match value {
				prost_reflect::Value::String(text) if text.is_empty() => Ok(None),
				prost_reflect::Value::String(text) => Ok(Some(Value::String(text.clone()))),
				prost_reflect::Value::Bytes(bytes) => match std::str::from_utf8(bytes) {
					Ok("") => Ok(None),
					Ok(text) => Ok(Some(Value::String(text.to_owned()))),
					Err(_) => Err(EncodeError::InvalidUtf8 { field: field.to_owned() }),
				},
				_ => kind_mismatch(field, kind),
			},

			Kind::Int32 | Kind::Sint32 | Kind::Sfixed32 => {
				let value = value.as_i32().unwrap_or_else(|| kind_mismatch(field, kind));
				Ok(Some(Value::Int32(value)))
			}

			Kind::Int64 | Kind::Sint64 | Kind::Sfixed64 => {
				let value = value.as_i64().unwrap_or_else(|| kind_mismatch(field, kind));
				Ok(Some(Value::Int64(value)))
			}

			Kind::Uint32 | Kind::Fixed32 => {
				let value = value.as_u32().unwrap_or_else(|| kind_mismatch(field, kind));
				Ok(Some(Value::UInt32(value)))
			}

			Kind::Uint64 | Kind::Fixed64 => {
				let value = value.as_u64().unwrap_or_else(|| kind_mismatch(field, kind));
				Ok(Some(Value::UInt64(value)))
			}

			Kind::Float => {
				let value = value.as_f32().unwrap_or_else(|| kind_mismatch(field, kind));
				Ok(Some(Value::Float32(value)))
			}

			Kind::Double => {
				let value = value.as_f64().unwrap_or_else(|| kind_mismatch(field, kind));
				Ok(Some(Value::Float64(value)))
			}

			Kind::Bytes => {
				let bytes = value.as_bytes().unwrap_or_else(|| kind_mismatch(field, kind));
				if bytes.is_empty() {
					return Ok(None);
				}
				Ok(Some(Value::Bytes(bytes.to_vec())))
			}

			Kind::Enum(descriptor) => {
				let number = value.as_enum_number().unwrap_or_else(|| kind_mismatch(field, kind));
				if descriptor.full_name() == "google.protobuf.NullValue" {
					return Ok(Some(Value::Null));
				}
				match descriptor.get_value(number) {
					Some(named) => Ok(Some(Value::String(named.name().to_owned()))),
					None => Ok(Some(Value::Int64(i64::from(number)))),
				}
			}

			Kind::Message(_) => {
				let message = value.as_message().unwrap_or_else(|| kind_mismatch(field, kind));
				let descriptor = message.descriptor();
				if let Some(marshal) = wkt::well_known_type_marshaler(descriptor.full_name()) {
					return marshal(message);
				}

				let document = self.marshal_message(message, depth + 1)?;
				if document.is_empty() && !keep_empty {
					return Ok(None);
				}
				Ok(Some(Value::Document(document)))
			}
		}
	}

	fn marshal_list(&self, items: &[prost_reflect::Value], kind: &Kind, field: &str, depth: u32) -> Result<Option<Value>> {
		if items.is_empty() {
			return Ok(None);
		}

		let mut array = Vec::with_capacity(items.len());
		for item in items {
			match self.marshal_singular(item, kind, field, false, depth)? {
				Some(value) => array.push(value),
				// An element that encodes to nothing keeps its position.
				None => array.push(Value::Null),
			}
		}
		Ok(Some(Value::List(array)))
	}

	fn marshal_map(
		&self,
		entries: &HashMap<MapKey, prost_reflect::Value>,
		value_kind: &Kind,
		field: &str,
		depth: u32,
	) -> Result<BTreeMap<String, Value>> {
		let mut object = BTreeMap::new();
		for (key, item) in order::sorted_map_entries(entries) {
			// An entry whose value encodes to nothing is dropped entirely.
			if let Some(value) = self.marshal_singular(item, value_kind, field, false, depth)? {
				object.insert(order::map_key_string(key), value);
			}
		}
		Ok(object)
	}
}

fn kind_mismatch(field: &str, kind: &Kind) -> ! {
	// A value that disagrees with its descriptor kind means the provider
	// handed over a broken message; this is not a recoverable input error.
	panic!("field {field} holds a value that does not match descriptor kind {kind:?}")
}
