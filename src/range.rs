use std::borrow::Cow;

use prost_reflect::{DynamicMessage, ExtensionDescriptor, FieldDescriptor, Kind, ReflectMessage, Value};

/// Presence policy selecting which fields a message exposes for encoding.
///
/// The four policies are mutually exclusive configurations of one ranging
/// algorithm; selecting one fully determines the visited set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncodingMode {
	/// Visit only explicitly populated fields.
	#[default]
	Compact,
	/// Additionally visit unpopulated non-oneof fields; presence-sensing
	/// fields receive an explicit null marker.
	EmitUnpopulated,
	/// Like [`EncodingMode::EmitUnpopulated`] but presence-sensing fields are
	/// skipped instead of receiving the null marker.
	EmitDefaultValues,
	/// Additionally visit unpopulated non-optional scalar fields at their zero
	/// value; keeps an empty object for a populated oneof arm whose payload
	/// encodes to nothing.
	EmitFirestoreDefaults,
}

/// A regular field or an extension field, unified for ranging and encoding.
#[derive(Debug, Clone)]
pub(crate) enum FieldRef {
	/// Field declared on the message itself.
	Field(FieldDescriptor),
	/// Extension field resolved through the descriptor pool.
	Extension(ExtensionDescriptor),
}

/// A field selected for encoding, either with a provider value or as the
/// explicit null marker substituted for unpopulated presence-sensing fields.
#[derive(Debug)]
pub(crate) enum RangedValue<'a> {
	/// Concrete value reported by (or defaulted from) the provider.
	Present(Cow<'a, Value>),
	/// Null marker; encodes as an explicit `Null` document entry.
	NullMarker,
}

impl FieldRef {
	pub(crate) fn kind(&self) -> Kind {
		match self {
			FieldRef::Field(field) => field.kind(),
			FieldRef::Extension(extension) => extension.kind(),
		}
	}

	pub(crate) fn is_list(&self) -> bool {
		match self {
			FieldRef::Field(field) => field.is_list(),
			FieldRef::Extension(extension) => extension.is_list(),
		}
	}

	pub(crate) fn is_map(&self) -> bool {
		match self {
			FieldRef::Field(field) => field.is_map(),
			FieldRef::Extension(extension) => extension.is_map(),
		}
	}

	/// Kind of the value sub-field of a map field.
	pub(crate) fn map_value_kind(&self) -> Kind {
		match self.kind() {
			Kind::Message(entry) => entry.map_entry_value_field().kind(),
			other => panic!("map field {} has non-message kind {other:?}", self.full_name()),
		}
	}

	pub(crate) fn full_name(&self) -> String {
		match self {
			FieldRef::Field(field) => field.full_name().to_owned(),
			FieldRef::Extension(extension) => extension.full_name().to_owned(),
		}
	}

	/// Key under which this field lands in the output document: the JSON name
	/// for regular fields, the bracketed full name for extensions.
	pub(crate) fn document_key(&self) -> String {
		match self {
			FieldRef::Field(field) => field.json_name().to_owned(),
			FieldRef::Extension(extension) => format!("[{}]", extension.full_name()),
		}
	}

	/// Whether the field belongs to a real (non-synthetic) oneof.
	pub(crate) fn in_real_oneof(&self) -> bool {
		match self {
			FieldRef::Field(field) => in_real_oneof(field),
			FieldRef::Extension(_) => false,
		}
	}
}

/// Produce the ordered sequence of fields a message exposes under a mode.
///
/// Regular fields come first in declaration order, unpopulated ones
/// interleaved as the mode dictates; populated extensions follow, ordered by
/// full name. Unpopulated extensions and fields of unset oneofs are never
/// visited.
pub(crate) fn range_fields(message: &DynamicMessage, mode: EncodingMode) -> Vec<(FieldRef, RangedValue<'_>)> {
	let descriptor = message.descriptor();
	let mut ranged = Vec::new();

	for field in descriptor.fields() {
		if message.has_field(&field) {
			ranged.push((FieldRef::Field(field.clone()), RangedValue::Present(message.get_field(&field))));
			continue;
		}

		match mode {
			EncodingMode::Compact => {}
			EncodingMode::EmitUnpopulated | EncodingMode::EmitDefaultValues => {
				if in_real_oneof(&field) {
					continue;
				}
				if is_presence_sensing(&field) {
					if mode == EncodingMode::EmitUnpopulated {
						ranged.push((FieldRef::Field(field.clone()), RangedValue::NullMarker));
					}
					continue;
				}
				ranged.push((FieldRef::Field(field.clone()), RangedValue::Present(message.get_field(&field))));
			}
			EncodingMode::EmitFirestoreDefaults => {
				if field.containing_oneof().is_some() {
					continue;
				}
				if field.is_list() || field.is_map() {
					continue;
				}
				if matches!(field.kind(), Kind::Message(_) | Kind::Enum(_)) {
					continue;
				}
				if is_proto2(&field) {
					continue;
				}
				ranged.push((FieldRef::Field(field.clone()), RangedValue::Present(message.get_field(&field))));
			}
		}
	}

	let mut extensions: Vec<ExtensionDescriptor> = descriptor
		.extensions()
		.filter(|extension| message.has_extension(extension))
		.collect();
	extensions.sort_by(|left, right| left.full_name().cmp(right.full_name()));
	for extension in extensions {
		let value = message.get_extension(&extension);
		ranged.push((FieldRef::Extension(extension), RangedValue::Present(value)));
	}

	ranged
}

/// Whether an unpopulated field tracks presence and therefore takes the null
/// marker under [`EncodingMode::EmitUnpopulated`]: proto2 singular scalars,
/// proto3 `optional` scalars, and singular message fields.
fn is_presence_sensing(field: &FieldDescriptor) -> bool {
	if field.is_list() || field.is_map() {
		return false;
	}
	if matches!(field.kind(), Kind::Message(_)) {
		return true;
	}
	is_proto2(field) || field.field_descriptor_proto().proto3_optional()
}

fn in_real_oneof(field: &FieldDescriptor) -> bool {
	field.containing_oneof().is_some() && !field.field_descriptor_proto().proto3_optional()
}

fn is_proto2(field: &FieldDescriptor) -> bool {
	// Proto2 files either omit the syntax marker or spell it out.
	matches!(
		field.parent_message().parent_file().file_descriptor_proto().syntax(),
		"" | "proto2"
	)
}
