//! Shared descriptor pool and message builders for the integration tests.
//!
//! The pool is assembled programmatically so the tests carry no generated
//! code. It covers proto3 scalars, nesting, oneofs, `optional` fields,
//! repeated and map fields, well-known types, and a proto2 file with legacy
//! required fields, extensions, and a MessageSet.
#![allow(dead_code)]

use std::sync::OnceLock;

use prost_reflect::{DescriptorPool, DynamicMessage, ExtensionDescriptor};
use prost_types::descriptor_proto::ExtensionRange;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
	DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto, FileDescriptorProto,
	FileDescriptorSet, MessageOptions, OneofDescriptorProto,
};
use protodoc::{Document, Value};

pub fn pool() -> &'static DescriptorPool {
	static POOL: OnceLock<DescriptorPool> = OnceLock::new();
	POOL.get_or_init(|| {
		DescriptorPool::from_file_descriptor_set(descriptor_set()).expect("test descriptor set is valid")
	})
}

/// New empty dynamic message for a fully qualified type name.
pub fn message(name: &str) -> DynamicMessage {
	let descriptor = pool()
		.get_message_by_name(name)
		.unwrap_or_else(|| panic!("unknown test message {name}"));
	DynamicMessage::new(descriptor)
}

/// Resolve an extension of `message_name` by the extension's full name.
pub fn extension(message_name: &str, extension_name: &str) -> ExtensionDescriptor {
	let descriptor = pool()
		.get_message_by_name(message_name)
		.unwrap_or_else(|| panic!("unknown test message {message_name}"));
	descriptor
		.extensions()
		.find(|extension| extension.full_name() == extension_name)
		.unwrap_or_else(|| panic!("unknown test extension {extension_name}"))
}

/// Build an expected document from key/value pairs.
pub fn doc<const N: usize>(fields: [(&str, Value); N]) -> Document {
	fields.into_iter().map(|(key, value)| (key.to_owned(), value)).collect()
}

fn descriptor_set() -> FileDescriptorSet {
	FileDescriptorSet {
		file: vec![well_known_file(), proto3_file(), proto2_file()],
	}
}

fn well_known_file() -> FileDescriptorProto {
	FileDescriptorProto {
		name: Some("google/protobuf/wkt.proto".to_owned()),
		package: Some("google.protobuf".to_owned()),
		syntax: Some("proto3".to_owned()),
		message_type: vec![
			msg("Timestamp", vec![scalar("seconds", 1, Type::Int64), scalar("nanos", 2, Type::Int32)]),
			msg("Empty", vec![]),
			msg("Duration", vec![scalar("seconds", 1, Type::Int64), scalar("nanos", 2, Type::Int32)]),
			msg("Any", vec![scalar("type_url", 1, Type::String), scalar("value", 2, Type::Bytes)]),
			msg("BoolValue", vec![scalar("value", 1, Type::Bool)]),
		],
		enum_type: vec![enumeration("NullValue", &[("NULL_VALUE", 0)])],
		..Default::default()
	}
}

fn proto3_file() -> FileDescriptorProto {
	let scalars = msg(
		"Scalars",
		vec![
			scalar("s_bool", 1, Type::Bool),
			scalar("s_int32", 2, Type::Int32),
			scalar("s_int64", 3, Type::Int64),
			scalar("s_uint32", 4, Type::Uint32),
			scalar("s_uint64", 5, Type::Uint64),
			scalar("s_sint32", 6, Type::Sint32),
			scalar("s_sint64", 7, Type::Sint64),
			scalar("s_fixed32", 8, Type::Fixed32),
			scalar("s_fixed64", 9, Type::Fixed64),
			scalar("s_sfixed32", 10, Type::Sfixed32),
			scalar("s_sfixed64", 11, Type::Sfixed64),
			scalar("s_float", 12, Type::Float),
			scalar("s_double", 13, Type::Double),
			scalar("s_string", 14, Type::String),
			scalar("s_bytes", 15, Type::Bytes),
		],
	);

	let json_names = msg("JsonNames", vec![json_name(scalar("foo_bar", 1, Type::String), "foo_bar")]);

	let nested = msg(
		"Nested",
		vec![scalar("s_string", 1, Type::String), message_field("nested", 2, ".test3.Nested")],
	);
	let nests = msg("Nests", vec![message_field("s_nested", 1, ".test3.Nested")]);

	let mut oneofs = msg(
		"Oneofs",
		vec![
			in_oneof(message_field("msg", 1, ".test3.Nested"), 0),
			in_oneof(scalar("str", 2, Type::String), 0),
			in_oneof(scalar("num", 3, Type::Int32), 0),
		],
	);
	oneofs.oneof_decl = vec![oneof("union")];

	let mut optionals = msg(
		"Proto3Optional",
		vec![
			optional3(scalar("opt_string", 1, Type::String), 0),
			optional3(scalar("opt_int32", 2, Type::Int32), 1),
		],
	);
	optionals.oneof_decl = vec![oneof("_opt_string"), oneof("_opt_int32")];

	let repeats = msg(
		"Repeats",
		vec![
			repeated(scalar("rpt_bool", 1, Type::Bool)),
			repeated(scalar("rpt_int32", 2, Type::Int32)),
			repeated(scalar("rpt_string", 3, Type::String)),
			repeated(message_field("rpt_nested", 4, ".test3.Nested")),
			repeated(enum_field("rpt_enum", 5, ".test3.Kind")),
		],
	);

	let mut maps = msg(
		"Maps",
		vec![
			repeated(message_field("str_to_nested", 1, ".test3.Maps.StrToNestedEntry")),
			repeated(message_field("int32_to_str", 2, ".test3.Maps.Int32ToStrEntry")),
			repeated(message_field("bool_to_uint32", 3, ".test3.Maps.BoolToUint32Entry")),
			repeated(message_field("uint64_to_str", 4, ".test3.Maps.Uint64ToStrEntry")),
		],
	);
	maps.nested_type = vec![
		map_entry("StrToNestedEntry", scalar("key", 1, Type::String), message_field("value", 2, ".test3.Nested")),
		map_entry("Int32ToStrEntry", scalar("key", 1, Type::Int32), scalar("value", 2, Type::String)),
		map_entry("BoolToUint32Entry", scalar("key", 1, Type::Bool), scalar("value", 2, Type::Uint32)),
		map_entry("Uint64ToStrEntry", scalar("key", 1, Type::Uint64), scalar("value", 2, Type::String)),
	];

	let enums = msg("Enums", vec![enum_field("kind", 1, ".test3.Kind")]);

	let mut wkt_holder = msg(
		"WktHolder",
		vec![
			message_field("timestamp", 1, ".google.protobuf.Timestamp"),
			message_field("empty", 2, ".google.protobuf.Empty"),
			message_field("duration", 3, ".google.protobuf.Duration"),
			message_field("any", 4, ".google.protobuf.Any"),
			message_field("bool_value", 5, ".google.protobuf.BoolValue"),
			optional3(enum_field("null_value", 6, ".google.protobuf.NullValue"), 0),
		],
	);
	wkt_holder.oneof_decl = vec![oneof("_null_value")];

	FileDescriptorProto {
		name: Some("test3.proto".to_owned()),
		package: Some("test3".to_owned()),
		syntax: Some("proto3".to_owned()),
		dependency: vec!["google/protobuf/wkt.proto".to_owned()],
		message_type: vec![scalars, json_names, nested, nests, oneofs, optionals, repeats, maps, enums, wkt_holder],
		enum_type: vec![enumeration("Kind", &[("KIND_UNSPECIFIED", 0), ("ACTIVE", 1), ("ARCHIVED", 2)])],
		..Default::default()
	}
}

fn proto2_file() -> FileDescriptorProto {
	let scalars = msg(
		"Scalars2",
		vec![
			scalar("s_bool", 1, Type::Bool),
			scalar("s_string", 2, Type::String),
			scalar("s_int32", 3, Type::Int32),
			scalar("s_fixed64", 4, Type::Fixed64),
			scalar("s_bytes", 5, Type::Bytes),
			scalar("s_float", 6, Type::Float),
		],
	);

	let mut nested = msg("Nested2", vec![scalar("s_string", 1, Type::String)]);
	nested.extension = vec![extension_field(scalar("msg_ext_string", 20, Type::String), ".test2.Extensible")];

	let requireds = msg(
		"Requireds",
		vec![
			required(scalar("req_bool", 1, Type::Bool)),
			required(scalar("req_sfixed64", 2, Type::Sfixed64)),
			required(scalar("req_string", 3, Type::String)),
			required(message_field("req_nested", 4, ".test2.Nested2")),
			scalar("opt_int32", 5, Type::Int32),
		],
	);

	let nested_with_required = msg("NestedWithRequired", vec![required(scalar("req_string", 1, Type::String))]);

	let mut indirect = msg(
		"IndirectRequired",
		vec![
			message_field("opt_nested", 1, ".test2.NestedWithRequired"),
			repeated(message_field("rpt_nested", 2, ".test2.NestedWithRequired")),
			repeated(message_field("str_to_nested", 3, ".test2.IndirectRequired.StrToNestedEntry")),
		],
	);
	indirect.nested_type = vec![map_entry(
		"StrToNestedEntry",
		scalar("key", 1, Type::String),
		message_field("value", 2, ".test2.NestedWithRequired"),
	)];

	let mut extensible = msg("Extensible", vec![scalar("s_int32", 1, Type::Int32)]);
	extensible.extension_range = vec![ExtensionRange {
		start: Some(10),
		end: Some(101),
		..Default::default()
	}];

	let mut message_set = msg("MessageSet", vec![]);
	message_set.options = Some(MessageOptions {
		message_set_wire_format: Some(true),
		..Default::default()
	});
	message_set.extension_range = vec![ExtensionRange {
		start: Some(4),
		end: Some(536_870_912),
		..Default::default()
	}];

	let holder = msg("MessageSetHolder", vec![message_field("message_set", 1, ".test2.MessageSet")]);

	FileDescriptorProto {
		name: Some("test2.proto".to_owned()),
		package: Some("test2".to_owned()),
		message_type: vec![
			scalars,
			nested,
			requireds,
			nested_with_required,
			indirect,
			extensible,
			message_set,
			holder,
		],
		extension: vec![
			extension_field(scalar("ext_string", 10, Type::String), ".test2.Extensible"),
			extension_field(message_field("ext_nested", 11, ".test2.Nested2"), ".test2.Extensible"),
			extension_field(scalar("ext_bool", 12, Type::Bool), ".test2.Extensible"),
			extension_field(repeated(scalar("ext_rpt_int32", 13, Type::Int32)), ".test2.Extensible"),
		],
		..Default::default()
	}
}

fn msg(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
	DescriptorProto {
		name: Some(name.to_owned()),
		field: fields,
		..Default::default()
	}
}

fn scalar(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
	FieldDescriptorProto {
		name: Some(name.to_owned()),
		number: Some(number),
		label: Some(Label::Optional as i32),
		r#type: Some(ty as i32),
		..Default::default()
	}
}

fn message_field(name: &str, number: i32, type_name: &str) -> FieldDescriptorProto {
	let mut field = scalar(name, number, Type::Message);
	field.type_name = Some(type_name.to_owned());
	field
}

fn enum_field(name: &str, number: i32, type_name: &str) -> FieldDescriptorProto {
	let mut field = scalar(name, number, Type::Enum);
	field.type_name = Some(type_name.to_owned());
	field
}

fn repeated(mut field: FieldDescriptorProto) -> FieldDescriptorProto {
	field.label = Some(Label::Repeated as i32);
	field
}

fn required(mut field: FieldDescriptorProto) -> FieldDescriptorProto {
	field.label = Some(Label::Required as i32);
	field
}

fn in_oneof(mut field: FieldDescriptorProto, index: i32) -> FieldDescriptorProto {
	field.oneof_index = Some(index);
	field
}

fn optional3(mut field: FieldDescriptorProto, index: i32) -> FieldDescriptorProto {
	field.oneof_index = Some(index);
	field.proto3_optional = Some(true);
	field
}

fn json_name(mut field: FieldDescriptorProto, name: &str) -> FieldDescriptorProto {
	field.json_name = Some(name.to_owned());
	field
}

fn extension_field(mut field: FieldDescriptorProto, extendee: &str) -> FieldDescriptorProto {
	field.extendee = Some(extendee.to_owned());
	field
}

fn oneof(name: &str) -> OneofDescriptorProto {
	OneofDescriptorProto {
		name: Some(name.to_owned()),
		..Default::default()
	}
}

fn map_entry(name: &str, key: FieldDescriptorProto, value: FieldDescriptorProto) -> DescriptorProto {
	DescriptorProto {
		name: Some(name.to_owned()),
		field: vec![key, value],
		options: Some(MessageOptions {
			map_entry: Some(true),
			..Default::default()
		}),
		..Default::default()
	}
}

fn enumeration(name: &str, values: &[(&str, i32)]) -> EnumDescriptorProto {
	EnumDescriptorProto {
		name: Some(name.to_owned()),
		value: values
			.iter()
			.map(|(value_name, number)| EnumValueDescriptorProto {
				name: Some((*value_name).to_owned()),
				number: Some(*number),
				..Default::default()
			})
			.collect(),
		..Default::default()
	}
}
