use chrono::DateTime;
use prost_reflect::{DynamicMessage, MessageDescriptor, ReflectMessage};

use crate::error::{EncodeError, Result};
use crate::value::Value;

/// Smallest `google.protobuf.Timestamp` seconds value (0001-01-01T00:00:00Z).
pub(crate) const TIMESTAMP_SECONDS_MIN: i64 = -62_135_596_800;
/// Largest `google.protobuf.Timestamp` seconds value (9999-12-31T23:59:59Z).
pub(crate) const TIMESTAMP_SECONDS_MAX: i64 = 253_402_300_799;
/// Largest `google.protobuf.Timestamp` nanos value.
pub(crate) const TIMESTAMP_NANOS_MAX: i32 = 999_999_999;

/// Override encoder for one well-known message type.
pub(crate) type WktMarshaler = fn(&DynamicMessage) -> Result<Option<Value>>;

/// Look up the override encoder for a fully qualified message type name.
///
/// Returns `Some` both for supported interceptions (Timestamp, Empty) and for
/// types that are rejected outright; `None` means generic message recursion.
pub(crate) fn well_known_type_marshaler(full_name: &str) -> Option<WktMarshaler> {
	match full_name {
		"google.protobuf.Timestamp" => Some(marshal_timestamp),
		"google.protobuf.Empty" => Some(marshal_empty),
		"google.protobuf.Any"
		| "google.protobuf.Duration"
		| "google.protobuf.BoolValue"
		| "google.protobuf.Int32Value"
		| "google.protobuf.Int64Value"
		| "google.protobuf.UInt32Value"
		| "google.protobuf.UInt64Value"
		| "google.protobuf.FloatValue"
		| "google.protobuf.DoubleValue"
		| "google.protobuf.StringValue"
		| "google.protobuf.BytesValue"
		| "google.protobuf.Struct"
		| "google.protobuf.ListValue"
		| "google.protobuf.Value"
		| "google.protobuf.FieldMask" => Some(marshal_unsupported),
		_ => None,
	}
}

/// Structural check for legacy proto1 MessageSet wire format.
pub(crate) fn is_message_set(descriptor: &MessageDescriptor) -> bool {
	descriptor
		.descriptor_proto()
		.options
		.as_ref()
		.is_some_and(|options| options.message_set_wire_format())
}

fn marshal_timestamp(message: &DynamicMessage) -> Result<Option<Value>> {
	let seconds = i64_field(message, "seconds");
	let nanos = i32_field(message, "nanos");

	if !(TIMESTAMP_SECONDS_MIN..=TIMESTAMP_SECONDS_MAX).contains(&seconds) {
		return Err(EncodeError::OutOfRange {
			field: "google.protobuf.Timestamp.seconds".to_owned(),
			value: seconds,
		});
	}
	if !(0..=TIMESTAMP_NANOS_MAX).contains(&nanos) {
		return Err(EncodeError::OutOfRange {
			field: "google.protobuf.Timestamp.nanos".to_owned(),
			value: i64::from(nanos),
		});
	}

	let at = DateTime::from_timestamp(seconds, nanos as u32).ok_or(EncodeError::OutOfRange {
		field: "google.protobuf.Timestamp.seconds".to_owned(),
		value: seconds,
	})?;
	Ok(Some(Value::Timestamp(at)))
}

fn marshal_empty(_message: &DynamicMessage) -> Result<Option<Value>> {
	Ok(None)
}

fn marshal_unsupported(message: &DynamicMessage) -> Result<Option<Value>> {
	Err(EncodeError::UnsupportedConstruct {
		construct: format!("well-known type {}", message.descriptor().full_name()),
	})
}

fn i64_field(message: &DynamicMessage, name: &str) -> i64 {
	message
		.get_field_by_name(name)
		.and_then(|value| value.as_i64())
		.unwrap_or_else(|| panic!("{} descriptor is missing int64 field {name}", message.descriptor().full_name()))
}

fn i32_field(message: &DynamicMessage, name: &str) -> i32 {
	message
		.get_field_by_name(name)
		.and_then(|value| value.as_i32())
		.unwrap_or_else(|| panic!("{} descriptor is missing int32 field {name}", message.descriptor().full_name()))
}
