use prost_reflect::{Cardinality, DynamicMessage, ReflectMessage, Value};

/// Find the first legacy required field that is unset anywhere in the
/// populated shape of `message`, returning its full name.
///
/// The walk descends through populated singular sub-messages, every element of
/// repeated message fields, every value of map-to-message fields, the payload
/// of whichever oneof arm is populated, and populated extension values. Empty
/// repeated/map fields hold no elements and are not descended into.
pub(crate) fn find_unset_required(message: &DynamicMessage) -> Option<String> {
	let descriptor = message.descriptor();

	for field in descriptor.fields() {
		if field.cardinality() == Cardinality::Required && !message.has_field(&field) {
			return Some(field.full_name().to_owned());
		}
		if !message.has_field(&field) {
			continue;
		}
		if let Some(found) = find_in_value(message.get_field(&field).as_ref()) {
			return Some(found);
		}
	}

	for extension in descriptor.extensions() {
		if !message.has_extension(&extension) {
			continue;
		}
		if let Some(found) = find_in_value(message.get_extension(&extension).as_ref()) {
			return Some(found);
		}
	}

	None
}

fn find_in_value(value: &Value) -> Option<String> {
	match value {
		Value::Message(message) => find_unset_required(message),
		Value::List(items) => items.iter().find_map(find_in_value),
		Value::Map(entries) => entries.values().find_map(find_in_value),
		_ => None,
	}
}
