use std::cmp::Ordering;
use std::collections::HashMap;

use prost_reflect::{MapKey, Value};

/// Canonicalize a map key to its document string form.
pub(crate) fn map_key_string(key: &MapKey) -> String {
	match key {
		MapKey::Bool(value) => value.to_string(),
		MapKey::I32(value) => value.to_string(),
		MapKey::I64(value) => value.to_string(),
		MapKey::U32(value) => value.to_string(),
		MapKey::U64(value) => value.to_string(),
		MapKey::String(value) => value.clone(),
	}
}

/// Collect map entries sorted in canonical key order.
///
/// Canonical order is `false` before `true` for bool keys, numeric order for
/// integer keys, and code-point order for string keys. The output map is keyed
/// by string and sorts itself, so this ordering only pins down which entry is
/// visited (and can report an error) first.
pub(crate) fn sorted_map_entries(map: &HashMap<MapKey, Value>) -> Vec<(&MapKey, &Value)> {
	let mut entries: Vec<(&MapKey, &Value)> = map.iter().collect();
	entries.sort_by(|(left, _), (right, _)| compare_map_keys(left, right));
	entries
}

fn compare_map_keys(left: &MapKey, right: &MapKey) -> Ordering {
	match (left, right) {
		(MapKey::Bool(left), MapKey::Bool(right)) => left.cmp(right),
		(MapKey::I32(left), MapKey::I32(right)) => left.cmp(right),
		(MapKey::I64(left), MapKey::I64(right)) => left.cmp(right),
		(MapKey::U32(left), MapKey::U32(right)) => left.cmp(right),
		(MapKey::U64(left), MapKey::U64(right)) => left.cmp(right),
		(MapKey::String(left), MapKey::String(right)) => left.cmp(right),
		// A map field has exactly one key kind; mixed keys cannot occur.
		_ => Ordering::Equal,
	}
}
