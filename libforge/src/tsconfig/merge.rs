//! Recursive merge for configuration values.
//!
//! Object-valued keys merge recursively; scalar and array values overwrite.

use serde_json::{Map, Value};

/// Deep-merges `patch` into `base`.
pub fn merge_values(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base_map), Value::Object(patch_map)) => {
            merge_maps(base_map, patch_map);
        }
        (base_slot, patch_value) => {
            *base_slot = patch_value;
        }
    }
}

/// Deep-merges every entry of `patch` into `base`.
pub(crate) fn merge_maps(base: &mut Map<String, Value>, patch: Map<String, Value>) {
    for (key, patch_value) in patch {
        match base.get_mut(&key) {
            Some(base_value) if base_value.is_object() && patch_value.is_object() => {
                merge_values(base_value, patch_value);
            }
            _ => {
                base.insert(key, patch_value);
            }
        }
    }
}
