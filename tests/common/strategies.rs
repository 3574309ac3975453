use proptest::prelude::*;

/// Strategy for generating transfer/quote identifiers (UUID-like and free-form)
pub fn identifier_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}",
        "[a-zA-Z0-9_.-]{1,64}",
    ]
}

/// Strategy for generating optional participant ids
pub fn fsp_id_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[a-z][a-z0-9]{2,31}")
}

/// Strategy for generating opaque workflow data fields
pub fn data_fields_strategy() -> impl Strategy<Value = serde_json::Map<String, serde_json::Value>> {
    prop::collection::btree_map("[a-z][a-zA-Z]{0,15}", "[a-zA-Z0-9 ]{0,32}", 0..8).prop_map(
        |fields| {
            fields
                .into_iter()
                .filter(|(key, _)| key != "currentState")
                .map(|(key, value)| (key, serde_json::Value::String(value)))
                .collect()
        },
    )
}
