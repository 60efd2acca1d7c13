//! Conversion between Firestore typed values and plain JSON.
//!
//! The Firestore REST API wraps every value in a type tag
//! (`{"stringValue": "x"}`, `{"integerValue": "42"}`, ...). Repositories work
//! with plain `serde_json::Value` and (de)serialize records through serde, so
//! this module translates in both directions.

use serde_json::{Map, Value, json};

/// Convert a plain JSON value into a Firestore typed value.
#[must_use]
pub fn to_firestore_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            // Firestore distinguishes integers (sent as strings) from doubles
            n.as_i64().map_or_else(
                || json!({ "doubleValue": n.as_f64() }),
                |i| json!({ "integerValue": i.to_string() }),
            )
        }
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(to_firestore_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": to_firestore_fields_map(map) } }),
    }
}

/// Convert a plain JSON object into a Firestore `fields` map.
///
/// Non-object inputs produce an empty map; callers always pass serialized
/// record structs.
#[must_use]
pub fn to_firestore_fields(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(to_firestore_fields_map(map)),
        _ => Value::Object(Map::new()),
    }
}

fn to_firestore_fields_map(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .map(|(k, v)| (k.clone(), to_firestore_value(v)))
        .collect()
}

/// Convert a Firestore typed value back into plain JSON.
#[must_use]
pub fn from_firestore_value(value: &Value) -> Value {
    let Some(map) = value.as_object() else {
        return Value::Null;
    };

    if map.contains_key("nullValue") {
        return Value::Null;
    }
    if let Some(b) = map.get("booleanValue") {
        return b.clone();
    }
    if let Some(i) = map.get("integerValue") {
        // Integers come back as decimal strings
        return i
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .map_or(Value::Null, Value::from);
    }
    if let Some(d) = map.get("doubleValue") {
        return d.clone();
    }
    if let Some(s) = map.get("stringValue") {
        return s.clone();
    }
    if let Some(ts) = map.get("timestampValue") {
        // Keep server timestamps as RFC 3339 strings
        return ts.clone();
    }
    if let Some(arr) = map.get("arrayValue") {
        let values = arr
            .get("values")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(from_firestore_value).collect())
            .unwrap_or_default();
        return Value::Array(values);
    }
    if let Some(m) = map.get("mapValue") {
        return from_firestore_fields(m.get("fields").unwrap_or(&Value::Null));
    }
    if let Some(r) = map.get("referenceValue") {
        return r.clone();
    }

    Value::Null
}

/// Convert a Firestore `fields` map back into a plain JSON object.
#[must_use]
pub fn from_firestore_fields(fields: &Value) -> Value {
    let Some(map) = fields.as_object() else {
        return json!({});
    };

    let plain: Map<String, Value> = map
        .iter()
        .map(|(k, v)| (k.clone(), from_firestore_value(v)))
        .collect();
    Value::Object(plain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_roundtrip() {
        for value in [
            json!(null),
            json!(true),
            json!(42),
            json!(-7),
            json!("lezzet"),
        ] {
            let wire = to_firestore_value(&value);
            assert_eq!(from_firestore_value(&wire), value);
        }
    }

    #[test]
    fn test_integer_encoded_as_string() {
        let wire = to_firestore_value(&json!(10));
        assert_eq!(wire, json!({ "integerValue": "10" }));
    }

    #[test]
    fn test_double_value() {
        let wire = to_firestore_value(&json!(4.5));
        assert_eq!(wire, json!({ "doubleValue": 4.5 }));
        assert_eq!(from_firestore_value(&wire), json!(4.5));
    }

    #[test]
    fn test_nested_document_roundtrip() {
        let doc = json!({
            "name": "Lezzet Durağı",
            "isActive": true,
            "cuisineTypes": ["Kebap", "Pide"],
            "hours": { "monday": "09:00-22:00" },
            "owner": null
        });

        let wire = to_firestore_fields(&doc);
        assert_eq!(from_firestore_fields(&wire), doc);
    }

    #[test]
    fn test_timestamp_value_kept_as_string() {
        let wire = json!({ "timestampValue": "2024-03-07T12:00:00Z" });
        assert_eq!(from_firestore_value(&wire), json!("2024-03-07T12:00:00Z"));
    }

    #[test]
    fn test_empty_array_value() {
        let wire = to_firestore_value(&json!([]));
        assert_eq!(from_firestore_value(&wire), json!([]));
    }
}
