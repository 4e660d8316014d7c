//! Query string serialization.
//!
//! The Corvid API expects array parameters as repeated bracketed keys
//! (`tags[]=a&tags[]=b`), which reqwest's default serializer does not
//! produce, so pairs are built by hand and percent-encoded.

use serde_json::{Map, Value};

/// Serialize a query map, or `None` when there is nothing to attach.
///
/// Scalars become `key=value`, arrays become repeated `key[]=value` pairs,
/// JSON nulls are skipped.
pub(crate) fn serialize_query(query: &Map<String, Value>) -> Option<String> {
    let mut pairs: Vec<(String, String)> = Vec::new();

    for (key, value) in query {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                let bracketed = format!("{key}[]");
                for item in items {
                    pairs.push((bracketed.clone(), scalar_text(item)));
                }
            }
            other => pairs.push((key.clone(), scalar_text(other))),
        }
    }

    if pairs.is_empty() {
        return None;
    }

    let encoded = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    Some(encoded)
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
