//! Operation descriptors and per-call options.

use reqwest::Method;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Immutable description of one generated API operation.
///
/// One `const` of these exists per operation in the generated surface; the
/// executor treats them as opaque, already-validated input.
#[derive(Debug, Clone)]
pub struct OperationDescriptor {
    /// Path template with `{param}` placeholders, relative to the base URL.
    pub endpoint: &'static str,
    /// HTTP verb.
    pub method: Method,
    /// Whether the operation requires authorization.
    pub secure: bool,
}

/// Caller-supplied options for a single invocation.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Path parameter values, keyed by placeholder name.
    pub params: Map<String, Value>,
    /// Query parameter values.
    pub query: Map<String, Value>,
    /// JSON request body. Only attached when it is a non-empty object.
    pub data: Option<Value>,
}

impl CallOptions {
    /// Empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a path parameter.
    pub fn param(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }

    /// Set a query parameter.
    pub fn query(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.query.insert(name.to_string(), value.into());
        self
    }

    /// Merge a serializable struct's fields into the query map.
    pub fn merge_query<Q: serde::Serialize>(mut self, query: &Q) -> Result<Self> {
        if let Value::Object(map) = serde_json::to_value(query)? {
            self.query.extend(map);
        }
        Ok(self)
    }

    /// Set the request body.
    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Substitute `{name}` placeholders in an endpoint template.
///
/// Values that are JSON null or the empty string count as not provided;
/// numbers and booleans are substituted (`0` and `false` are present, not
/// missing). Any placeholder left unresolved fails the call locally, naming
/// every missing parameter — nothing is sent to the transport.
pub(crate) fn populate_endpoint(endpoint: &str, params: &Map<String, Value>) -> Result<String> {
    let mut populated = endpoint.to_string();

    for (key, value) in params {
        let Some(text) = path_value(value) else {
            continue;
        };
        populated = populated.replacen(&format!("{{{key}}}"), &text, 1);
    }

    let unresolved = unresolved_placeholders(&populated);
    if !unresolved.is_empty() {
        return Err(Error::MissingPathParams(unresolved));
    }

    Ok(populated)
}

fn path_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn unresolved_placeholders(path: &str) -> Vec<String> {
    let mut found = Vec::new();
    let mut rest = path;

    while let Some(start) = rest.find('{') {
        let tail = &rest[start..];
        let Some(end) = tail.find('}') else {
            break;
        };
        found.push(tail[..=end].to_string());
        rest = &tail[end + 1..];
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn substitutes_a_string_parameter() {
        let path = populate_endpoint("/users/{id}", &params(&[("id", json!("123"))])).unwrap();
        assert_eq!(path, "/users/123");
    }

    #[test]
    fn substitutes_a_numeric_parameter() {
        let path = populate_endpoint("/users/{id}", &params(&[("id", json!(123))])).unwrap();
        assert_eq!(path, "/users/123");
    }

    #[test]
    fn zero_is_present_not_missing() {
        let path = populate_endpoint("/users/{id}", &params(&[("id", json!(0))])).unwrap();
        assert_eq!(path, "/users/0");
    }

    #[test]
    fn false_is_present_not_missing() {
        let path =
            populate_endpoint("/flags/{enabled}", &params(&[("enabled", json!(false))])).unwrap();
        assert_eq!(path, "/flags/false");
    }

    #[test]
    fn null_parameter_fails_naming_the_placeholder() {
        let err = populate_endpoint("/users/{id}", &params(&[("id", Value::Null)])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required path parameter(s): {id}"
        );
    }

    #[test]
    fn empty_string_parameter_fails_naming_the_placeholder() {
        let err = populate_endpoint("/users/{id}", &params(&[("id", json!(""))])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required path parameter(s): {id}"
        );
    }

    #[test]
    fn all_unresolved_placeholders_are_named() {
        let err = populate_endpoint("/orgs/{org}/users/{id}", &params(&[])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required path parameter(s): {org}, {id}"
        );
    }

    #[test]
    fn multiple_parameters_substitute_independently() {
        let path = populate_endpoint(
            "/orgs/{org}/users/{id}",
            &params(&[("org", json!("corvid")), ("id", json!(7))]),
        )
        .unwrap();
        assert_eq!(path, "/orgs/corvid/users/7");
    }
}
