//! GraphQL request and response envelopes

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Named inputs of a GraphQL operation, ordered by name.
pub type Variables = Map<String, Value>;

/// A query plus its variables, sent as a single JSON body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlRequest {
    query: String,
    variables: Variables,
}

impl GraphQlRequest {
    pub fn new(query: impl Into<String>, variables: Variables) -> Self {
        Self { query: query.into(), variables }
    }

    /// Build a request from a `serde_json::json!` object literal.
    ///
    /// Anything other than an object yields an empty variable set.
    pub fn with_json(query: impl Into<String>, variables: Value) -> Self {
        let variables = match variables {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self::new(query, variables)
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn variables(&self) -> &Variables {
        &self.variables
    }
}

/// Envelope of every GraphQL response.
///
/// Any entry in `errors` makes `data` unusable.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GraphQlResponse<T> {
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlErrorEntry>>,
}

impl<T> GraphQlResponse<T> {
    /// Messages of all reported errors; empty when the call succeeded.
    #[must_use]
    pub fn error_messages(&self) -> Vec<String> {
        self.errors
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|error| error.message.clone())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlErrorEntry {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn request_serializes_query_and_variables() {
        let request = GraphQlRequest::with_json("query Q { a }", json!({ "filename": "f.json" }));
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body, json!({ "query": "query Q { a }", "variables": { "filename": "f.json" } }));
    }

    #[test]
    fn non_object_variables_become_empty() {
        let request = GraphQlRequest::with_json("query Q { a }", json!(["not", "an", "object"]));
        assert!(request.variables().is_empty());
    }

    #[test]
    fn response_collects_error_messages() {
        let response: GraphQlResponse<Value> = serde_json::from_value(json!({
            "data": { "a": 1 },
            "errors": [{ "message": "first", "path": ["a"] }, { "message": "second" }]
        }))
        .unwrap();
        assert_eq!(response.error_messages(), vec!["first", "second"]);
        assert!(response.data.is_some());
    }

    #[test]
    fn error_entry_without_message_still_counts() {
        let response: GraphQlResponse<Value> = serde_json::from_value(json!({
            "errors": [{ "extensions": { "code": "X" } }]
        }))
        .unwrap();
        assert_eq!(response.error_messages(), vec![String::new()]);
    }

    #[test]
    fn response_without_errors_field_has_no_messages() {
        let response: GraphQlResponse<Value> =
            serde_json::from_value(json!({ "data": { "a": 1 } })).unwrap();
        assert!(response.error_messages().is_empty());
    }
}
