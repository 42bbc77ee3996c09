// Response envelope used by every JSON resource endpoint.
//
// The client passes envelopes through untouched; callers interpret
// `success` / `message` / `data` through `Envelope`. The explanation
// rules here are the same ones the client applies to HTTP errors.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::Error;

/// Standard resource envelope.
///
/// ```json
/// { "success": true, "message": "optional", "data": ... }
/// { "success": false, "message": "why" }     // or "error": "why"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T = Value> {
    /// `false` only when the server sent a literal `false`.
    #[serde(default = "succeeded", deserialize_with = "not_false")]
    pub success: bool,
    pub message: Option<Value>,
    pub data: Option<T>,
    pub error: Option<Value>,
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Interpret a passed-through payload as an envelope.
    pub fn from_value(payload: Value) -> Result<Self, Error> {
        serde_json::from_value(payload.clone()).map_err(|e| Error::Parse {
            message: format!("unexpected envelope shape: {e}"),
            body: payload.to_string(),
        })
    }
}

impl<T> Envelope<T> {
    /// Whether a payload carries an envelope at all.
    pub fn is_enveloped(payload: &Value) -> bool {
        payload.get("success").is_some()
    }

    /// Server-supplied explanation: the first non-empty of `message`,
    /// then `error`.
    pub fn reason(&self) -> Option<String> {
        [&self.message, &self.error]
            .into_iter()
            .flatten()
            .find_map(explanation)
    }
}

/// Pull the server's explanation out of an arbitrary JSON body, if any.
pub(crate) fn server_message(body: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .filter_map(|key| body.get(key))
        .find_map(explanation)
}

fn explanation(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(inner) => inner
            .get("message")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(String::from),
        _ => None,
    }
}

fn succeeded() -> bool {
    true
}

fn not_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(!matches!(Value::deserialize(deserializer)?, Value::Bool(false)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_success_envelope() {
        let env: Envelope<Vec<Value>> =
            Envelope::from_value(json!({ "success": true, "data": [{ "id": 1 }] })).unwrap();
        assert!(env.success);
        assert_eq!(env.data.unwrap().len(), 1);
    }

    #[test]
    fn reason_prefers_message_over_error() {
        let env: Envelope =
            Envelope::from_value(json!({ "success": false, "message": "m", "error": "e" }))
                .unwrap();
        assert_eq!(env.reason().as_deref(), Some("m"));

        let env: Envelope =
            Envelope::from_value(json!({ "success": false, "error": "e" })).unwrap();
        assert_eq!(env.reason().as_deref(), Some("e"));
    }

    #[test]
    fn empty_message_falls_through_to_error() {
        let env: Envelope =
            Envelope::from_value(json!({ "success": false, "message": "", "error": "e" }))
                .unwrap();
        assert_eq!(env.reason().as_deref(), Some("e"));

        let env: Envelope = Envelope::from_value(json!({ "success": false, "message": "" })).unwrap();
        assert_eq!(env.reason(), None);
    }

    #[test]
    fn only_a_literal_false_is_failure() {
        let env: Envelope = Envelope::from_value(json!({ "success": 0, "data": 1 })).unwrap();
        assert!(env.success);
        let env: Envelope = Envelope::from_value(json!({ "success": false })).unwrap();
        assert!(!env.success);
        assert!(env.data.is_none());
        assert!(Envelope::<Value>::is_enveloped(&json!({ "success": null })));
        assert!(!Envelope::<Value>::is_enveloped(&json!([{ "success": true }])));
    }

    #[test]
    fn typed_data_needs_no_default() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Row {
            id: u32,
        }
        let env: Envelope<Row> =
            Envelope::from_value(json!({ "success": true, "data": { "id": 4 } })).unwrap();
        assert_eq!(env.data, Some(Row { id: 4 }));
        let env: Envelope<Row> = Envelope::from_value(json!({ "success": true })).unwrap();
        assert_eq!(env.data, None);
    }

    #[test]
    fn server_message_reads_nested_error_objects() {
        let body = json!({ "error": { "code": 9, "message": "duplicado" } });
        assert_eq!(server_message(&body).as_deref(), Some("duplicado"));
        assert_eq!(server_message(&json!({ "success": false })), None);
    }
}
