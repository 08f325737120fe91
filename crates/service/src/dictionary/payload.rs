use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::dictionary::Dictionary;
use crate::errors::ServiceError;

/// Request body accepted by both submit endpoints: `{"dict": {...}}`.
/// Other fields are ignored; `"dict": null` deserializes as absent.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitPayload {
    #[serde(default)]
    pub dict: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    Missing,
    NotAnObject(&'static str),
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "dict is missing"),
            Self::NotAnObject(kind) => write!(f, "dict must be a JSON object, got {kind}"),
        }
    }
}

/// Outcome of checking a submitted value before it reaches a store.
#[derive(Debug, Clone, PartialEq)]
pub enum Candidate {
    Mapping(Dictionary),
    Invalid(InvalidReason),
}

impl Candidate {
    pub fn parse(value: Option<Value>) -> Self {
        match value {
            None => Self::Invalid(InvalidReason::Missing),
            Some(Value::Object(map)) => Self::Mapping(map),
            Some(other) => Self::Invalid(InvalidReason::NotAnObject(json_kind(&other))),
        }
    }

    pub fn into_mapping(self) -> Result<Dictionary, ServiceError> {
        match self {
            Self::Mapping(map) => Ok(map),
            Self::Invalid(reason) => Err(ServiceError::InvalidInput(reason.to_string())),
        }
    }
}

impl From<SubmitPayload> for Candidate {
    fn from(payload: SubmitPayload) -> Self {
        Self::parse(payload.dict)
    }
}

/// JSON type name of a value, for error messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn objects_are_mappings_including_empty() {
        let c = Candidate::parse(Some(json!({"cat": "gato"})));
        assert_eq!(c, Candidate::Mapping(json!({"cat": "gato"}).as_object().cloned().unwrap()));
        assert!(matches!(Candidate::parse(Some(json!({}))), Candidate::Mapping(m) if m.is_empty()));
    }

    #[test]
    fn non_objects_are_rejected_with_their_kind() {
        let cases = [
            (json!(null), "null"),
            (json!("a string"), "string"),
            (json!(42), "number"),
            (json!(true), "boolean"),
            (json!(["a", "b"]), "array"),
        ];
        for (value, kind) in cases {
            assert_eq!(Candidate::parse(Some(value)), Candidate::Invalid(InvalidReason::NotAnObject(kind)));
        }
        assert_eq!(Candidate::parse(None), Candidate::Invalid(InvalidReason::Missing));
    }

    #[test]
    fn payload_field_extraction() {
        let p: SubmitPayload = serde_json::from_value(json!({"dict": {"a": 1}, "extra": true})).unwrap();
        assert!(matches!(Candidate::from(p), Candidate::Mapping(_)));

        let p: SubmitPayload = serde_json::from_value(json!({})).unwrap();
        assert_eq!(Candidate::from(p), Candidate::Invalid(InvalidReason::Missing));

        let p: SubmitPayload = serde_json::from_value(json!({"dict": null})).unwrap();
        assert_eq!(Candidate::from(p), Candidate::Invalid(InvalidReason::Missing));
    }

    #[test]
    fn invalid_maps_to_invalid_input() {
        let err = Candidate::parse(Some(json!([1]))).into_mapping().unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "invalid input: dict must be a JSON object, got array");
    }
}
