//! Loosely-typed JSON request bodies.
//!
//! Create and update requests are decoded as a JSON object into a map of
//! string keys to [`BodyValue`]s. Only `name` is read, and its absence is not
//! validated here: a missing or `null` name is passed to the repository as
//! `None` and the storage schema decides whether that is acceptable.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};

use crate::error::AppError;

/// Key holding the project name.
pub const NAME_FIELD: &str = "name";

/// A decoded JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    List(Vec<BodyValue>),
    Map(HashMap<String, BodyValue>),
}

impl BodyValue {
    fn type_name(&self) -> &'static str {
        match self {
            BodyValue::Null => "null",
            BodyValue::Bool(_) => "bool",
            BodyValue::Number(_) => "number",
            BodyValue::String(_) => "string",
            BodyValue::List(_) => "array",
            BodyValue::Map(_) => "object",
        }
    }
}

impl From<serde_json::Value> for BodyValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => BodyValue::Null,
            serde_json::Value::Bool(b) => BodyValue::Bool(b),
            serde_json::Value::Number(n) => BodyValue::Number(n),
            serde_json::Value::String(s) => BodyValue::String(s),
            serde_json::Value::Array(items) => {
                BodyValue::List(items.into_iter().map(BodyValue::from).collect())
            }
            serde_json::Value::Object(map) => BodyValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, BodyValue::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Request body decoding failures.
#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    #[error("Failed to read request body: {0}")]
    Read(String),

    #[error("Request body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Request body must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("Field '{field}' cannot be a JSON {found}")]
    UnsupportedValue {
        field: &'static str,
        found: &'static str,
    },
}

/// Decoded body of a create or update request.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectInput {
    pub fields: HashMap<String, BodyValue>,
}

impl ProjectInput {
    /// Decode raw bytes. The top-level value must be an object.
    pub fn decode(bytes: &[u8]) -> Result<Self, BodyError> {
        let value: serde_json::Value = serde_json::from_slice(bytes)?;
        match BodyValue::from(value) {
            BodyValue::Map(fields) => Ok(Self { fields }),
            other => Err(BodyError::NotAnObject(other.type_name())),
        }
    }

    /// The `name` field as text.
    ///
    /// Strings are returned as-is, numbers and booleans in their JSON text
    /// form, and `null` or a missing key as `None`. Arrays and objects have
    /// no text form and are rejected.
    pub fn name(&self) -> Result<Option<String>, BodyError> {
        match self.fields.get(NAME_FIELD) {
            None | Some(BodyValue::Null) => Ok(None),
            Some(BodyValue::String(s)) => Ok(Some(s.clone())),
            Some(BodyValue::Number(n)) => Ok(Some(n.to_string())),
            Some(BodyValue::Bool(b)) => Ok(Some(b.to_string())),
            Some(other) => Err(BodyError::UnsupportedValue {
                field: NAME_FIELD,
                found: other.type_name(),
            }),
        }
    }
}

impl<S> FromRequest<S> for ProjectInput
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| BodyError::Read(e.body_text()))?;
        Ok(Self::decode(&bytes)?)
    }
}
