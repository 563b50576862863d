//! Uniform JSON envelope returned by every endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// `{status, message, data?, details?}`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub status: Status,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Envelope {
    pub fn success(message: impl Into<String>) -> Self {
        Envelope {
            status: Status::Success,
            message: message.into(),
            data: None,
            details: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Envelope {
            status: Status::Error,
            message: message.into(),
            data: None,
            details: None,
        }
    }

    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = Some(Value::Object(data));
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Looks up one key of `data`.
    pub fn data_field(&self, key: &str) -> Option<&Value> {
        self.data.as_ref().and_then(|d| d.get(key))
    }
}

/// Returned by every role-gated route when the caller is not allowed. Carries no details.
pub fn access_denied() -> Envelope {
    Envelope::error("Access denied")
}

/// `{key: schema}`
pub fn data_one<T: Serialize>(key: &str, schema: &T) -> Result<Map<String, Value>, serde_json::Error> {
    let mut data = Map::new();
    data.insert(key.to_string(), serde_json::to_value(schema)?);
    Ok(data)
}

/// `{count: n, key: [schemas]}`
pub fn data_many<T: Serialize>(key: &str, schemas: &[T]) -> Result<Map<String, Value>, serde_json::Error> {
    let mut data = Map::new();
    data.insert("count".to_string(), Value::from(schemas.len() as u64));
    data.insert(key.to_string(), serde_json::to_value(schemas)?);
    Ok(data)
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
