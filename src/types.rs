//! Shared types used across modules
//!
//! Request/response bodies for the HTTP API and the `Submission` record
//! persisted by the store.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// User id used when a submission carries no `user.id`
pub const UNKNOWN_USER: &str = "unknown";

/// One submitted form, exactly as the client sent it.
///
/// Keys are client-defined (`title1`, `description2`, `user`,
/// `submission_time`, ...) and unbounded in number, so the record is an
/// open JSON object rather than a fixed struct. Key order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Submission(Map<String, Value>);

impl Submission {
    /// Submitter id rendered as text, `"unknown"` when absent
    pub fn user_id(&self) -> String {
        match self.0.get("user").and_then(|user| user.get("id")) {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Null) | None => UNKNOWN_USER.to_string(),
            Some(other) => other.to_string(),
        }
    }

    /// Client-supplied `submission_time`, if any
    pub fn submission_time(&self) -> Option<&str> {
        self.0.get("submission_time").and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Submission {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Body of `POST /api/improve-text`
#[derive(Debug, Deserialize)]
pub struct ImproveTextRequest {
    #[serde(default)]
    pub text: Option<String>,
}

/// Response of `POST /api/improve-text`
#[derive(Debug, Serialize, Deserialize)]
pub struct ImproveTextResponse {
    pub improved_text: String,
}

/// Response of `POST /api/submit-form`
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub status: String,
    pub message: String,
    pub filename: String,
}

/// Response of `GET /logs`
#[derive(Debug, Serialize, Deserialize)]
pub struct LogsResponse {
    pub logs: Vec<Value>,
}

/// Response of `GET /api/status`
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
}
