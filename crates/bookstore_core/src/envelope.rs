//! Uniform response envelope shared by every catalog route.
//!
//! # Responsibility
//! - Classify transport status codes into a success/error flag.
//! - Carry payload and optional human-readable message alongside that flag.
//!
//! # Invariants
//! - Classification is pure: any integer code is accepted, `200..=299` maps to
//!   success, everything else to error.
//! - Absent `data`/`message` are omitted from the serialized body, never
//!   emitted as `null`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// User-facing response status derived from a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Success,
    Error,
}

impl ResponseStatus {
    /// Classifies a transport status code.
    pub fn from_status_code(status_code: u16) -> Self {
        if (200..=299).contains(&status_code) {
            Self::Success
        } else {
            Self::Error
        }
    }
}

/// Uniform response wrapper: `{data?, status, status_code, message?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    pub status: ResponseStatus,
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ResponseEnvelope {
    /// Builds the bare status envelope for a code; callers merge in payload
    /// keys through [`with_data`](Self::with_data) and
    /// [`with_message`](Self::with_message).
    pub fn from_status_code(status_code: u16) -> Self {
        Self {
            data: None,
            status: ResponseStatus::from_status_code(status_code),
            status_code,
            message: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::{ResponseEnvelope, ResponseStatus};
    use serde_json::json;

    #[test]
    fn every_code_in_success_range_is_success() {
        for code in 200..=299 {
            assert_eq!(
                ResponseStatus::from_status_code(code),
                ResponseStatus::Success,
                "code {code} should be success"
            );
        }
    }

    #[test]
    fn codes_outside_success_range_are_error() {
        for code in [0, 100, 199, 300, 301, 400, 404, 500, 503] {
            assert_eq!(
                ResponseStatus::from_status_code(code),
                ResponseStatus::Error,
                "code {code} should be error"
            );
        }
    }

    #[test]
    fn envelope_serializes_without_absent_keys() {
        let envelope = ResponseEnvelope::from_status_code(500)
            .with_message("connection refused");
        let value = serde_json::json!(envelope);
        let map = value.as_object().unwrap();
        assert!(!map.contains_key("data"));
        assert_eq!(map["status"], "error");
        assert_eq!(map["status_code"], 500);
        assert_eq!(map["message"], "connection refused");
    }

    #[test]
    fn envelope_merges_data_payload() {
        let envelope = ResponseEnvelope::from_status_code(200).with_data(json!([]));
        assert!(envelope.is_success());
        let value = serde_json::json!(envelope);
        assert_eq!(value["data"], json!([]));
        assert_eq!(value["status"], "success");
    }
}
