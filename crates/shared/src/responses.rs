//! Response envelopes returned by the HTTP API
//!
//! Successful mutations answer with `{"message": "...", "data": null}`.
//! Failures answer with `{"message": "...", "code": "..."}`, where `message`
//! is the human-readable text and `code` the stable machine-readable kind.

use serde::{Deserialize, Serialize};

// =============================================================================
// Success Envelope
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub message: String,
    /// Always serialized, `null` when the operation has no payload.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl ApiResponse {
    /// Create a success response without data
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }

    /// Create a success response with data
    pub fn with_data<T: Serialize>(
        message: impl Into<String>,
        data: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            message: message.into(),
            data: Some(serde_json::to_value(data)?),
        })
    }
}

// =============================================================================
// Error Envelope
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: ErrorCode,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }
}

// =============================================================================
// Error Codes
// =============================================================================

/// Error classification codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // === Rule violations ===
    SourceUserNotFound,
    TargetUserNotFound,
    UserNotFound,
    ItemsNotOwnedBySource,
    ItemsNotOwnedByUser,
    ItemsEquippedToCharacter,
    ItemsAlreadyEquipped,
    CharacterNotFound,
    CharacterNotOwnedByUser,
    ItemsNotEquippedToCharacter,
    /// The guarded write found the items changed since they were checked
    ConcurrentModification,

    // === Request errors ===
    /// Request body was malformed or failed validation
    BadRequest,

    // === Server errors ===
    Internal,

    /// Unknown variant for forward compatibility
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_keeps_null_data() {
        let json = serde_json::to_string(&ApiResponse::message("Items transferred successfully"))
            .unwrap();
        assert_eq!(
            json,
            r#"{"message":"Items transferred successfully","data":null}"#
        );
    }

    #[test]
    fn error_envelope_carries_code() {
        let response = ErrorResponse::new(ErrorCode::SourceUserNotFound, "Source user does not exist");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["message"], "Source user does not exist");
        assert_eq!(json["code"], "SOURCE_USER_NOT_FOUND");
    }

    #[test]
    fn unknown_code_deserializes() {
        let response: ErrorResponse =
            serde_json::from_str(r#"{"message":"x","code":"SOMETHING_NEW"}"#).unwrap();
        assert_eq!(response.code, ErrorCode::Unknown);
    }
}
