//! Wire format of the `Parse` call
//!
//! `POST /parser.Parser/Parse` with a [`ParseRequest`] body. The service answers
//! with a [`ParseResponse`]: `200` and message `OK` when the batch was
//! persisted, `400` and message `FAILED` plus a status code name and detail
//! text otherwise.

use serde::{Deserialize, Serialize};

/// Route of the `Parse` operation
pub const PARSE_PATH: &str = "/parser.Parser/Parse";

/// Route of the liveness probe
pub const HEALTH_PATH: &str = "/healthz";

pub const MESSAGE_OK: &str = "OK";
pub const MESSAGE_FAILED: &str = "FAILED";

/// Status code name sent when the batch itself is rejected
pub const CODE_INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
/// Status code name sent when the service fails for reasons unrelated to the batch
pub const CODE_INTERNAL: &str = "INTERNAL";
/// Status code name the client reports when the service cannot be reached
pub const CODE_UNAVAILABLE: &str = "UNAVAILABLE";

/// Request envelope: the raw batch as a JSON array string
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseRequest {
    pub data: String,
}

/// Response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResponse {
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ParseResponse {
    pub fn ok() -> Self {
        Self {
            message: MESSAGE_OK.to_string(),
            code: None,
            detail: None,
        }
    }

    pub fn failed(code: &str, detail: impl Into<String>) -> Self {
        Self {
            message: MESSAGE_FAILED.to_string(),
            code: Some(code.to_string()),
            detail: Some(detail.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_response_has_only_message() {
        let json = serde_json::to_string(&ParseResponse::ok()).unwrap();
        assert_eq!(json, r#"{"message":"OK"}"#);
    }

    #[test]
    fn test_failed_response() {
        let json =
            serde_json::to_string(&ParseResponse::failed(CODE_INVALID_ARGUMENT, "bad row"))
                .unwrap();
        assert_eq!(
            json,
            r#"{"message":"FAILED","code":"INVALID_ARGUMENT","detail":"bad row"}"#
        );
    }
}
