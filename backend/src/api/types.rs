//! REST API types for frontend integration.
//!
//! `GET /api/funeral-homes` returns the record array bare (the list and
//! detail pages consume it directly); the proxy endpoints wrap their
//! payloads in the small request/response types below.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// The user's message. Required.
    pub message: String,

    /// Optional persona override sent by the frontend; when absent the
    /// upstream call goes out without a system instruction.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

/// Body of a successful `POST /api/chat` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// Body of `POST /api/tripo`: one proxied upstream action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripoRequest {
    pub action: String,
    #[serde(default)]
    pub payload: Value,
}

/// Create an error response body.
pub fn error_response(error: &str) -> Value {
    json!({ "error": error })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_accepts_missing_system_prompt() {
        let req: ChatRequest = serde_json::from_str(r#"{ "message": "안녕" }"#).unwrap();
        assert_eq!(req.message, "안녕");
        assert!(req.system_prompt.is_none());
    }

    #[test]
    fn test_chat_request_camel_case_field() {
        let req: ChatRequest =
            serde_json::from_str(r#"{ "message": "hi", "systemPrompt": "persona" }"#).unwrap();
        assert_eq!(req.system_prompt.as_deref(), Some("persona"));
    }

    #[test]
    fn test_tripo_request_defaults_payload() {
        let req: TripoRequest = serde_json::from_str(r#"{ "action": "get_task" }"#).unwrap();
        assert_eq!(req.action, "get_task");
        assert!(req.payload.is_null());
    }

    #[test]
    fn test_error_response_shape() {
        let body = error_response("boom");
        assert_eq!(body["error"], "boom");
    }
}
