//! Memorial chat: thin proxy over a generative-language API.
//!
//! Fire-and-forget request/response: one upstream call, no retries. When no
//! key is configured or the upstream call fails, the caller gets a canned
//! keyword-matched reply instead of an error, so the chat widget never goes
//! silent mid-grief.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use withle::chat;
//!
//! let reply = chat::respond("안녕", None).await?;
//! ```

pub mod persona;

use serde::Deserialize;
use serde_json::json;
use std::env;

use crate::api::logs::{log_info, log_warning};
use crate::error::{ChatError, ChatResult};

pub use persona::{default_system_prompt, system_prompt, PET_NAME};

/// Model used for memorial chat replies.
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Generative-language API client.
#[derive(Clone)]
pub struct ChatClient {
    api_key: String,
    model: String,
    temperature: f64,
    max_output_tokens: u32,
}

/// Upstream response structure (only the parts we read).
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<UpstreamError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct UpstreamError {
    message: String,
}

impl ChatClient {
    /// Create a new client with an explicit API key.
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_output_tokens: 300,
        }
    }

    /// Create a client from the environment. Several key names are accepted
    /// because deployments have used all of them over time.
    pub fn from_env() -> ChatResult<Self> {
        let _ = dotenvy::dotenv();

        let api_key = ["GEMINI_API_KEY", "GOOGLE_API_KEY", "API_KEY"]
            .iter()
            .find_map(|name| env::var(name).ok())
            .ok_or(ChatError::MissingApiKey)?;

        Ok(Self::new(api_key))
    }

    /// Set the model to use.
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// One generate call: user message plus optional persona prompt.
    pub async fn generate(
        &self,
        message: &str,
        system_prompt: Option<&str>,
    ) -> ChatResult<String> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let mut body = json!({
            "contents": [{ "parts": [{ "text": message }] }],
            "generationConfig": {
                "temperature": self.temperature,
                "maxOutputTokens": self.max_output_tokens
            }
        });
        if let Some(prompt) = system_prompt {
            body["systemInstruction"] = json!({ "parts": [{ "text": prompt }] });
        }

        let client = reqwest::Client::new();
        let response = client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::RequestFailed(e.to_string()))?;

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ChatError::InvalidResponse(e.to_string()))?;

        if let Some(error) = parsed.error {
            return Err(ChatError::ApiError(error.message));
        }

        Ok(extract_reply(parsed))
    }
}

/// Pull the first candidate's text, with the puzzled-dog line when the
/// response carries no usable part.
fn extract_reply(response: GenerateResponse) -> String {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .map(|p| p.text)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "멍... (말을 이해하지 못했어요)".to_string())
}

/// Canned keyword-matched reply for demo mode and upstream failures.
pub fn mock_reply(message: &str) -> String {
    let reply = if message.contains("안녕") {
        "안녕! 나 여기서 잘 지내고 있어! 꼬리 흔들흔들~ 🐕"
    } else if message.contains("사랑해") {
        "나도 정말 많이 사랑해! 꿈에서 만나자! 💖"
    } else if message.contains("보고싶어") {
        "울지마! 난 항상 네 곁에 있어. 눈 감으면 내가 보일 거야! ✨"
    } else if message.contains("간식") {
        "여기 간식 진짜 많아! 친구들이랑 나눠 먹고 있어! 🍖"
    } else {
        "멍! 무슨 말인지 잘 모르겠지만 사랑해! 💕 (데모 모드)"
    };
    reply.to_string()
}

/// Produce a chat reply for the given message.
///
/// Empty messages are rejected; everything else succeeds. A missing key or
/// a failed upstream call degrades to [`mock_reply`] rather than erroring,
/// matching the single-fallback contract.
pub async fn respond(message: &str, system_prompt: Option<&str>) -> ChatResult<String> {
    if message.trim().is_empty() {
        return Err(ChatError::EmptyMessage);
    }

    match ChatClient::from_env() {
        Ok(client) => match client.generate(message, system_prompt).await {
            Ok(reply) => Ok(reply),
            Err(e) => {
                log_warning(format!("Chat upstream failed, using mock reply: {}", e));
                Ok(mock_reply(message))
            }
        },
        Err(_) => {
            log_info("No chat API key configured, using mock reply");
            Ok(mock_reply(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_reply_keywords() {
        assert!(mock_reply("안녕!").contains("꼬리"));
        assert!(mock_reply("많이 사랑해").contains("꿈에서"));
        assert!(mock_reply("너무 보고싶어").contains("곁에"));
        assert!(mock_reply("간식 먹었어?").contains("간식"));
        assert!(mock_reply("날씨 어때").contains("데모 모드"));
    }

    #[test]
    fn test_extract_reply_happy_path() {
        let body = r#"{
            "candidates": [
                { "content": { "parts": [ { "text": "멍멍! 잘 지내!" } ] } }
            ]
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(extract_reply(parsed), "멍멍! 잘 지내!");
    }

    #[test]
    fn test_extract_reply_empty_candidates() {
        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(extract_reply(parsed), "멍... (말을 이해하지 못했어요)");
    }

    #[test]
    fn test_upstream_error_deserializes() {
        let body = r#"{ "error": { "message": "quota exceeded" } }"#;
        let parsed: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error.unwrap().message, "quota exceeded");
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let err = respond("   ", None).await.unwrap_err();
        assert!(matches!(err, ChatError::EmptyMessage));
    }
}
