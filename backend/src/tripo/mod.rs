//! 3D avatar generation: proxy over the Tripo API.
//!
//! Three upstream actions (upload / create_task / get_task) plus a bounded
//! poller for the generation task. The API key never reaches the browser;
//! the frontend talks to `/api/tripo` and this module forwards.
//!
//! Generation takes 2-3 minutes; the poller checks on a fixed interval and
//! gives up after a bounded attempt count. Accounts without generation
//! credits get a typed error so callers can fall back to the demo asset.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::Value;
use std::env;
use std::time::Duration;

use crate::api::logs::{log_info, log_warning};
use crate::error::{TripoError, TripoResult};

/// Fixed poll interval.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Polling cap: 60 × 5 s = 5 minutes.
pub const MAX_POLL_ATTEMPTS: u32 = 60;

/// Public demo asset served when the account has no generation credits.
pub const DEMO_MODEL_URL: &str = "https://modelviewer.dev/shared-assets/models/shishkebab.glb";

const DEFAULT_BASE_URL: &str = "https://api.tripo3d.ai/v2/openapi";

/// Tripo API client.
#[derive(Clone)]
pub struct TripoClient {
    api_key: String,
    base_url: String,
    http: reqwest::Client,
}

impl TripoClient {
    /// Create a client with an explicit API key.
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Create a client from the `TRIPO_API_KEY` environment variable.
    pub fn from_env() -> TripoResult<Self> {
        let _ = dotenvy::dotenv();
        let api_key = env::var("TRIPO_API_KEY").map_err(|_| TripoError::MissingApiKey)?;
        Ok(Self::new(api_key))
    }

    /// Override the upstream base URL.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Dispatch one proxied action, `{action, payload}` as the frontend
    /// sends it.
    pub async fn dispatch(&self, action: &str, payload: &Value) -> TripoResult<Value> {
        match action {
            "upload" => {
                let filename = required_str(payload, "filename")?;
                let content = required_str(payload, "content")?;
                let ext = required_str(payload, "type")?;
                self.upload(filename, content, ext).await
            }
            "create_task" => {
                let file_token = required_str(payload, "file_token")?;
                self.create_task(file_token).await
            }
            "get_task" => {
                let task_id = required_str(payload, "task_id")?;
                self.get_task(task_id).await
            }
            other => Err(TripoError::UnknownAction(other.to_string())),
        }
    }

    /// Step 1: upload the source photo (base64) as a multipart file.
    pub async fn upload(
        &self,
        filename: &str,
        content_b64: &str,
        ext: &str,
    ) -> TripoResult<Value> {
        let bytes = BASE64
            .decode(content_b64)
            .map_err(|e| TripoError::InvalidPayload(format!("content is not base64: {e}")))?;

        let mime = format!(
            "image/{}",
            if ext.eq_ignore_ascii_case("jpg") { "jpeg" } else { ext }
        );
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(&mime)
            .map_err(|e| TripoError::InvalidPayload(format!("bad mime type: {e}")))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(format!("{}/upload", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TripoError::RequestFailed(e.to_string()))?;

        let result: Value = response
            .json()
            .await
            .map_err(|e| TripoError::RequestFailed(e.to_string()))?;
        check_business_code(&result)?;
        Ok(result)
    }

    /// Step 2: create the image-to-model generation task.
    pub async fn create_task(&self, file_token: &str) -> TripoResult<Value> {
        let body = serde_json::json!({
            "type": "image_to_model",
            "file": {
                "type": "jpg",
                "file_token": file_token
            }
        });

        let response = self
            .http
            .post(format!("{}/task", self.base_url))
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| TripoError::RequestFailed(e.to_string()))?;

        let result: Value = response
            .json()
            .await
            .map_err(|e| TripoError::RequestFailed(e.to_string()))?;
        check_business_code(&result)?;
        Ok(result)
    }

    /// Step 3: fetch task status. Returned verbatim, no code check: status
    /// interpretation belongs to the poller.
    pub async fn get_task(&self, task_id: &str) -> TripoResult<Value> {
        let response = self
            .http
            .get(format!("{}/task/{}", self.base_url, task_id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| TripoError::RequestFailed(e.to_string()))?;

        response
            .json()
            .await
            .map_err(|e| TripoError::RequestFailed(e.to_string()))
    }
}

/// Upstream uses `code: 0` for success on upload/create.
fn check_business_code(result: &Value) -> TripoResult<()> {
    let code = result.get("code").and_then(Value::as_i64).unwrap_or(-1);
    if code == 0 {
        return Ok(());
    }
    let message = result
        .get("message")
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| result.to_string());
    Err(TripoError::from_upstream(code, message))
}

fn required_str<'a>(payload: &'a Value, key: &str) -> TripoResult<&'a str> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| TripoError::InvalidPayload(format!("missing field '{key}'")))
}

// =============================================================================
// Task polling
// =============================================================================

/// Interpreted task state from a get_task response.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskState {
    /// Terminal: model generated. URL may still be absent on some plans.
    Success { model_url: Option<String> },
    /// Terminal: generation failed upstream.
    Failed { message: String },
    /// Queued or running; progress percent when reported.
    Pending { progress: Option<u64> },
}

/// Interpret a raw get_task response. The task object is `data` when
/// present, otherwise the response root (both shapes occur in the wild).
pub fn parse_task_state(response: &Value) -> TaskState {
    let task = response.get("data").unwrap_or(response);

    match task.get("status").and_then(Value::as_str) {
        Some("success") => {
            let model_url = task
                .pointer("/output/model")
                .or_else(|| task.get("model_url"))
                .and_then(Value::as_str)
                .map(String::from);
            TaskState::Success { model_url }
        }
        Some("failed") => {
            let message = task
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("알 수 없는 오류")
                .to_string();
            TaskState::Failed { message }
        }
        _ => TaskState::Pending {
            progress: task.get("progress").and_then(Value::as_u64),
        },
    }
}

/// Poll a generation task until it reaches a terminal state.
///
/// Checks every [`POLL_INTERVAL`], at most [`MAX_POLL_ATTEMPTS`] times.
/// Transient poll errors are logged and polling continues; running out of
/// attempts is [`TripoError::PollTimeout`]. On success the model URL is
/// returned.
pub async fn poll_task(client: &TripoClient, task_id: &str) -> TripoResult<String> {
    for attempt in 1..=MAX_POLL_ATTEMPTS {
        tokio::time::sleep(POLL_INTERVAL).await;

        let response = match client.get_task(task_id).await {
            Ok(value) => value,
            Err(e) => {
                // Minor network glitches should not kill a 3-minute wait.
                log_warning(format!("Poll attempt {attempt} failed: {e}"));
                continue;
            }
        };

        match parse_task_state(&response) {
            TaskState::Success { model_url } => {
                return model_url.ok_or_else(|| {
                    TripoError::TaskFailed("모델 URL을 찾을 수 없습니다.".to_string())
                });
            }
            TaskState::Failed { message } => {
                return Err(TripoError::TaskFailed(message));
            }
            TaskState::Pending { progress } => {
                let pct = progress
                    .unwrap_or_else(|| (attempt as u64 * 100) / MAX_POLL_ATTEMPTS as u64);
                log_info(format!("3D 모델 생성 중... ({pct}%)"));
            }
        }
    }

    Err(TripoError::PollTimeout(MAX_POLL_ATTEMPTS))
}

/// The demo asset for errors that should degrade instead of failing the
/// user experience.
pub fn demo_fallback(error: &TripoError) -> Option<&'static str> {
    match error {
        TripoError::InsufficientCredits => Some(DEMO_MODEL_URL),
        _ => None,
    }
}
