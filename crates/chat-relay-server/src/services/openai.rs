use crate::config::OpenAiConfig;
use crate::models::chat::Turn;
use crate::services::provider::ChatCompletionProvider;
use crate::utils::error::GatewayError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const BACKEND: &str = "openai";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Turn],
    max_tokens: usize,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Hosted completion adapter: forwards the whole conversation.
#[derive(Clone)]
pub struct HostedCompletionService {
    client: Client,
    config: OpenAiConfig,
    timeout: Duration,
}

impl HostedCompletionService {
    pub fn new(config: OpenAiConfig) -> Result<Self, GatewayError> {
        let timeout = Duration::from_secs(config.timeout_seconds);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Transport {
                backend: BACKEND,
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client, config, timeout })
    }

    /// Generate completion without streaming (wait for full response)
    pub async fn generate_chat(&self, turns: &[Turn]) -> Result<String, GatewayError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(GatewayError::MissingCredential { backend: BACKEND })?;

        debug!("Starting chat completion with {} turns", turns.len());

        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: turns,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(format!(
                "{}/v1/chat/completions",
                self.config.base_url.trim_end_matches('/')
            ))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::from_reqwest(BACKEND, self.timeout, e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status { backend: BACKEND, status, body });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::from_reqwest(BACKEND, self.timeout, e))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| GatewayError::Malformed {
                backend: BACKEND,
                message: "No message content in first choice".to_string(),
            })
    }
}

#[async_trait::async_trait]
impl ChatCompletionProvider for HostedCompletionService {
    async fn complete(&self, turns: &[Turn]) -> Result<String, GatewayError> {
        self.generate_chat(turns).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{captured, spawn_stub};
    use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    fn config(base_url: String, api_key: Option<&str>, timeout_seconds: u64) -> OpenAiConfig {
        OpenAiConfig {
            base_url,
            api_key: api_key.map(str::to_string),
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 200,
            timeout_seconds,
        }
    }

    #[tokio::test]
    async fn test_sends_history_and_extracts_first_choice() {
        let (seen, slot) = captured();
        let app = Router::new().route(
            "/v1/chat/completions",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let slot = slot.clone();
                async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    *slot.lock().await = Some(json!({ "auth": auth, "body": body }));
                    Json(json!({
                        "choices": [
                            { "message": { "role": "assistant", "content": "En Madrid." } },
                            { "message": { "role": "assistant", "content": "ignored" } }
                        ]
                    }))
                }
            }),
        );
        let base_url = spawn_stub(app).await;
        let service = HostedCompletionService::new(config(base_url, Some("sk-test"), 5)).unwrap();

        let turns = vec![Turn::system("ctx"), Turn::user("brief"), Turn::user("¿Dónde?")];
        let reply = service.complete(&turns).await.unwrap();
        assert_eq!(reply, "En Madrid.");

        let seen = seen.lock().await.clone().unwrap();
        assert_eq!(seen["auth"], "Bearer sk-test");
        assert_eq!(seen["body"]["model"], "gpt-3.5-turbo");
        assert_eq!(seen["body"]["max_tokens"], 200);
        assert_eq!(seen["body"]["messages"].as_array().unwrap().len(), 3);
        assert_eq!(seen["body"]["messages"][0]["role"], "system");
        assert_eq!(seen["body"]["messages"][2]["content"], "¿Dónde?");
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_network() {
        let service =
            HostedCompletionService::new(config("http://127.0.0.1:9".to_string(), None, 5)).unwrap();
        let err = service.complete(&[Turn::user("hola")]).await.unwrap_err();
        assert!(matches!(err, GatewayError::MissingCredential { .. }));
    }

    #[tokio::test]
    async fn test_upstream_error_status_is_reported() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async { (StatusCode::UNAUTHORIZED, "invalid api key") }),
        );
        let base_url = spawn_stub(app).await;
        let service = HostedCompletionService::new(config(base_url, Some("bad"), 5)).unwrap();

        let err = service.complete(&[Turn::user("hola")]).await.unwrap_err();
        match err {
            GatewayError::Status { status, body, .. } => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid api key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_null_content_is_malformed() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async { Json(json!({ "choices": [ { "message": { "content": null } } ] })) }),
        );
        let base_url = spawn_stub(app).await;
        let service = HostedCompletionService::new(config(base_url, Some("sk"), 5)).unwrap();

        let err = service.complete(&[Turn::user("hola")]).await.unwrap_err();
        assert!(matches!(err, GatewayError::Malformed { .. }));
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async { "<html>gateway</html>" }),
        );
        let base_url = spawn_stub(app).await;
        let service = HostedCompletionService::new(config(base_url, Some("sk"), 5)).unwrap();

        let err = service.complete(&[Turn::user("hola")]).await.unwrap_err();
        assert!(matches!(err, GatewayError::Malformed { .. }));
    }

    #[tokio::test]
    async fn test_slow_backend_times_out() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(json!({ "choices": [] }))
            }),
        );
        let base_url = spawn_stub(app).await;
        let service = HostedCompletionService::new(config(base_url, Some("sk"), 1)).unwrap();

        let err = service.complete(&[Turn::user("hola")]).await.unwrap_err();
        assert!(matches!(err, GatewayError::Timeout { .. }));
    }
}
