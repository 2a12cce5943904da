use crate::config::OllamaConfig;
use crate::models::chat::Turn;
use crate::services::provider::LocalModelProvider;
use crate::utils::error::GatewayError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const BACKEND: &str = "ollama";

#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: [Turn; 2],
    stream: bool,
}

// Every field is optional: an unexpected shape yields an absent reply.
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    #[serde(default)]
    message: Option<OllamaMessage>,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Local-model adapter. Sends the fixed system context plus the latest
/// question only; prior history is never forwarded.
#[derive(Clone)]
pub struct LocalModelService {
    client: Client,
    config: OllamaConfig,
    system_context: String,
    timeout: Duration,
}

impl LocalModelService {
    pub fn new(config: OllamaConfig, system_context: String) -> Result<Self, GatewayError> {
        let timeout = Duration::from_secs(config.timeout_seconds);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Transport {
                backend: BACKEND,
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            config,
            system_context,
            timeout,
        })
    }

    pub async fn chat(&self, question: &str) -> Result<Option<String>, GatewayError> {
        debug!("Asking local model {} ({} chars)", self.config.model, question.len());

        let request = OllamaChatRequest {
            model: &self.config.model,
            messages: [Turn::system(self.system_context.clone()), Turn::user(question)],
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.config.base_url.trim_end_matches('/')))
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::from_reqwest(BACKEND, self.timeout, e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status { backend: BACKEND, status, body });
        }

        let body: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::from_reqwest(BACKEND, self.timeout, e))?;

        let reply = body.message.and_then(|message| message.content);
        if reply.is_none() {
            warn!("Local model answered without message content");
        }

        Ok(reply.or_else(|| self.config.missing_reply_fallback.clone()))
    }
}

#[async_trait::async_trait]
impl LocalModelProvider for LocalModelService {
    async fn ask(&self, question: &str) -> Result<Option<String>, GatewayError> {
        self.chat(question).await
    }
}
