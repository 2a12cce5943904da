use crate::config::RagConfig;
use crate::services::provider::DocumentQueryProvider;
use crate::utils::error::GatewayError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const BACKEND: &str = "rag";

#[derive(Serialize)]
struct QueryRequest<'a> {
    question: &'a str,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    response: Option<String>,
}

/// Document-query adapter for the retrieval service (`POST /query`).
#[derive(Clone)]
pub struct DocumentQueryService {
    client: Client,
    config: RagConfig,
    timeout: Duration,
}

impl DocumentQueryService {
    pub fn new(config: RagConfig) -> Result<Self, GatewayError> {
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

    pub async fn query_documents(&self, question: &str) -> Result<String, GatewayError> {
        debug!("Querying document service ({} chars)", question.len());

        let response = self
            .client
            .post(format!("{}/query", self.config.base_url.trim_end_matches('/')))
            .json(&QueryRequest { question })
            .send()
            .await
            .map_err(|e| GatewayError::from_reqwest(BACKEND, self.timeout, e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status { backend: BACKEND, status, body });
        }

        let body: QueryResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::from_reqwest(BACKEND, self.timeout, e))?;

        Ok(body
            .response
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| self.config.fallback_reply.clone()))
    }
}

#[async_trait::async_trait]
impl DocumentQueryProvider for DocumentQueryService {
    async fn query(&self, question: &str) -> Result<String, GatewayError> {
        self.query_documents(question).await
    }
}
