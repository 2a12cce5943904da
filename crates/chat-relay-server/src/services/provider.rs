//! Backend seams of the model gateway.
//!
//! Each endpoint is wired to exactly one of these; the history each one
//! receives differs on purpose and must not be unified.

use crate::models::chat::Turn;
use crate::utils::error::GatewayError;

/// Hosted completion API: receives the full conversation history.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ChatCompletionProvider: Send + Sync {
    async fn complete(&self, turns: &[Turn]) -> Result<String, GatewayError>;
}

/// Local model server: receives only the latest question, under the fixed
/// system context. `None` when the server answered without content.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait LocalModelProvider: Send + Sync {
    async fn ask(&self, question: &str) -> Result<Option<String>, GatewayError>;
}

/// Document-query service: receives only the latest question.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DocumentQueryProvider: Send + Sync {
    async fn query(&self, question: &str) -> Result<String, GatewayError>;
}
