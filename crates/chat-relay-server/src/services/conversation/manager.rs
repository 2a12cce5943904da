use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::prompts::EMPTY_MESSAGE_ERROR;
use crate::models::chat::{Turn, UserId};
use crate::services::provider::{ChatCompletionProvider, DocumentQueryProvider};
use crate::utils::error::{ApiError, GatewayError};

use super::cache::{ConversationStore, StoreError};
use super::locks::SessionLocks;

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

/// Reject empty or whitespace-only messages before anything is mutated.
pub fn validate_message(message: Option<&str>) -> Result<&str, ApiError> {
    match message {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ApiError::BadRequest(EMPTY_MESSAGE_ERROR.to_string())),
    }
}

/// Runs one exchange against the session store:
/// validate → resolve session → append user turn → call backend →
/// append reply and trim. A failed backend call leaves the user turn in place.
pub struct ConversationManager {
    store: Arc<ConversationStore>,
    locks: Option<SessionLocks>,
    completion_provider: Arc<dyn ChatCompletionProvider>,
    document_provider: Arc<dyn DocumentQueryProvider>,
}

impl ConversationManager {
    pub fn new(
        store: Arc<ConversationStore>,
        completion_provider: Arc<dyn ChatCompletionProvider>,
        document_provider: Arc<dyn DocumentQueryProvider>,
    ) -> Self {
        Self {
            store,
            locks: None,
            completion_provider,
            document_provider,
        }
    }

    /// Hold a per-user lock for the whole exchange instead of letting
    /// concurrent requests of the same user interleave.
    pub fn with_session_locks(mut self) -> Self {
        self.locks = Some(SessionLocks::new());
        self
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Hosted-completion path: the backend sees the full history.
    pub async fn chat(&self, user_id: &UserId, message: &str) -> Result<String, ApiError> {
        let provider = self.completion_provider.clone();
        self.exchange(user_id, message, "hosted", |turns| async move {
            provider.complete(&turns).await
        })
        .await
    }

    /// Document-query path: history is recorded but only the question is sent.
    pub async fn ask_documents(&self, user_id: &UserId, message: &str) -> Result<String, ApiError> {
        let provider = self.document_provider.clone();
        let question = message.to_string();
        self.exchange(user_id, message, "documents", |_turns| async move {
            provider.query(&question).await
        })
        .await
    }

    async fn exchange<F, Fut>(
        &self,
        user_id: &UserId,
        message: &str,
        backend: &'static str,
        call: F,
    ) -> Result<String, ApiError>
    where
        F: FnOnce(Vec<Turn>) -> Fut,
        Fut: Future<Output = Result<String, GatewayError>>,
    {
        let message = validate_message(Some(message))?;
        let request_id = Uuid::new_v4();
        let start = Instant::now();

        let _guard = match &self.locks {
            Some(locks) => Some(locks.acquire(user_id).await),
            None => None,
        };

        self.store.get_or_create(user_id);
        let turns = self.store.append_user(user_id, message)?;
        debug!(
            %request_id,
            user_id = %user_id,
            backend,
            turns = turns.len(),
            "Session resolved, calling backend"
        );

        let reply = match call(turns).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(
                    %request_id,
                    user_id = %user_id,
                    backend,
                    kind = err.kind(),
                    "Backend call failed, user turn kept"
                );
                return Err(ApiError::Gateway(err));
            }
        };

        self.store.append_assistant(user_id, reply.as_str())?;
        info!(
            %request_id,
            user_id = %user_id,
            backend,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Reply appended"
        );

        Ok(reply)
    }
}
