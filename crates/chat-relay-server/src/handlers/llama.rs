use crate::models::chat::{ChatRequest, LocalReplyResponse};
use crate::services::conversation::validate_message;
use crate::services::LocalModelProvider;
use crate::utils::error::ApiError;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;
use tracing::info;

/// `POST /api/llama`: stateless; the local model sees only this question.
/// `userId` is accepted for logging but no session is read or written.
pub async fn llama_handler(
    State(local_model): State<Arc<dyn LocalModelProvider>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<LocalReplyResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let message = validate_message(request.message.as_deref())?;

    info!(
        "Local model request: user={}, message_len={}",
        request.user_id.as_ref().map(|id| id.as_str()).unwrap_or("-"),
        message.len()
    );

    let reply = local_model.ask(message).await?;
    Ok(Json(LocalReplyResponse { reply }))
}
