use crate::models::chat::{ChatRequest, ReplyResponse, UserId};
use crate::services::conversation::{validate_message, ConversationManager};
use crate::utils::error::ApiError;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;
use tracing::info;

/// `POST /api/chatbot`: hosted completion with the user's full history.
pub async fn chatbot_handler(
    State(conversations): State<Arc<ConversationManager>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ReplyResponse>, ApiError> {
    let (user_id, message) = session_request(payload)?;
    info!("Chat request: user={}, message_len={}", user_id, message.len());

    let reply = conversations.chat(&user_id, &message).await?;
    Ok(Json(ReplyResponse { reply }))
}

/// `POST /api/rag`: same session bookkeeping, answered by the document service.
pub async fn rag_handler(
    State(conversations): State<Arc<ConversationManager>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ReplyResponse>, ApiError> {
    let (user_id, message) = session_request(payload)?;
    info!("Document query: user={}, message_len={}", user_id, message.len());

    let reply = conversations.ask_documents(&user_id, &message).await?;
    Ok(Json(ReplyResponse { reply }))
}

/// Validate a session-keyed request. The user id is never validated; a
/// missing or null id falls back to one shared anonymous session.
fn session_request(
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<(UserId, String), ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let message = validate_message(request.message.as_deref())?.to_string();
    let user_id = request.user_id.unwrap_or_else(UserId::anonymous);
    Ok((user_id, message))
}
