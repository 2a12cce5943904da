use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::services::conversation::ConversationManager;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
    active_sessions: usize,
    timestamp: DateTime<Utc>,
}

pub async fn health_check(
    State(conversations): State<Arc<ConversationManager>>,
) -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            active_sessions: conversations.store().len(),
            timestamp: Utc::now(),
        }),
    )
}
