use axum::extract::FromRef;
use std::sync::Arc;
use tracing::info;

use crate::config::Settings;
use crate::services::conversation::{ConversationManager, ConversationStore, SessionSeed};
use crate::services::{
    DocumentQueryService, HostedCompletionService, LocalModelProvider, LocalModelService,
};
use crate::utils::error::GatewayError;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub conversations: Arc<ConversationManager>,
    pub local_model: Arc<dyn LocalModelProvider>,
}

impl AppState {
    pub fn new(
        conversations: Arc<ConversationManager>,
        local_model: Arc<dyn LocalModelProvider>,
    ) -> Self {
        Self { conversations, local_model }
    }

    /// Build the store and every backend adapter from settings.
    pub fn from_settings(settings: &Settings) -> Result<Self, GatewayError> {
        let store = Arc::new(ConversationStore::new(
            SessionSeed::from(&settings.prompts),
            settings.conversation.max_turns,
        ));

        let hosted = Arc::new(HostedCompletionService::new(settings.openai.clone())?);
        let documents = Arc::new(DocumentQueryService::new(settings.rag.clone())?);
        let local = Arc::new(LocalModelService::new(
            settings.ollama.clone(),
            settings.prompts.domain_context.clone(),
        )?);

        let mut manager = ConversationManager::new(store, hosted, documents);
        if settings.conversation.serialize_per_user {
            info!("Per-user exchange serialization enabled");
            manager = manager.with_session_locks();
        }

        Ok(Self::new(Arc::new(manager), local))
    }
}

impl FromRef<AppState> for Arc<ConversationManager> {
    fn from_ref(state: &AppState) -> Self {
        state.conversations.clone()
    }
}

impl FromRef<AppState> for Arc<dyn LocalModelProvider> {
    fn from_ref(state: &AppState) -> Self {
        state.local_model.clone()
    }
}
