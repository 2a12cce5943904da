pub mod prompts;
pub mod settings;

pub use settings::{
    ConversationConfig, OllamaConfig, OpenAiConfig, PromptsConfig, RagConfig, ServerConfig,
    Settings,
};
