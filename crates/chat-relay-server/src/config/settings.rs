use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::prompts::{
    DEFAULT_BREVITY_INSTRUCTION, DEFAULT_DOMAIN_CONTEXT, DEFAULT_RAG_FALLBACK_REPLY,
};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub openai: OpenAiConfig,
    pub ollama: OllamaConfig,
    pub rag: RagConfig,
    pub conversation: ConversationConfig,
    pub prompts: PromptsConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served as the router fallback (the chat widget).
    #[serde(default)]
    pub static_dir: Option<String>,
}

/// Hosted completion API (OpenAI-compatible).
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OpenAiConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: usize,
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_seconds: u64,
    /// When set, replaces a reply the model server did not provide.
    #[serde(default)]
    pub missing_reply_fallback: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RagConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub fallback_reply: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ConversationConfig {
    /// Turns kept per session after each completed exchange.
    pub max_turns: usize,
    /// Serialize exchanges of the same user behind a per-user lock.
    pub serialize_per_user: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PromptsConfig {
    pub domain_context: String,
    pub brevity_instruction: String,
}

impl Settings {
    /// Load settings from defaults, `config/settings.toml`, `APP__*` variables
    /// and the legacy `PORT` / `OPENAI_API_KEY` / `OLLAMA_HOST` variables.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::defaults()?
            .add_source(File::with_name("config/settings").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .set_override_option("openai.api_key", std::env::var("OPENAI_API_KEY").ok())?
            .set_override_option(
                "ollama.base_url",
                std::env::var("OLLAMA_HOST").ok().map(|h| normalize_base_url(&h)),
            )?
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }

    /// Builder preloaded with every default, no external sources.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000_i64)?
            .set_default("server.static_dir", "public")?
            .set_default("openai.base_url", "https://api.openai.com")?
            .set_default("openai.model", "gpt-3.5-turbo")?
            .set_default("openai.max_tokens", 200_i64)?
            .set_default("openai.timeout_seconds", 60_i64)?
            .set_default("ollama.base_url", "http://127.0.0.1:11434")?
            .set_default("ollama.model", "llama3.2")?
            .set_default("ollama.timeout_seconds", 120_i64)?
            .set_default("rag.base_url", "http://localhost:8000")?
            .set_default("rag.timeout_seconds", 60_i64)?
            .set_default("rag.fallback_reply", DEFAULT_RAG_FALLBACK_REPLY)?
            .set_default("conversation.max_turns", 10_i64)?
            .set_default("conversation.serialize_per_user", false)?
            .set_default("prompts.domain_context", DEFAULT_DOMAIN_CONTEXT)?
            .set_default("prompts.brevity_instruction", DEFAULT_BREVITY_INSTRUCTION)
    }

    pub fn static_dir(&self) -> Option<PathBuf> {
        self.server
            .static_dir
            .as_deref()
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
    }
}

/// `OLLAMA_HOST` is commonly given as `host:port`; reqwest needs a scheme.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_deserialize() {
        let settings: Settings = Settings::defaults()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.openai.model, "gpt-3.5-turbo");
        assert_eq!(settings.openai.max_tokens, 200);
        assert!(settings.openai.api_key.is_none());
        assert_eq!(settings.ollama.model, "llama3.2");
        assert!(settings.ollama.missing_reply_fallback.is_none());
        assert_eq!(settings.conversation.max_turns, 10);
        assert!(!settings.conversation.serialize_per_user);
        assert_eq!(settings.prompts.domain_context, DEFAULT_DOMAIN_CONTEXT);
        assert_eq!(settings.static_dir(), Some(PathBuf::from("public")));
    }

    #[test]
    fn test_overrides_win_over_defaults() {
        let settings: Settings = Settings::defaults()
            .unwrap()
            .set_override("server.port", "8080")
            .unwrap()
            .set_override("conversation.serialize_per_user", true)
            .unwrap()
            .set_override("server.static_dir", "")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.port, 8080);
        assert!(settings.conversation.serialize_per_user);
        assert_eq!(settings.static_dir(), None);
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("127.0.0.1:11434"), "http://127.0.0.1:11434");
        assert_eq!(normalize_base_url("http://ollama:11434/"), "http://ollama:11434");
        assert_eq!(normalize_base_url(" https://models.local "), "https://models.local");
    }
}
