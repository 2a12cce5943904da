use crate::config::PromptsConfig;
use crate::models::chat::Turn;

/// Default retention window (user + assistant turns, seed included).
pub const DEFAULT_MAX_TURNS: usize = 10;

/// Fixed opening turns of every new session
#[derive(Debug, Clone)]
pub struct SessionSeed {
    /// Domain-scoping instructions (system turn)
    pub domain_context: String,

    /// "Answer briefly" priming message (user turn)
    pub brevity_instruction: String,
}

impl SessionSeed {
    pub fn new(domain_context: impl Into<String>, brevity_instruction: impl Into<String>) -> Self {
        Self {
            domain_context: domain_context.into(),
            brevity_instruction: brevity_instruction.into(),
        }
    }

    /// `[system: domain_context, user: brevity_instruction]`
    pub fn turns(&self) -> Vec<Turn> {
        vec![
            Turn::system(self.domain_context.clone()),
            Turn::user(self.brevity_instruction.clone()),
        ]
    }
}

impl From<&PromptsConfig> for SessionSeed {
    fn from(prompts: &PromptsConfig) -> Self {
        Self::new(prompts.domain_context.clone(), prompts.brevity_instruction.clone())
    }
}
