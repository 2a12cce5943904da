pub mod conversation;
pub mod ollama;
pub mod openai;
pub mod provider;
pub mod rag_query;

#[cfg(test)]
pub(crate) mod test_support;

pub use ollama::LocalModelService;
pub use openai::HostedCompletionService;
pub use provider::{ChatCompletionProvider, DocumentQueryProvider, LocalModelProvider};
pub use rag_query::DocumentQueryService;
