//! Conversation memory management module
//!
//! Provides in-memory per-user conversation state with:
//! - Sharded concurrent map (DashMap), seeded on first use
//! - Fixed retention window applied after each completed exchange
//! - Optional per-user serialization of exchanges

mod cache;
mod locks;
pub mod manager;
pub mod types;

pub use cache::{ConversationStore, StoreError};
pub use locks::SessionLocks;
pub use manager::{validate_message, ConversationManager};
pub use types::{SessionSeed, DEFAULT_MAX_TURNS};

pub use crate::models::chat::{Turn, UserId};
