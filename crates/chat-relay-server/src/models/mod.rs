pub mod chat;

pub use chat::{ChatRequest, LocalReplyResponse, ReplyResponse, Role, Turn, UserId};
