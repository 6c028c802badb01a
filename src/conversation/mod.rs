// ============================================================================
// Conversation - per-message context, reply composition, the bot pipeline
// ============================================================================

mod bot;
pub mod composer;
pub mod context;
pub mod texts;

pub use bot::ChatBot;
pub use composer::{compose, compose_reply};
pub use context::{load_conversation, ConversationContext};
