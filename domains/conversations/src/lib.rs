//! Conversations domain: conversation summaries, messages, read markers

pub mod api;
pub mod domain;

// Re-export domain types at the crate root for convenience
pub use domain::summary::{
    build_summaries, ConversationSummary, MessagePreview, SummaryError,
};

// Re-export API types
pub use api::routes;
pub use api::ConversationsState;
