//! PostgreSQL store backend
//!
//! One repository struct per store trait, all sharing a `PgPool`. Queries use
//! runtime `sqlx::query_as` so the crate builds without a live database.

pub mod conversations;
pub mod friends;
pub mod messages;
pub mod users;

pub use conversations::PgConversationStore;
pub use friends::PgFriendRequestStore;
pub use messages::PgMessageStore;
pub use users::PgUserDirectory;
