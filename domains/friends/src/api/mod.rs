//! API layer for the Friends domain

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::FriendsState;
pub use routes::routes;
