//! Friends domain: friend requests and the acceptance flow that opens
//! a 1:1 conversation

pub mod api;

pub use api::routes;
pub use api::FriendsState;
