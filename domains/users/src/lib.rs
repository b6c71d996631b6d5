//! Users domain: profiles, presence status, identity sync

pub mod api;

pub use api::routes;
pub use api::UsersState;
