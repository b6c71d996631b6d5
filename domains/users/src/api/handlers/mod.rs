//! HTTP handlers for the Users domain

pub mod users;
