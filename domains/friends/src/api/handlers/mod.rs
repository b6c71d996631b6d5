//! HTTP handlers for the Friends domain

pub mod requests;
