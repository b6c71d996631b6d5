//! Domain logic for the Conversations domain

pub mod summary;
