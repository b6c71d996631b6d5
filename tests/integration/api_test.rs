//! API endpoint integration tests
//!
//! Exercises every domain router over an in-memory store: users,
//! conversations, messages, friend requests.

#![allow(dead_code)]

mod common;
mod conversations;
mod friends;
mod users;
