//! Side actions that reach outside the process
//!
//! - Recipe ideas from a hosted chat-completion API
//! - Shopping reminders through desktop notifications

pub mod recipe;
pub mod reminder;
