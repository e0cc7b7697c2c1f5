//! Request handlers.

pub mod callbacks;
pub mod health;
