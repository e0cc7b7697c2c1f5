//! Fawry Core Library
//!
//! Signing protocol, domain types and API client for the Fawry payment gateway.

pub mod api;
pub mod config;
pub mod error;
pub mod signing;
pub mod types;

pub use error::{Error, Result};
