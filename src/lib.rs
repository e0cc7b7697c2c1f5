//! Fawry Pay: merchant-side integration with the Fawry payment gateway.
//!
//! This is the root crate that hosts the cross-crate tests and benchmarks.
//! For actual functionality, use the individual crates directly:
//!
//! - `fawry-core`: signing protocol, domain types, API client, checkout helpers
//! - `notification-server`: webhook receiver for payment notifications

pub use fawry_core as core;
pub use notification_server as server;
