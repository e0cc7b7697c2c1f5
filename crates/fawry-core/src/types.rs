//! Domain types for the Fawry gateway.

pub mod customer;
pub mod notification;
pub mod order;
pub mod payment;
pub mod request;
pub mod response;

pub use customer::*;
pub use notification::*;
pub use order::*;
pub use payment::*;
pub use request::*;
pub use response::*;

use chrono::{DateTime, TimeZone, Utc};

/// Convert a gateway timestamp (milliseconds since the Unix epoch) to UTC.
pub fn millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}
