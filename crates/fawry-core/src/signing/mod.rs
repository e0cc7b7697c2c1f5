//! Canonical signing and verification.
//!
//! Outbound requests are signed by [`RequestSigner`] before transport; inbound
//! notifications are checked by [`NotificationVerifier`] after parsing and
//! before their contents are trusted. Both are pure and stateless.

pub mod digest;
pub mod fields;
pub mod format;
pub mod options;
pub mod payload;
pub mod recipes;
pub mod secret;
pub mod signer;
pub mod verifier;

pub use digest::{digest, HashAlgorithm};
pub use fields::SignatureFields;
pub use format::{fixed_decimal, upper_symbol, Canonical, Symbolic};
pub use options::{FieldProjection, SignatureTransform, SigningOptions};
pub use payload::{Payload, PayloadValue, SignedEnvelope, SIGNATURE_KEY};
pub use recipes::{items_hash, Operation, SignedNotification, SignedRequest};
pub use secret::SecretKey;
pub use signer::RequestSigner;
pub use verifier::{NotificationVerifier, Verification};
