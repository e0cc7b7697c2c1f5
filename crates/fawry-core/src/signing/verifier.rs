//! Notification verifier.
//!
//! A mismatch is an ordinary outcome, not an error. Errors are reserved for
//! notifications that lack a field the recipe needs.

use tracing::{debug, warn};

use super::recipes::SignedNotification;
use super::secret::SecretKey;
use crate::types::{NotificationV1, NotificationV2};
use crate::{Error, Result};

/// Outcome of checking a notification's signature.
#[derive(Debug, Clone, PartialEq)]
pub enum Verification<N> {
    /// The recomputed signature equals the received one.
    Matched(N),
    /// The notification is unauthenticated and must not be acted on.
    Mismatched(N),
}

impl<N> Verification<N> {
    pub fn matched(&self) -> bool {
        matches!(self, Verification::Matched(_))
    }

    /// The notification, only if authentic.
    pub fn into_matched(self) -> Option<N> {
        match self {
            Verification::Matched(n) => Some(n),
            Verification::Mismatched(_) => None,
        }
    }

    /// The notification regardless of outcome. For logging and diagnostics only.
    pub fn untrusted(&self) -> &N {
        match self {
            Verification::Matched(n) | Verification::Mismatched(n) => n,
        }
    }

    /// Turn a mismatch into [`Error::SignatureMismatch`].
    #[allow(clippy::result_large_err)]
    pub fn into_authentic_or_err(self) -> Result<N> {
        match self {
            Verification::Matched(n) => Ok(n),
            Verification::Mismatched(_) => Err(Error::SignatureMismatch),
        }
    }
}

/// Recomputes and compares notification signatures.
#[derive(Debug, Clone)]
pub struct NotificationVerifier {
    secret: SecretKey,
}

impl NotificationVerifier {
    pub fn new(secret: impl Into<SecretKey>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// The signature the gateway should have sent for `notification`.
    #[allow(clippy::result_large_err)]
    pub fn expected_signature<N: SignedNotification>(&self, notification: &N) -> Result<String> {
        let fields = notification.signature_fields(&self.secret)?;
        Ok(N::OPERATION.signing_options().signature(&fields))
    }

    /// Compare the received signature with the recomputed one, case-sensitively.
    #[allow(clippy::result_large_err)]
    pub fn verify<N: SignedNotification>(&self, notification: N) -> Result<Verification<N>> {
        let received = notification.received_signature()?;
        let expected = self.expected_signature(&notification)?;

        if received == expected {
            debug!(operation = %N::OPERATION, "Notification signature matched");
            Ok(Verification::Matched(notification))
        } else {
            warn!(
                operation = %N::OPERATION,
                received = %received,
                "Notification signature mismatch"
            );
            Ok(Verification::Mismatched(notification))
        }
    }

    /// Parse and verify a V1 callback given as key/value pairs.
    #[allow(clippy::result_large_err)]
    pub fn verify_v1_pairs<I, K, V>(&self, pairs: I) -> Result<Verification<NotificationV1>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.verify(NotificationV1::from_pairs(pairs)?)
    }

    /// Parse and verify a V2 callback body.
    #[allow(clippy::result_large_err)]
    pub fn verify_v2_json(&self, body: &str) -> Result<Verification<NotificationV2>> {
        self.verify(NotificationV2::from_json(body)?)
    }
}
