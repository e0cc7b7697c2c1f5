//! Customer and card types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::millis_to_datetime;

/// Customer identity sent with server-side requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub profile_id: String,
    pub mobile: Option<String>,
    pub email: Option<String>,
}

impl CustomerInfo {
    /// Build a customer; the mobile number is normalised to the local format.
    pub fn new(profile_id: impl Into<String>, mobile: Option<&str>, email: Option<&str>) -> Self {
        Self {
            profile_id: profile_id.into(),
            mobile: mobile.map(normalize_mobile),
            email: email.map(str::to_string),
        }
    }

    pub fn profile_only(profile_id: impl Into<String>) -> Self {
        Self::new(profile_id, None, None)
    }
}

/// Strip spaces and the `+2` international prefix (`+20 100 545 8821` -> `01005458821`).
pub fn normalize_mobile(mobile: &str) -> String {
    mobile.replace(' ', "").replace("+2", "")
}

/// Customer shape embedded in the browser checkout charge request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfoClient {
    #[serde(rename = "customerProfileId", skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl CustomerInfoClient {
    pub fn new(
        name: impl Into<String>,
        mobile: impl Into<String>,
        email: impl Into<String>,
        profile_id: Option<String>,
    ) -> Self {
        Self {
            profile_id,
            name: Some(name.into()),
            mobile: Some(mobile.into()),
            email: Some(email.into()),
        }
    }
}

/// Raw card details, only ever sent to the tokenisation endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct PaymentCard {
    pub card_number: String,
    pub cvv: String,
    /// Two-digit expiry month.
    pub month: String,
    /// Two-digit expiry year.
    pub year: String,
}

impl PaymentCard {
    pub fn new(
        card_number: impl Into<String>,
        cvv: impl Into<String>,
        month: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            card_number: card_number.into(),
            cvv: cvv.into(),
            month: month.into(),
            year: year.into(),
        }
    }

    pub fn last_four(&self) -> &str {
        let len = self.card_number.len();
        self.card_number.get(len.saturating_sub(4)..).unwrap_or("")
    }
}

impl std::fmt::Debug for PaymentCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentCard")
            .field("card_number", &format!("****{}", self.last_four()))
            .field("cvv", &"[REDACTED]")
            .field("month", &self.month)
            .field("year", &self.year)
            .finish()
    }
}

/// A tokenised card as returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub token: String,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub creation_date: i64,
    #[serde(default)]
    pub last_four_digits: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
}

impl Card {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        millis_to_datetime(self.creation_date)
    }
}
