//! Business inputs of the outbound gateway operations.
//!
//! These carry only what the caller supplies. The merchant code and secret are
//! added by the client when the request is signed.

use rust_decimal::Decimal;

use super::customer::{CustomerInfo, CustomerInfoClient, PaymentCard};
use super::order::{ChargeItem, Order, PaymentInfo};
use super::payment::ChargeRequestLanguage;

/// Tokenise a card for later charges. Unsigned.
#[derive(Debug, Clone)]
pub struct CreateCardTokenRequest {
    pub merchant_code: String,
    pub customer: CustomerInfo,
    pub card: PaymentCard,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefundRequest {
    pub merchant_code: String,
    /// Fawry reference of the payment being refunded.
    pub reference_number: String,
    pub refund_amount: Decimal,
    pub reason: Option<String>,
}

impl RefundRequest {
    pub fn new(
        merchant_code: impl Into<String>,
        reference_number: impl Into<String>,
        refund_amount: Decimal,
    ) -> Self {
        Self {
            merchant_code: merchant_code.into(),
            reference_number: reference_number.into(),
            refund_amount,
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Server-side charge against a saved card or a pay-at-Fawry reference.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeRequest {
    pub merchant_code: String,
    pub merchant_ref_num: String,
    pub customer: CustomerInfo,
    pub payment: PaymentInfo,
    pub charge_items: Vec<ChargeItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCardTokensQuery {
    pub merchant_code: String,
    pub customer_profile_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentStatusQuery {
    pub merchant_code: String,
    pub merchant_ref_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteCardTokenQuery {
    pub merchant_code: String,
    pub customer_profile_id: String,
    pub card_token: String,
}

/// Charge request handed to the browser checkout script.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientChargeRequest {
    pub merchant_code: String,
    pub merchant_ref_number: String,
    pub customer: CustomerInfoClient,
    pub order: Order,
    pub language: ChargeRequestLanguage,
}
