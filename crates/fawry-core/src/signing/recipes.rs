//! Per-operation signature recipes.
//!
//! Every operation spells out, in order, the fields that enter its signature
//! and how each one is rendered. The order is the gateway's contract and is
//! never derived from struct layout.
//!
//! | Operation          | Fields                                                                                   | Digest          |
//! |--------------------|------------------------------------------------------------------------------------------|-----------------|
//! | create card token  | unsigned                                                                                 |                 |
//! | refund             | merchantCode, referenceNumber, refundAmount, reason?, secret                             | SHA-256         |
//! | create charge      | merchantCode, merchantRefNum, customerProfileId, paymentMethod, amount, cardToken, secret | SHA-256         |
//! | list card tokens   | merchantCode, customerProfileId, secret                                                  | SHA-256         |
//! | payment status     | merchantCode, merchantRefNumber, secret                                                  | SHA-256         |
//! | delete card token  | merchantCode, customerProfileId, cardToken, secret                                       | SHA-256         |
//! | client charge      | merchantCode, merchantRefNumber, customerProfileId?, itemsHash, expiryHours?, secret     | SHA-256         |
//! | V1 notification    | secret, amount (1 dp), fawryRefNo, merchantRefNo, orderStatus                             | MD5, upper-case |
//! | V2 notification    | fawryRefNumber, merchantRefNumber, paymentAmount, orderAmount, orderStatus, paymentMethod, secret | SHA-256 |

use std::fmt;

use super::fields::SignatureFields;
use super::format::{fixed_decimal, Canonical};
use super::options::SigningOptions;
use super::payload::Payload;
use super::secret::SecretKey;
use crate::types::{
    ChargeRequest, ClientChargeRequest, CreateCardTokenRequest, DeleteCardTokenQuery,
    ListCardTokensQuery, NotificationV1, NotificationV2, OrderItem, PaymentMethod,
    PaymentStatusQuery, RefundRequest,
};
use crate::{Error, Result};

/// Signed operations, outbound and inbound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Refund,
    CreateCharge,
    ListCardTokens,
    PaymentStatus,
    DeleteCardToken,
    ClientCharge,
    NotificationV1,
    NotificationV2,
}

impl Operation {
    pub const ALL: [Operation; 8] = [
        Operation::Refund,
        Operation::CreateCharge,
        Operation::ListCardTokens,
        Operation::PaymentStatus,
        Operation::DeleteCardToken,
        Operation::ClientCharge,
        Operation::NotificationV1,
        Operation::NotificationV2,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::Refund => "refund",
            Operation::CreateCharge => "create_charge",
            Operation::ListCardTokens => "list_card_tokens",
            Operation::PaymentStatus => "payment_status",
            Operation::DeleteCardToken => "delete_card_token",
            Operation::ClientCharge => "client_charge",
            Operation::NotificationV1 => "notification_v1",
            Operation::NotificationV2 => "notification_v2",
        }
    }

    pub fn signing_options(self) -> SigningOptions {
        match self {
            Operation::NotificationV1 => SigningOptions::md5_uppercase(),
            _ => SigningOptions::sha256(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An outbound request that carries a signature.
pub trait SignedRequest {
    const OPERATION: Operation;

    /// Wire fields in transmission order, without the signature.
    #[allow(clippy::result_large_err)]
    fn payload(&self) -> Result<Payload>;

    /// Fields that enter the signature, secret included.
    fn signature_fields(&self, secret: &SecretKey) -> SignatureFields;
}

/// An inbound notification that carries the signature it was sent with.
pub trait SignedNotification {
    const OPERATION: Operation;

    #[allow(clippy::result_large_err)]
    fn received_signature(&self) -> Result<&str>;

    /// Fails with [`Error::MissingField`] when a field the recipe needs is absent.
    #[allow(clippy::result_large_err)]
    fn signature_fields(&self, secret: &SecretKey) -> Result<SignatureFields>;
}

const SECRET: &str = "secret";

impl CreateCardTokenRequest {
    /// The tokenisation call is not signed.
    pub fn payload(&self) -> Payload {
        Payload::new()
            .text("merchantCode", &self.merchant_code)
            .text("customerProfileId", &self.customer.profile_id)
            .opt_text("customerMobile", self.customer.mobile.as_deref())
            .opt_text("customerEmail", self.customer.email.as_deref())
            .text("cardNumber", &self.card.card_number)
            .text("expiryYear", &self.card.year)
            .text("expiryMonth", &self.card.month)
            .text("cvv", &self.card.cvv)
    }
}

impl SignedRequest for RefundRequest {
    const OPERATION: Operation = Operation::Refund;

    fn payload(&self) -> Result<Payload> {
        Ok(Payload::new()
            .text("merchantCode", &self.merchant_code)
            .text("referenceNumber", &self.reference_number)
            .amount("refundAmount", self.refund_amount)
            .opt_text("reason", self.reason.as_deref()))
    }

    fn signature_fields(&self, secret: &SecretKey) -> SignatureFields {
        let mut fields = SignatureFields::with_capacity(5);
        fields
            .push_text("merchantCode", &self.merchant_code)
            .push_text("referenceNumber", &self.reference_number)
            .push("refundAmount", Canonical::Amount(self.refund_amount))
            .push_opt("reason", self.reason.as_deref().map(Canonical::Text))
            .push_text(SECRET, secret.expose());
        fields
    }
}

impl SignedRequest for ChargeRequest {
    const OPERATION: Operation = Operation::CreateCharge;

    fn payload(&self) -> Result<Payload> {
        let card_token = match self.payment.payment_method {
            PaymentMethod::PayAtFawry => None,
            _ => self.payment.card_token.as_deref(),
        };
        Payload::new()
            .text("merchantCode", &self.merchant_code)
            .text("merchantRefNum", &self.merchant_ref_num)
            .text("customerProfileId", &self.customer.profile_id)
            .opt_text("customerMobile", self.customer.mobile.as_deref())
            .opt_text("customerEmail", self.customer.email.as_deref())
            .text(
                "paymentMethod",
                Canonical::symbol_of(&self.payment.payment_method).render(),
            )
            .text("amount", fixed_decimal(self.payment.amount, 2))
            .text("currencyCode", &self.payment.currency_code)
            .text("description", &self.payment.description)
            .opt_integer("paymentExpiry", self.payment.payment_expiry_millis())
            .opt_text("cardToken", card_token)
            .json("chargeItems", &self.charge_items)
    }

    fn signature_fields(&self, secret: &SecretKey) -> SignatureFields {
        let mut fields = SignatureFields::with_capacity(7);
        fields
            .push_text("merchantCode", &self.merchant_code)
            .push_text("merchantRefNum", &self.merchant_ref_num)
            .push_text("customerProfileId", &self.customer.profile_id)
            .push("paymentMethod", Canonical::symbol_of(&self.payment.payment_method))
            .push("amount", Canonical::Amount(self.payment.amount))
            .push_text("cardToken", self.payment.signed_token())
            .push_text(SECRET, secret.expose());
        fields
    }
}

impl SignedRequest for ListCardTokensQuery {
    const OPERATION: Operation = Operation::ListCardTokens;

    fn payload(&self) -> Result<Payload> {
        Ok(Payload::new()
            .text("merchantCode", &self.merchant_code)
            .text("customerProfileId", &self.customer_profile_id))
    }

    fn signature_fields(&self, secret: &SecretKey) -> SignatureFields {
        let mut fields = SignatureFields::with_capacity(3);
        fields
            .push_text("merchantCode", &self.merchant_code)
            .push_text("customerProfileId", &self.customer_profile_id)
            .push_text(SECRET, secret.expose());
        fields
    }
}

impl SignedRequest for PaymentStatusQuery {
    const OPERATION: Operation = Operation::PaymentStatus;

    fn payload(&self) -> Result<Payload> {
        Ok(Payload::new()
            .text("merchantCode", &self.merchant_code)
            .text("merchantRefNumber", &self.merchant_ref_number))
    }

    fn signature_fields(&self, secret: &SecretKey) -> SignatureFields {
        let mut fields = SignatureFields::with_capacity(3);
        fields
            .push_text("merchantCode", &self.merchant_code)
            .push_text("merchantRefNumber", &self.merchant_ref_number)
            .push_text(SECRET, secret.expose());
        fields
    }
}

impl SignedRequest for DeleteCardTokenQuery {
    const OPERATION: Operation = Operation::DeleteCardToken;

    fn payload(&self) -> Result<Payload> {
        Ok(Payload::new()
            .text("merchantCode", &self.merchant_code)
            .text("customerProfileId", &self.customer_profile_id)
            .text("cardToken", &self.card_token))
    }

    fn signature_fields(&self, secret: &SecretKey) -> SignatureFields {
        let mut fields = SignatureFields::with_capacity(4);
        fields
            .push_text("merchantCode", &self.merchant_code)
            .push_text("customerProfileId", &self.customer_profile_id)
            .push_text("cardToken", &self.card_token)
            .push_text(SECRET, secret.expose());
        fields
    }
}

impl SignedRequest for ClientChargeRequest {
    const OPERATION: Operation = Operation::ClientCharge;

    fn payload(&self) -> Result<Payload> {
        Ok(Payload::new()
            .text("merchantCode", &self.merchant_code)
            .text("merchantRefNumber", &self.merchant_ref_number)
            .json("customer", &self.customer)?
            .json("order", &self.order.checkout_json())?
            .opt_integer("expiryHours", self.order.expiry.map(i64::from))
            .text("language", self.language.locale()))
    }

    fn signature_fields(&self, secret: &SecretKey) -> SignatureFields {
        let mut fields = SignatureFields::with_capacity(6);
        fields
            .push_text("merchantCode", &self.merchant_code)
            .push_text("merchantRefNumber", &self.merchant_ref_number)
            .push_opt(
                "customerProfileId",
                self.customer.profile_id.as_deref().map(Canonical::Text),
            )
            .push_text("itemsHash", items_hash(&self.order.order_items))
            .push_opt(
                "expiryHours",
                self.order.expiry.map(|hours| Canonical::Integer(hours.into())),
            )
            .push_text(SECRET, secret.expose());
        fields
    }
}

/// `sku + quantity + price` for every item, concatenated. Empty for no items.
pub fn items_hash(items: &[OrderItem]) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                "{}{}{}",
                item.product_sku,
                item.quantity,
                fixed_decimal(item.price, 2)
            )
        })
        .collect()
}

impl SignedNotification for NotificationV1 {
    const OPERATION: Operation = Operation::NotificationV1;

    fn received_signature(&self) -> Result<&str> {
        Ok(&self.message_signature)
    }

    fn signature_fields(&self, secret: &SecretKey) -> Result<SignatureFields> {
        let mut fields = SignatureFields::with_capacity(5);
        fields
            .push_text(SECRET, secret.expose())
            .push(Self::AMOUNT, Canonical::AmountOneDecimal(self.amount))
            .push(Self::FAWRY_REF_NO, Canonical::Integer(self.fawry_ref_no))
            .push_text(Self::MERCHANT_REF_NO, &self.merchant_ref_no)
            .push(Self::ORDER_STATUS, Canonical::symbol_of(&self.order_status));
        Ok(fields)
    }
}

impl SignedNotification for NotificationV2 {
    const OPERATION: Operation = Operation::NotificationV2;

    fn received_signature(&self) -> Result<&str> {
        self.message_signature
            .as_deref()
            .ok_or(Error::MissingField {
                field: "messageSignature",
            })
    }

    fn signature_fields(&self, secret: &SecretKey) -> Result<SignatureFields> {
        let payment_method = self.payment_method.as_ref().ok_or(Error::MissingField {
            field: "paymentMethod",
        })?;

        let mut fields = SignatureFields::with_capacity(7);
        fields
            .push_text("fawryRefNumber", &self.fawry_ref_number)
            .push_text("merchantRefNumber", &self.merchant_ref_number)
            .push("paymentAmount", Canonical::Amount(self.payment_amount))
            .push("orderAmount", Canonical::Amount(self.order_amount))
            .push("orderStatus", Canonical::symbol_of(&self.order_status))
            .push("paymentMethod", Canonical::symbol_of(payment_method))
            .push_text(SECRET, secret.expose());
        Ok(fields)
    }
}
