//! Request signer: computes an outbound signature and injects it.

use tracing::debug;

use super::payload::SignedEnvelope;
use super::recipes::SignedRequest;
use super::secret::SecretKey;
use crate::Result;

/// Signs outbound requests with the merchant's security key.
///
/// Holds no mutable state; one instance can be shared across tasks.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    secret: SecretKey,
}

impl RequestSigner {
    pub fn new(secret: impl Into<SecretKey>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Signature of `request` without building the envelope.
    pub fn signature_for<R: SignedRequest>(&self, request: &R) -> String {
        let fields = request.signature_fields(&self.secret);
        R::OPERATION.signing_options().signature(&fields)
    }

    /// Build the wire payload of `request` with its `signature` field attached.
    #[allow(clippy::result_large_err)]
    pub fn sign<R: SignedRequest>(&self, request: &R) -> Result<SignedEnvelope> {
        let payload = request.payload()?;
        let fields = request.signature_fields(&self.secret);
        let signature = R::OPERATION.signing_options().signature(&fields);

        debug!(
            operation = %R::OPERATION,
            fields = ?fields,
            "Signed request"
        );

        Ok(payload.into_signed(signature))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signing::payload::PayloadValue;
    use crate::types::{ChargeItem, ChargeRequest, CustomerInfo, PaymentInfo, PaymentMethod, RefundRequest};
    use rust_decimal::Decimal;

    #[test]
    fn test_refund_known_answer() {
        let signer = RequestSigner::new("S");
        let envelope = signer
            .sign(&RefundRequest::new("M1", "946592686", Decimal::new(1500, 1)))
            .unwrap();

        assert_eq!(
            envelope.signature(),
            "539ac7d418e0c28929b1200990d16502d737d5d8ab9dc9667af0f5e8d6bac117"
        );
        assert_eq!(
            envelope.to_json().unwrap(),
            r#"{"merchantCode":"M1","referenceNumber":"946592686","refundAmount":150.00,"signature":"539ac7d418e0c28929b1200990d16502d737d5d8ab9dc9667af0f5e8d6bac117"}"#
        );
    }

    #[test]
    fn test_refund_with_reason_known_answer() {
        let signer = RequestSigner::new("S");
        let request = RefundRequest::new("M1", "946592686", Decimal::from(150)).with_reason("damaged");
        assert_eq!(
            signer.signature_for(&request),
            "d6f9ab8cd12f6b9c47ccb6ddb3e4c3e377054ac6dd55558aff195a04fd7728df"
        );
    }

    #[test]
    fn test_signature_is_deterministic() {
        let signer = RequestSigner::new("S");
        let request = RefundRequest::new("M1", "1", Decimal::from(10));
        assert_eq!(signer.signature_for(&request), signer.signature_for(&request));
    }

    #[test]
    fn test_charge_envelope_embeds_items_and_hides_secret() {
        let secret = "31d932eb514841c8ab35eb455012a53c";
        let signer = RequestSigner::new(secret);
        let request = ChargeRequest {
            merchant_code: "M1".to_string(),
            merchant_ref_num: "128157".to_string(),
            customer: CustomerInfo::profile_only("777777"),
            payment: PaymentInfo::new(PaymentMethod::PayAtFawry, Decimal::from(350), "course"),
            charge_items: vec![ChargeItem::new(234234987, "Course", Decimal::from(350))],
        };

        let envelope = signer.sign(&request).unwrap();
        let body = envelope.to_json().unwrap();

        assert!(!body.contains(secret));
        assert!(matches!(envelope.get("chargeItems"), Some(PayloadValue::Raw(_))));

        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(parsed["chargeItems"].is_array());
        assert_eq!(parsed["chargeItems"][0]["itemId"], 234234987);
        assert_eq!(parsed["paymentMethod"], "PAYATFAWRY");
        assert_eq!(parsed["amount"], "350.00");
        assert_eq!(parsed["signature"], envelope.signature());
    }

    #[test]
    fn test_charge_pay_at_fawry_ignores_caller_token() {
        let signer = RequestSigner::new("S");
        let base = ChargeRequest {
            merchant_code: "M1".to_string(),
            merchant_ref_num: "128157".to_string(),
            customer: CustomerInfo::profile_only("777777"),
            payment: PaymentInfo::new(PaymentMethod::PayAtFawry, Decimal::from(350), "course"),
            charge_items: vec![],
        };
        let mut with_token = base.clone();
        with_token.payment = with_token.payment.with_card_token("tok_ignored");

        assert_eq!(signer.signature_for(&base), signer.signature_for(&with_token));
        assert_eq!(
            signer.signature_for(&base),
            "0a60b1e01a38be6ae85c6e8df05af429d51d78a23879d7f08d02107f4b0e6924"
        );
    }

    #[test]
    fn test_debug_redacts_secret() {
        let signer = RequestSigner::new("super-secret");
        assert!(!format!("{:?}", signer).contains("super-secret"));
    }
}
