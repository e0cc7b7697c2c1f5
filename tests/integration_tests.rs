//! Integration tests for component interactions.
//!
//! These exercise the signing core and the notification server together.

use rust_decimal::Decimal;
use std::str::FromStr;

use fawry_core::signing::{HashAlgorithm, NotificationVerifier, RequestSigner};
use fawry_core::types::{
    ChargeItem, ChargeRequest, CustomerInfo, NotificationV1, NotificationV2, OrderStatus,
    PaymentInfo, PaymentMethod, RefundRequest,
};
use fawry_core::Error;

const STAGING_SECRET: &str = "31d932eb514841c8ab35eb455012a53c";

fn v2_notification() -> NotificationV2 {
    NotificationV2 {
        request_id: Some("c72827d084ea4b88949d91dd2db4996e".to_string()),
        fawry_ref_number: "970177".to_string(),
        merchant_ref_number: "9708f1cea8b5426cb57922df51b7f790".to_string(),
        customer_mobile: None,
        customer_mail: None,
        payment_amount: Decimal::new(15200, 2),
        order_amount: Decimal::new(15000, 2),
        fawry_fees: Some(Decimal::new(200, 2)),
        shipping_fees: None,
        order_status: OrderStatus::New,
        payment_method: Some(PaymentMethod::PayAtFawry),
        message_signature: None,
        order_expiry_date: None,
        order_items: Vec::new(),
    }
}

/// Sign a notification the way the gateway would.
fn signed(verifier: &NotificationVerifier, mut notification: NotificationV2) -> NotificationV2 {
    let signature = verifier.expected_signature(&notification).unwrap();
    notification.message_signature = Some(signature);
    notification
}

#[test]
fn test_v2_staging_vector() {
    let verifier = NotificationVerifier::new(STAGING_SECRET);
    let expected = verifier.expected_signature(&v2_notification()).unwrap();
    assert_eq!(
        expected,
        "eab2c9588f0f0cf0f007e2c93f4b6ac91ba38de1023d123ceb0f6ca90a172372"
    );
}

#[test]
fn test_v1_staging_vector() {
    let verifier = NotificationVerifier::new(STAGING_SECRET);
    let notification = NotificationV1::from_pairs([
        ("MerchantRefNo", "128161"),
        ("FawryRefNo", "946610689"),
        ("OrderStatus", "PAID"),
        ("Amount", "150.0"),
        ("MessageSignature", "4E8EE4A2C3B09946CA0717E3E91845B9"),
    ])
    .unwrap();

    assert_eq!(
        verifier.expected_signature(&notification).unwrap(),
        "4E8EE4A2C3B09946CA0717E3E91845B9"
    );
    assert!(verifier.verify(notification).unwrap().matched());
}

#[test]
fn test_signed_notification_round_trips_through_json() {
    let verifier = NotificationVerifier::new(STAGING_SECRET);
    let notification = signed(&verifier, v2_notification());
    let body = serde_json::to_string(&notification).unwrap();

    let verification = verifier.verify_v2_json(&body).unwrap();
    let authentic = verification.into_authentic_or_err().unwrap();
    assert_eq!(authentic, notification);
}

#[test]
fn test_tampering_any_signed_field_breaks_verification() {
    let verifier = NotificationVerifier::new(STAGING_SECRET);
    let original = signed(&verifier, v2_notification());

    let tampers: Vec<(&str, fn(&mut NotificationV2))> = vec![
        ("fawryRefNumber", |n| n.fawry_ref_number.push('1')),
        ("merchantRefNumber", |n| n.merchant_ref_number.clear()),
        ("paymentAmount", |n| n.payment_amount = Decimal::new(100, 2)),
        ("orderAmount", |n| n.order_amount += Decimal::ONE),
        ("orderStatus", |n| n.order_status = OrderStatus::Paid),
        ("paymentMethod", |n| n.payment_method = Some(PaymentMethod::Card)),
    ];

    for (field, tamper) in tampers {
        let mut notification = original.clone();
        tamper(&mut notification);
        let verification = verifier.verify(notification).unwrap();
        assert!(!verification.matched(), "tampered {} still verified", field);
    }
}

#[test]
fn test_unsigned_fields_do_not_affect_verification() {
    let verifier = NotificationVerifier::new(STAGING_SECRET);
    let mut notification = signed(&verifier, v2_notification());
    notification.customer_mail = Some("other@example.com".to_string());
    notification.fawry_fees = None;

    assert!(verifier.verify(notification).unwrap().matched());
}

#[test]
fn test_v2_signature_comparison_is_case_sensitive() {
    let verifier = NotificationVerifier::new(STAGING_SECRET);
    let mut notification = signed(&verifier, v2_notification());
    notification.message_signature = notification
        .message_signature
        .map(|s| s.to_ascii_uppercase());

    let verification = verifier.verify(notification).unwrap();
    assert!(!verification.matched());
    assert!(matches!(
        verification.into_authentic_or_err(),
        Err(Error::SignatureMismatch)
    ));
}

#[test]
fn test_wrong_secret_is_rejected() {
    let gateway = NotificationVerifier::new(STAGING_SECRET);
    let merchant = NotificationVerifier::new("another-secret");
    let notification = signed(&gateway, v2_notification());

    assert!(!merchant.verify(notification).unwrap().matched());
}

#[test]
fn test_missing_payment_method_cannot_be_verified() {
    let verifier = NotificationVerifier::new(STAGING_SECRET);
    let mut notification = v2_notification();
    notification.payment_method = None;
    notification.message_signature = Some("deadbeef".to_string());

    assert!(matches!(
        verifier.verify(notification),
        Err(Error::MissingField {
            field: "paymentMethod"
        })
    ));
}

#[test]
fn test_signed_envelopes_never_carry_the_secret() {
    let signer = RequestSigner::new("very-secret-value");

    let refund = signer
        .sign(&RefundRequest::new("M1", "946592686", Decimal::new(15000, 2)))
        .unwrap();
    assert!(!refund.to_json().unwrap().contains("very-secret-value"));
    assert!(!refund.to_query_string().contains("very-secret-value"));

    let charge = ChargeRequest {
        merchant_code: "M1".to_string(),
        merchant_ref_num: "128157".to_string(),
        customer: CustomerInfo::profile_only("777777"),
        payment: PaymentInfo::new(PaymentMethod::PayAtFawry, Decimal::new(35000, 2), "order"),
        charge_items: vec![
            ChargeItem::new(1, "first", Decimal::new(25050, 2)).with_quantity(2),
            ChargeItem::new(2, "second", Decimal::new(4, 0)),
        ],
    };
    let envelope = signer.sign(&charge).unwrap();
    let json: serde_json::Value = serde_json::from_str(&envelope.to_json().unwrap()).unwrap();

    assert!(!json.to_string().contains("very-secret-value"));
    assert_eq!(json["chargeItems"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["paymentMethod"], "PAYATFAWRY");
    assert_eq!(json["signature"], envelope.signature());
}

#[test]
fn test_refund_known_answer() {
    let signer = RequestSigner::new("S");
    let refund = RefundRequest::new("M1", "946592686", Decimal::from_str("150.00").unwrap());
    assert_eq!(
        signer.signature_for(&refund),
        "539ac7d418e0c28929b1200990d16502d737d5d8ab9dc9667af0f5e8d6bac117"
    );
}

#[test]
fn test_unknown_hash_algorithm_is_config_error() {
    assert!(matches!(
        HashAlgorithm::from_str("sha1"),
        Err(Error::Config { .. })
    ));
    assert_eq!(HashAlgorithm::from_str("SHA-256").unwrap(), HashAlgorithm::Sha256);
}

#[tokio::test]
async fn test_server_state_publishes_only_verified_events() {
    use notification_server::{AppState, NotificationSource, PaymentEvent};

    let state = AppState::new(STAGING_SECRET, 8);
    let mut events = state.subscribe();

    let notification = signed(&state.verifier, v2_notification());
    let authentic = state
        .verifier
        .verify(notification)
        .unwrap()
        .into_authentic_or_err()
        .unwrap();

    assert_eq!(state.publish(PaymentEvent::from(authentic)), 1);

    let event = events.recv().await.unwrap();
    assert_eq!(event.source, NotificationSource::V2);
    assert_eq!(event.amount, Decimal::new(15200, 2));
    assert_eq!(event.order_status, OrderStatus::New);
}
