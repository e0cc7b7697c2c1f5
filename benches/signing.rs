//! Benchmarks for the signing and verification hot path.
//!
//! Run with: `cargo bench --bench signing`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_decimal::Decimal;

use fawry_core::signing::{NotificationVerifier, RequestSigner};
use fawry_core::types::{
    ChargeItem, ChargeRequest, CustomerInfo, CustomerInfoClient, ClientChargeRequest,
    ChargeRequestLanguage, Order, OrderItem, PaymentInfo, PaymentMethod, RefundRequest,
};

const SECRET: &str = "31d932eb514841c8ab35eb455012a53c";

fn generate_charge(items: usize) -> ChargeRequest {
    ChargeRequest {
        merchant_code: "1tSa6uxz2nQsUE4afeg7uA==".to_string(),
        merchant_ref_num: "128157".to_string(),
        customer: CustomerInfo::new("777777", Some("01005458821"), Some("a@b.com")),
        payment: PaymentInfo::new(PaymentMethod::Card, Decimal::new(35000, 2), "bench")
            .with_card_token("tok_1"),
        charge_items: (0..items)
            .map(|i| ChargeItem::new(i as i64, "item", Decimal::new(100 + i as i64, 2)))
            .collect(),
    }
}

fn generate_client_charge(items: usize) -> ClientChargeRequest {
    ClientChargeRequest {
        merchant_code: "1tSa6uxz2nQsUE4afeg7uA==".to_string(),
        merchant_ref_number: "991".to_string(),
        customer: CustomerInfoClient::new("Name", "01005458821", "a@b.com", Some("777777".to_string())),
        order: Order::new(
            "bench",
            (0..items)
                .map(|i| OrderItem::new(format!("SKU-{}", i), "item", Decimal::new(2505, 1)))
                .collect(),
        )
        .with_expiry_hours(2),
        language: ChargeRequestLanguage::En,
    }
}

/// Benchmark outbound request signing.
fn bench_request_signing(c: &mut Criterion) {
    let signer = RequestSigner::new(SECRET);
    let mut group = c.benchmark_group("request_signing");

    let refund = RefundRequest::new("M1", "946592686", Decimal::new(15000, 2));
    group.throughput(Throughput::Elements(1));
    group.bench_function("refund_signature", |b| {
        b.iter(|| black_box(signer.signature_for(black_box(&refund))))
    });

    for items in [1, 10, 100].iter() {
        let charge = generate_charge(*items);
        group.bench_with_input(BenchmarkId::new("charge_envelope", items), &charge, |b, charge| {
            b.iter(|| black_box(signer.sign(black_box(charge)).map(|e| e.to_json())))
        });

        let client_charge = generate_client_charge(*items);
        group.bench_with_input(
            BenchmarkId::new("client_charge_signature", items),
            &client_charge,
            |b, request| b.iter(|| black_box(signer.signature_for(black_box(request)))),
        );
    }

    group.finish();
}

/// Benchmark inbound notification verification.
fn bench_notification_verification(c: &mut Criterion) {
    let verifier = NotificationVerifier::new(SECRET);
    let mut group = c.benchmark_group("notification_verification");

    let v1 = [
        ("MerchantRefNo", "128161"),
        ("FawryRefNo", "946610689"),
        ("OrderStatus", "PAID"),
        ("Amount", "150.0"),
        ("MessageSignature", "4E8EE4A2C3B09946CA0717E3E91845B9"),
    ];
    group.throughput(Throughput::Elements(1));
    group.bench_function("v1_pairs", |b| {
        b.iter(|| black_box(verifier.verify_v1_pairs(black_box(v1)).map(|v| v.matched())))
    });

    let v2 = r#"{"fawryRefNumber":"970177","merchantRefNumber":"9708f1cea8b5426cb57922df51b7f790","paymentAmount":152.00,"orderAmount":150.00,"orderStatus":"NEW","paymentMethod":"PAYATFAWRY","messageSignature":"eab2c9588f0f0cf0f007e2c93f4b6ac91ba38de1023d123ceb0f6ca90a172372"}"#;
    group.bench_function("v2_json", |b| {
        b.iter(|| black_box(verifier.verify_v2_json(black_box(v2)).map(|v| v.matched())))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_request_signing,
    bench_notification_verification
);
criterion_main!(benches);
