//! Order Signing Benchmarks — Hot-Path Performance Validation
//!
//! Benchmarks the work done locally before an order hits the wire:
//! amount arithmetic, EIP-712 hashing, signing and L2 request HMAC.
//!
//! Run with: cargo bench --bench order_signing

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal_macros::dec;

use polymarket_order_bridge::adapters::api::auth::{ClobAuth, hmac_signature};
use polymarket_order_bridge::adapters::api::orders::{OrderBuilder, order_amounts};
use polymarket_order_bridge::config::POLYGON_CHAIN_ID;
use polymarket_order_bridge::domain::{MarketParams, OrderArgs, Side};

const BENCH_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Benchmark maker/taker amount computation.
fn bench_order_amounts(c: &mut Criterion) {
    c.bench_function("order_amounts_buy", |b| {
        b.iter(|| {
            let _amounts = order_amounts(
                black_box(Side::Buy),
                black_box(dec!(0.537)),
                black_box(dec!(125.456)),
                black_box(dec!(0.001)),
            );
        });
    });
}

/// Benchmark full order construction and EIP-712 signature.
fn bench_order_build(c: &mut Criterion) {
    let auth = ClobAuth::new(BENCH_KEY, POLYGON_CHAIN_ID).unwrap();
    let builder = OrderBuilder::new(&auth, POLYGON_CHAIN_ID, 0, auth.address());
    let args = OrderArgs {
        token_id: "71321045679252212594626385532706912750332728571942532289631379312455583992563"
            .to_string(),
        side: Side::Buy,
        size: dec!(10),
        price: dec!(0.55),
    };
    let params = MarketParams {
        tick_size: dec!(0.01),
        neg_risk: false,
    };

    c.bench_function("order_build_and_sign", |b| {
        b.iter(|| {
            let _signed = builder.build(black_box(&args), black_box(params));
        });
    });
}

/// Benchmark the L2 HMAC over a typical order body.
fn bench_hmac(c: &mut Criterion) {
    let body = r#"{"order":{"salt":123,"tokenId":"1"},"owner":"key","orderType":"GTC"}"#;

    c.bench_function("l2_hmac_signature", |b| {
        b.iter(|| {
            let _sig = hmac_signature(
                black_box("c2VjcmV0LXNlY3JldC1zZWNyZXQ="),
                black_box("1700000000"),
                black_box("POST"),
                black_box("/order"),
                black_box(body),
            );
        });
    });
}

criterion_group!(benches, bench_order_amounts, bench_order_build, bench_hmac);
criterion_main!(benches);
