//! Latency and throughput benchmark for the order book.
//!
//! Per-operation latencies are sampled with `Instant` and summarised by
//! the metrics `LatencyCollector`; workloads are generated from a seeded
//! RNG so runs are reproducible.

use std::hint::black_box;
use std::time::Instant;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use orderbook_engine::metrics::collectors::{LatencyCollector, LatencyStatistics};
use orderbook_engine::{OrderBook, OrderId, OrderType, Price, Quantity, Side};

const NUM_ORDERS: usize = 500_000;
const NUM_MARKET: usize = 100_000;
const NUM_LEVELS: Price = 1_000;
const RNG_SEED: u64 = 42;

fn print_header() {
    println!(
        "{:<28} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "Operation", "Mean(ns)", "Med(ns)", "P99(ns)", "Min(ns)", "Max(ns)"
    );
    println!("{}", "-".repeat(80));
}

fn print_stats(label: &str, stats: &LatencyStatistics) {
    println!(
        "{:<28} {:>10} {:>10} {:>10} {:>10} {:>10}",
        label,
        stats.mean.as_nanos(),
        stats.p50.as_nanos(),
        stats.p99.as_nanos(),
        stats.min.as_nanos(),
        stats.max.as_nanos()
    );
}

/// Spread limit orders away from the mid so the add benchmark measures
/// insertion, not matching.
fn resting_price(rng: &mut ChaCha8Rng, side: Side) -> Price {
    let price = rng.gen_range(9_000..=11_000);
    match side {
        Side::Buy => price - 500,
        Side::Sell => price + 500,
    }
}

fn bench_add_limit(rng: &mut ChaCha8Rng) -> Result<(), Box<dyn std::error::Error>> {
    let mut book = OrderBook::new();
    let mut latencies = LatencyCollector::with_capacity(NUM_ORDERS);

    for i in 0..NUM_ORDERS {
        let side = if i % 2 == 0 { Side::Buy } else { Side::Sell };
        let price = resting_price(rng, side);
        let qty: Quantity = rng.gen_range(1..=100);

        let start = Instant::now();
        let result = book.add_order(side, OrderType::Limit, price, qty)?;
        latencies.record(start.elapsed());
        black_box(result);
    }

    print_stats("Add Limit Order", &latencies.stats());
    Ok(())
}

fn bench_cancel(rng: &mut ChaCha8Rng) -> Result<(), Box<dyn std::error::Error>> {
    let mut book = OrderBook::new();
    let mut ids: Vec<OrderId> = Vec::with_capacity(NUM_ORDERS);

    for i in 0..NUM_ORDERS {
        let side = if i % 2 == 0 { Side::Buy } else { Side::Sell };
        let price = resting_price(rng, side);
        let qty: Quantity = rng.gen_range(1..=100);
        let result = book.add_order(side, OrderType::Limit, price, qty)?;
        ids.push(result.order_id);
    }

    // Cancel in random order
    ids.shuffle(rng);

    let mut latencies = LatencyCollector::with_capacity(NUM_ORDERS);
    for id in ids {
        let start = Instant::now();
        let cancelled = book.cancel_order(id);
        latencies.record(start.elapsed());
        black_box(cancelled);
    }

    print_stats("Cancel Order", &latencies.stats());
    Ok(())
}

fn bench_market(rng: &mut ChaCha8Rng) -> Result<(), Box<dyn std::error::Error>> {
    let mut book = OrderBook::new();

    // Populate ~1000 levels per side around the mid
    for i in 0..NUM_LEVELS {
        let ask_price = 10_001 + i;
        let bid_price = 10_000 - i;
        for _ in 0..10 {
            book.add_order(Side::Sell, OrderType::Limit, ask_price, 100)?;
            book.add_order(Side::Buy, OrderType::Limit, bid_price, 100)?;
        }
    }

    let mut latencies = LatencyCollector::with_capacity(NUM_MARKET);

    for i in 0..NUM_MARKET {
        // Replenish liquidity periodically so the book never drains
        if i % 100 == 0 {
            for _ in 0..10 {
                let price = rng.gen_range(9_000..=11_000);
                book.add_order(Side::Sell, OrderType::Limit, price + 500, 100)?;
                book.add_order(Side::Buy, OrderType::Limit, price - 500, 100)?;
            }
        }

        let side = if i % 2 == 0 { Side::Buy } else { Side::Sell };
        let qty: Quantity = rng.gen_range(1..=100);

        let start = Instant::now();
        let result = book.add_order(side, OrderType::Market, 0, qty)?;
        latencies.record(start.elapsed());
        black_box(result);
    }

    print_stats("Market Order (w/ matching)", &latencies.stats());
    Ok(())
}

fn bench_throughput(rng: &mut ChaCha8Rng) -> Result<(), Box<dyn std::error::Error>> {
    let mut book = OrderBook::new();
    let start = Instant::now();

    for i in 0..NUM_ORDERS {
        let side = if i % 2 == 0 { Side::Buy } else { Side::Sell };
        let price = resting_price(rng, side);
        let qty: Quantity = rng.gen_range(1..=100);
        book.add_order(side, OrderType::Limit, price, qty)?;
    }

    let elapsed = start.elapsed().as_secs_f64();
    let throughput = NUM_ORDERS as f64 / elapsed;

    println!(
        "\nThroughput: {:.0} orders/sec ({:.3} sec for {} orders)",
        throughput, elapsed, NUM_ORDERS
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("warn").init();

    let mut rng = ChaCha8Rng::seed_from_u64(RNG_SEED);

    println!("=== OrderBook Benchmark ===");
    println!("Orders: {}\n", NUM_ORDERS);

    print_header();
    bench_add_limit(&mut rng)?;
    bench_cancel(&mut rng)?;
    bench_market(&mut rng)?;
    bench_throughput(&mut rng)?;

    Ok(())
}
