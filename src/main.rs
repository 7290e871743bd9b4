//! Order book demonstration driver.
//!
//! Walks through a small trading session: resting liquidity on both
//! sides, a limit order crossing the spread, a market sweep and a
//! cancellation, pretty-printing the book between phases.

use tracing::info;

use orderbook_engine::utils::format_price;
use orderbook_engine::{BookMetrics, OrderBook, OrderResult, OrderType, Side};

fn print_book(book: &OrderBook) {
    let asks = book.get_asks(5);
    let bids = book.get_bids(5);

    println!("\n--- Order Book ---");
    println!("{:<12} {:<12} {:<10}", "Price", "Quantity", "Orders");
    println!("{}", "-".repeat(34));

    // Asks rendered highest first so the spread sits in the middle
    println!("  Asks:");
    for level in asks.iter().rev() {
        println!(
            "    {:<10} {:<10} {:<10}",
            format_price(level.price),
            level.total_quantity,
            level.order_count
        );
    }

    println!("  ----------");

    println!("  Bids:");
    for level in &bids {
        println!(
            "    {:<10} {:<10} {:<10}",
            format_price(level.price),
            level.total_quantity,
            level.order_count
        );
    }
    println!();
}

fn print_result(action: &str, result: &OrderResult) {
    print!(
        "{} -> id={} filled={} remaining={}",
        action, result.order_id, result.filled_quantity, result.remaining_quantity
    );
    if !result.fills.is_empty() {
        let fills: Vec<String> = result
            .fills
            .iter()
            .map(|f| format!("{}@{}", f.quantity, format_price(f.price)))
            .collect();
        print!(" fills=[{}]", fills.join(", "));
    }
    println!();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    info!("Starting order book demo");

    let metrics = BookMetrics::new();
    let mut book = OrderBook::new();

    let add = |book: &mut OrderBook, action: &str, side, order_type, price, qty| {
        let result = metrics.time_add_order(|| book.add_order(side, order_type, price, qty));
        if let Ok(r) = &result {
            metrics.increment_orders_added();
            metrics.record_trades(r.fills.len() as u64, r.filled_quantity);
            print_result(action, r);
        }
        result
    };

    println!("=== Order Book Demo ===");

    // Rest some sell orders
    add(&mut book, "SELL 100@$100.50", Side::Sell, OrderType::Limit, 10050, 100)?;
    add(&mut book, "SELL  50@$100.00", Side::Sell, OrderType::Limit, 10000, 50)?;
    add(&mut book, "SELL  75@$101.00", Side::Sell, OrderType::Limit, 10100, 75)?;

    // And some buys below the spread
    add(&mut book, "BUY  100@$99.50 ", Side::Buy, OrderType::Limit, 9950, 100)?;
    add(&mut book, "BUY   80@$99.00 ", Side::Buy, OrderType::Limit, 9900, 80)?;
    add(&mut book, "BUY   60@$99.50 ", Side::Buy, OrderType::Limit, 9950, 60)?;

    print_book(&book);

    println!("--- Crossing the spread ---");
    add(&mut book, "BUY  120@$100.50", Side::Buy, OrderType::Limit, 10050, 120)?;
    print_book(&book);

    println!("--- Market sell order ---");
    add(&mut book, "SELL MKT qty=200", Side::Sell, OrderType::Market, 0, 200)?;
    print_book(&book);

    println!("--- Cancel order ---");
    let resting = add(&mut book, "BUY  500@$98.00 ", Side::Buy, OrderType::Limit, 9800, 500)?;
    let cancelled = metrics.time_cancel_order(|| book.cancel_order(resting.order_id));
    if cancelled {
        metrics.increment_orders_cancelled();
    }
    println!(
        "Cancel id={} -> {}",
        resting.order_id,
        if cancelled { "success" } else { "failed" }
    );
    print_book(&book);

    let stats = book.stats();
    info!(
        "Final book: {} orders, {} bid levels, {} ask levels",
        stats.order_count, stats.bid_levels, stats.ask_levels
    );
    metrics.report();

    Ok(())
}
