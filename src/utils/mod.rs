use crate::orderbook::types::Price;

/// Convert a tick price to a human-readable dollar string.
/// One tick is 0.01 of a currency unit.
pub fn format_price(price_ticks: Price) -> String {
    format!("${:.2}", price_ticks as f64 / 100.0)
}

/// Convert a human price to ticks
pub fn price_to_ticks(price: f64) -> Price {
    (price * 100.0).round() as Price
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(10000), "$100.00");
        assert_eq!(format_price(12550), "$125.50");
    }

    #[test]
    fn test_price_to_ticks() {
        assert_eq!(price_to_ticks(100.0), 10000);
        assert_eq!(price_to_ticks(125.50), 12550);
    }
}
