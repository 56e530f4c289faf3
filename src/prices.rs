//! Price conversion and aggregation

use crate::orderbook::{OrderItem, OrderKind};

/// Fixed CNY to USD conversion rate, overridable from the command line.
pub const CNY_TO_USD: f64 = 0.14;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn non_zero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

/// Converts order items to target-currency prices, rounded to cents.
///
/// Sell orders contribute their price when present and non-zero. Buy orders
/// prefer the price and fall back to the frozen amount; items with neither
/// are dropped.
pub fn extract_prices(items: &[OrderItem], kind: OrderKind, rate: f64) -> Vec<f64> {
    items
        .iter()
        .filter_map(|item| match kind {
            OrderKind::Sell => non_zero(item.price),
            OrderKind::Buy => non_zero(item.price).or_else(|| non_zero(item.frozen_amount)),
        })
        .map(|amount| round2(amount * rate))
        .collect()
}

/// Best price of a side: highest bid for buys, cheapest ask for sells.
pub fn best_price(prices: &[f64], kind: OrderKind) -> Option<f64> {
    match kind {
        OrderKind::Buy => prices.iter().copied().reduce(f64::max),
        OrderKind::Sell => prices.iter().copied().reduce(f64::min),
    }
}
