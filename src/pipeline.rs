//! Per-query pipeline: resolve the name, fetch both order book sides,
//! aggregate and format the result

use crate::catalog::{resolve_query, CatalogIndex};
use crate::orderbook::{OrderBookClient, OrderItem, OrderKind};
use crate::prices::{best_price, extract_prices};
use crate::variants::VariantTag;

/// Splits a console line into individual queries on `;`, trimming each and
/// dropping empties.
pub fn parse_queries(line: &str) -> Vec<String> {
    line.split(';')
        .map(str::trim)
        .filter(|query| !query.is_empty())
        .map(str::to_string)
        .collect()
}

/// Everything reported for one successfully resolved query.
#[derive(Debug, Clone)]
pub struct PriceReport {
    pub query: String,
    pub matched_name: Option<String>,
    pub tag: Option<VariantTag>,
    pub buy_url: String,
    pub sell_url: String,
    pub highest_buy: Option<f64>,
    pub lowest_sell: Option<f64>,
}

/// Runs one query end to end. Returns `None` when the name cannot be
/// resolved to a goods id; fetch failures on either side degrade to an
/// empty side rather than failing the query.
pub fn run_query(
    catalog: &CatalogIndex,
    client: &OrderBookClient,
    raw_query: &str,
    rate: f64,
) -> Option<PriceReport> {
    let resolved = resolve_query(raw_query, catalog);
    let goods_id = match resolved.goods_id {
        Some(id) => id,
        None => {
            log::warn!("No goods id found for '{}'", raw_query);
            return None;
        }
    };

    // Page-1 URLs are reported so the result can be checked in a browser
    let buy_url = client.order_url(OrderKind::Buy, goods_id, resolved.tag, 1);
    let sell_url = client.order_url(OrderKind::Sell, goods_id, resolved.tag, 1);

    let sell_items = fetch_side(client, OrderKind::Sell, goods_id, resolved.tag, raw_query);
    let buy_items = fetch_side(client, OrderKind::Buy, goods_id, resolved.tag, raw_query);

    let sell_prices = extract_prices(&sell_items, OrderKind::Sell, rate);
    let buy_prices = extract_prices(&buy_items, OrderKind::Buy, rate);

    Some(PriceReport {
        query: raw_query.to_string(),
        matched_name: resolved.matched_name,
        tag: resolved.tag,
        buy_url,
        sell_url,
        highest_buy: best_price(&buy_prices, OrderKind::Buy),
        lowest_sell: best_price(&sell_prices, OrderKind::Sell),
    })
}

fn fetch_side(
    client: &OrderBookClient,
    kind: OrderKind,
    goods_id: u64,
    tag: Option<VariantTag>,
    raw_query: &str,
) -> Vec<OrderItem> {
    match client.fetch_all(kind, goods_id, tag) {
        Ok(items) => items,
        Err(e) => {
            log::error!("{} order fetch failed for '{}': {}", kind.label(), raw_query, e);
            Vec::new()
        }
    }
}

/// Renders one report as the console block printed per item.
pub fn format_report(report: &PriceReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("Item: {}\n", report.query));
    out.push_str(&format!(
        "  Matched key: {}\n",
        report.matched_name.as_deref().unwrap_or("None")
    ));
    match report.tag {
        Some(tag) => out.push_str(&format!("  Applied tag ID: {}\n", tag.tag_id())),
        None => out.push_str("  Applied tag ID: None\n"),
    }
    out.push_str(&format!("  Buy URL (page 1): {}\n", report.buy_url));
    out.push_str(&format!("  Sell URL (page 1): {}\n", report.sell_url));
    match report.highest_buy {
        Some(price) => out.push_str(&format!("  Highest buy order (USD): {}\n", price)),
        None => out.push_str("  Highest buy order (USD): N/A\n"),
    }
    match report.lowest_sell {
        Some(price) => out.push_str(&format!("  Lowest sell price (USD): {}\n", price)),
        None => out.push_str("  Lowest sell price (USD): N/A\n"),
    }

    out
}
