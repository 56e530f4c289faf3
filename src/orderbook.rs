//! Buff163 order book client
//!
//! Fetches every page of buy or sell orders for a goods id, optionally
//! filtered to a variant tag.

use crate::error::ApiResult;
use crate::variants::VariantTag;
use crate::REQUEST_TIMEOUT;
use serde::{Deserialize, Deserializer};
use std::thread;
use std::time::Duration;

const ORDERBOOK_BASE_URL: &str = "https://buff.163.com";

/// Marketplace game identifier sent with every order book request
const GAME: &str = "csgo";

/// Pause between page requests so the remote service is not hammered
pub const PAGE_DELAY: Duration = Duration::from_millis(100);

const USER_AGENT: &str = "check_prices/1.0";
const ACCEPT: &str = "application/json, text/javascript, */*; q=0.01";

/// Which side of the order book to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderKind {
    Buy,
    Sell,
}

impl OrderKind {
    fn endpoint(self) -> &'static str {
        match self {
            OrderKind::Buy => "buy_order",
            OrderKind::Sell => "sell_order",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OrderKind::Buy => "buy",
            OrderKind::Sell => "sell",
        }
    }
}

/// One marketplace order. Buy orders sometimes carry their amount in
/// `frozen_amount` instead of `price`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct OrderItem {
    #[serde(default, deserialize_with = "de_decimal")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "de_decimal")]
    pub frozen_amount: Option<f64>,
}

/// The marketplace serves decimal fields as strings, occasionally as raw
/// numbers. Anything unparseable reads as absent instead of failing the page.
fn de_decimal<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::String(s) => s.trim().parse().ok(),
        serde_json::Value::Number(n) => n.as_f64(),
        _ => None,
    }))
}

#[derive(Debug, Deserialize)]
struct OrderPage {
    #[serde(default)]
    items: Vec<OrderItem>,
    #[serde(default = "default_total_page")]
    total_page: u32,
}

impl Default for OrderPage {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_page: default_total_page(),
        }
    }
}

fn default_total_page() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    #[serde(default)]
    data: Option<OrderPage>,
}

/// Blocking client for the order book endpoints.
pub struct OrderBookClient {
    client: reqwest::blocking::Client,
    base_url: String,
    page_delay: Duration,
}

impl OrderBookClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: ORDERBOOK_BASE_URL.to_string(),
            page_delay: PAGE_DELAY,
        }
    }

    /// Client against an arbitrary base URL with no inter-page delay.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            page_delay: Duration::ZERO,
        }
    }

    /// URL for one order book page, with the tag filter when present.
    pub fn order_url(
        &self,
        kind: OrderKind,
        goods_id: u64,
        tag: Option<VariantTag>,
        page: u32,
    ) -> String {
        let mut url = format!(
            "{}/api/market/goods/{}?game={}&goods_id={}&page_num={}",
            self.base_url,
            kind.endpoint(),
            GAME,
            goods_id,
            page
        );
        if let Some(tag) = tag {
            url.push_str(&format!("&tag_ids={}", tag.tag_id()));
        }
        url
    }

    /// Fetch all pages of one side of the order book, concatenated in page
    /// order. A non-success status mid-pagination stops the loop and returns
    /// what was accumulated so far.
    pub fn fetch_all(
        &self,
        kind: OrderKind,
        goods_id: u64,
        tag: Option<VariantTag>,
    ) -> ApiResult<Vec<OrderItem>> {
        let mut all_items = Vec::new();
        let mut page = 1u32;

        loop {
            let url = self.order_url(kind, goods_id, tag, page);
            log::debug!("Fetching {} orders page {}: {}", kind.label(), page, url);

            let response = self
                .client
                .get(&url)
                .header("User-Agent", USER_AGENT)
                .header("Accept", ACCEPT)
                .timeout(REQUEST_TIMEOUT)
                .send()?;

            if !response.status().is_success() {
                log::warn!(
                    "{} orders page {} returned {}, stopping pagination",
                    kind.label(),
                    page,
                    response.status()
                );
                break;
            }

            let body: OrderResponse = serde_json::from_str(&response.text()?)?;
            let data = body.data.unwrap_or_default();
            all_items.extend(data.items);

            if page >= data.total_page {
                break;
            }
            page += 1;
            thread::sleep(self.page_delay);
        }

        log::debug!(
            "Fetched {} {} orders for goods id {}",
            all_items.len(),
            kind.label(),
            goods_id
        );
        Ok(all_items)
    }
}

impl Default for OrderBookClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "orderbook_tests.rs"]
mod tests;
