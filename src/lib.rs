//! check_prices - CS2 Marketplace Price Checker
//!
//! Resolves typed item names against the community marketplace-id catalog,
//! detects special finish / Doppler phase variants, and reports the highest
//! buy and lowest sell price from the Buff163 order books.

pub mod catalog;
pub mod error;
pub mod matching;
pub mod orderbook;
pub mod pipeline;
pub mod prices;
pub mod variants;

use std::time::Duration;

/// Per-request timeout; a hung remote call becomes a fetch failure.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

// Re-export commonly used items
pub use catalog::{normalize_name, resolve_query, CatalogIndex, ResolvedQuery};
pub use error::{ApiError, ApiResult};
pub use orderbook::{OrderBookClient, OrderItem, OrderKind};
pub use pipeline::{format_report, parse_queries, run_query, PriceReport};
pub use prices::{best_price, extract_prices, CNY_TO_USD};
pub use variants::{extract_tag, strip_variant_suffix, VariantTag};
