//! Marketplace catalog fetching and item name resolution

use crate::error::{ApiError, ApiResult};
use crate::matching::similarity_ratio;
use crate::variants::{extract_tag, strip_variant_suffix, VariantTag};
use crate::REQUEST_TIMEOUT;
use serde::de::Error as _;
use serde_json::Value;

/// Community-maintained snapshot mapping item names to marketplace ids
const CATALOG_URL: &str =
    "https://raw.githubusercontent.com/ModestSerhat/cs2-marketplace-ids/refs/heads/main/cs2_marketplaceids.json";

const USER_AGENT: &str = "check_prices/1.0";

/// Field inside each snapshot entry carrying the Buff163 goods id
const GOODS_ID_FIELD: &str = "buff163_goods_id";

/// Minimum similarity for a fuzzy lookup to count as a match
pub const FUZZY_THRESHOLD: f64 = 0.7;

/// One catalog entry. Entries without a goods id stay in the index but are
/// invisible to lookups.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub name: String,
    pub goods_id: Option<u64>,
}

/// Name-to-goods-id index, built once per run from the remote snapshot.
///
/// Entries keep the snapshot's document order; fuzzy ties resolve to the
/// earliest entry.
pub struct CatalogIndex {
    entries: Vec<CatalogEntry>,
}

/// Lowercases a name, drops the decorative star glyph and collapses
/// whitespace runs, so typed queries and catalog keys compare cleanly.
pub fn normalize_name(name: &str) -> String {
    name.replace('★', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl CatalogIndex {
    /// Fetch the catalog snapshot from its pinned location.
    pub fn fetch() -> ApiResult<Self> {
        Self::fetch_from(CATALOG_URL)
    }

    /// Fetch a catalog snapshot from an arbitrary URL.
    pub fn fetch_from(url: &str) -> ApiResult<Self> {
        log::info!("Fetching marketplace catalog...");

        let response = reqwest::blocking::Client::new()
            .get(url)
            .header("User-Agent", USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .send()?;

        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status()));
        }

        let snapshot: Value = serde_json::from_str(&response.text()?)?;
        let index = Self::from_snapshot(&snapshot)?;

        log::info!("Loaded {} catalog entries", index.len());
        Ok(index)
    }

    /// Build the index from a parsed snapshot. The mapping is either the
    /// document itself or wrapped under an `items` key.
    fn from_snapshot(snapshot: &Value) -> ApiResult<Self> {
        let root = snapshot.as_object().ok_or_else(|| {
            ApiError::Parse(serde_json::Error::custom(
                "catalog snapshot is not a JSON object",
            ))
        })?;

        let mapping = match root.get("items").and_then(Value::as_object) {
            Some(items) => items,
            None => root,
        };

        let entries = mapping
            .iter()
            .map(|(name, meta)| CatalogEntry {
                name: name.clone(),
                goods_id: meta.get(GOODS_ID_FIELD).and_then(Value::as_u64),
            })
            .collect();

        Ok(Self { entries })
    }

    #[cfg(test)]
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry whose normalized name equals the normalized input and
    /// which has a goods id. Returns the catalog display name with the id.
    pub fn lookup_exact(&self, name: &str) -> Option<(&str, u64)> {
        let wanted = normalize_name(name);
        self.entries.iter().find_map(|entry| match entry.goods_id {
            Some(id) if normalize_name(&entry.name) == wanted => {
                Some((entry.name.as_str(), id))
            }
            _ => None,
        })
    }

    /// Closest entry by similarity ratio over normalized names, if the best
    /// score reaches `threshold`. Ties keep the earliest entry.
    pub fn lookup_fuzzy(&self, name: &str, threshold: f64) -> Option<(&str, u64)> {
        let wanted = normalize_name(name);
        let mut best: Option<(&CatalogEntry, u64, f64)> = None;

        for entry in &self.entries {
            let id = match entry.goods_id {
                Some(id) => id,
                None => continue,
            };
            let score = similarity_ratio(&wanted, &normalize_name(&entry.name));
            if best.map_or(true, |(_, _, best_score)| score > best_score) {
                best = Some((entry, id, score));
            }
        }

        best.and_then(|(entry, id, score)| {
            if score >= threshold {
                Some((entry.name.as_str(), id))
            } else {
                None
            }
        })
    }

    /// Resolve a (tag-stripped) item name: exact first, fuzzy second, and as
    /// a last resort exact on the name with any variant suffix removed.
    pub fn resolve(&self, name: &str) -> Option<(&str, u64)> {
        self.lookup_exact(name)
            .or_else(|| self.lookup_fuzzy(name, FUZZY_THRESHOLD))
            .or_else(|| self.lookup_exact(&strip_variant_suffix(name)))
    }
}

/// Outcome of resolving one raw query. A missing `goods_id` is a normal
/// per-query miss, not an error.
#[derive(Debug, Clone)]
pub struct ResolvedQuery {
    pub raw_query: String,
    pub tag: Option<VariantTag>,
    pub matched_name: Option<String>,
    pub goods_id: Option<u64>,
}

/// Resolve one raw query: pull out the variant tag, strip it off the name,
/// then look the base name up in the catalog.
pub fn resolve_query(raw_query: &str, catalog: &CatalogIndex) -> ResolvedQuery {
    let tag = extract_tag(raw_query);
    let base_name = strip_variant_suffix(raw_query);

    let (matched_name, goods_id) = match catalog.resolve(&base_name) {
        Some((name, id)) => (Some(name.to_string()), Some(id)),
        None => (None, None),
    };

    ResolvedQuery {
        raw_query: raw_query.to_string(),
        tag,
        matched_name,
        goods_id,
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
