//! Tests for catalog loading and name resolution.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{normalize_name, resolve_query, CatalogEntry, CatalogIndex, FUZZY_THRESHOLD};
use crate::error::ApiError;
use crate::variants::VariantTag;

fn entry(name: &str, goods_id: Option<u64>) -> CatalogEntry {
    CatalogEntry {
        name: name.to_string(),
        goods_id,
    }
}

fn sample_index() -> CatalogIndex {
    CatalogIndex::from_entries(vec![
        entry("AK-47 | Redline", Some(100)),
        entry("★ Karambit | Doppler", Some(200)),
        entry("AWP | Dragon Lore", Some(300)),
        entry("Sticker | Crown", None),
    ])
}

// ── normalize_name ───────────────────────────────────────────────────

#[test]
fn normalize_strips_star_and_whitespace() {
    assert_eq!(normalize_name("★ Karambit |  Doppler "), "karambit | doppler");
    assert_eq!(normalize_name("AK-47\t| Redline"), "ak-47 | redline");
}

#[test]
fn normalize_is_idempotent() {
    for raw in ["★ M9 Bayonet | Fade", "  AWP   Dragon  Lore ", "", "★★"] {
        let once = normalize_name(raw);
        assert_eq!(normalize_name(&once), once);
    }
}

// ── lookup_exact ─────────────────────────────────────────────────────

#[test]
fn exact_lookup_ignores_case_whitespace_and_glyph() {
    let index = sample_index();
    let (name, id) = index.lookup_exact("karambit   | doppler").unwrap();
    assert_eq!(name, "★ Karambit | Doppler");
    assert_eq!(id, 200);
}

#[test]
fn exact_lookup_skips_entries_without_goods_id() {
    let index = sample_index();
    assert!(index.lookup_exact("Sticker | Crown").is_none());
}

#[test]
fn exact_lookup_misses_unknown_names() {
    let index = sample_index();
    assert!(index.lookup_exact("Completely Unknown Skin XYZ").is_none());
}

// ── lookup_fuzzy ─────────────────────────────────────────────────────

#[test]
fn fuzzy_lookup_tolerates_small_typos() {
    let index = sample_index();
    let (name, id) = index.lookup_fuzzy("ak-47 | redlin", FUZZY_THRESHOLD).unwrap();
    assert_eq!(name, "AK-47 | Redline");
    assert_eq!(id, 100);
}

#[test]
fn fuzzy_lookup_respects_threshold_floor() {
    let index = sample_index();
    assert!(index.lookup_fuzzy("garbage input", FUZZY_THRESHOLD).is_none());
}

#[test]
fn raising_the_threshold_never_adds_matches() {
    let index = sample_index();
    let queries = ["ak-47 | redlin", "awp dragon lore", "nonsense", "karambit doppler"];
    for query in queries {
        let loose = index.lookup_fuzzy(query, 0.5).map(|(_, id)| id);
        let strict = index.lookup_fuzzy(query, 0.9).map(|(_, id)| id);
        if let Some(id) = strict {
            assert_eq!(loose, Some(id), "strict match for {query:?} missing at loose threshold");
        }
    }
}

#[test]
fn fuzzy_tie_keeps_the_earliest_entry() {
    let index = CatalogIndex::from_entries(vec![
        entry("abcd", Some(1)),
        entry("abce", Some(2)),
    ]);
    // "abcf" is equidistant from both entries
    let (name, id) = index.lookup_fuzzy("abcf", 0.7).unwrap();
    assert_eq!(name, "abcd");
    assert_eq!(id, 1);
}

#[test]
fn fuzzy_lookup_skips_entries_without_goods_id() {
    let index = CatalogIndex::from_entries(vec![entry("AK-47 | Redline", None)]);
    assert!(index.lookup_fuzzy("AK-47 | Redline", FUZZY_THRESHOLD).is_none());
}

// ── resolve / resolve_query ──────────────────────────────────────────

#[test]
fn resolve_prefers_exact_over_fuzzy() {
    let index = CatalogIndex::from_entries(vec![
        entry("M4A4 | Howl", Some(1)),
        entry("M4A1 | Howl", Some(2)),
    ]);
    let (_, id) = index.resolve("m4a1 | howl").unwrap();
    assert_eq!(id, 2);
}

#[test]
fn resolve_falls_back_to_variant_stripped_name() {
    let index = CatalogIndex::from_entries(vec![entry("Doppler", Some(200))]);
    let (name, id) = index.resolve("Doppler Phase 3").unwrap();
    assert_eq!(name, "Doppler");
    assert_eq!(id, 200);
}

#[test]
fn resolve_query_carries_tag_and_match() {
    let index = CatalogIndex::from_entries(vec![entry("★ Karambit | Doppler", Some(200))]);
    let resolved = resolve_query("Karambit | Doppler Phase 3", &index);
    assert_eq!(resolved.raw_query, "Karambit | Doppler Phase 3");
    assert_eq!(resolved.tag, Some(VariantTag::Phase3));
    assert_eq!(resolved.matched_name.as_deref(), Some("★ Karambit | Doppler"));
    assert_eq!(resolved.goods_id, Some(200));
}

#[test]
fn resolve_query_miss_is_a_plain_none() {
    let index = sample_index();
    let resolved = resolve_query("Completely Unknown Skin XYZ", &index);
    assert_eq!(resolved.tag, None);
    assert!(resolved.matched_name.is_none());
    assert!(resolved.goods_id.is_none());
}

// ── fetch_from ───────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_parses_a_direct_mapping() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/catalog.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "AK-47 | Redline": { "buff163_goods_id": 100, "steam_id": 12 },
            "AWP | Dragon Lore": { "steam_id": 34 }
        })))
        .mount(&mock_server)
        .await;

    let url = format!("{}/catalog.json", mock_server.uri());
    let index = tokio::task::spawn_blocking(move || CatalogIndex::fetch_from(&url))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(index.len(), 2);
    assert_eq!(index.lookup_exact("ak-47 | redline").unwrap().1, 100);
    // Entry without a goods id is indexed but never matched
    assert!(index.lookup_exact("AWP | Dragon Lore").is_none());
}

#[tokio::test]
async fn fetch_unwraps_the_items_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/catalog.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": {
                "AK-47 | Redline": { "buff163_goods_id": 100 }
            }
        })))
        .mount(&mock_server)
        .await;

    let url = format!("{}/catalog.json", mock_server.uri());
    let index = tokio::task::spawn_blocking(move || CatalogIndex::fetch_from(&url))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(index.len(), 1);
    assert_eq!(index.lookup_exact("AK-47 | Redline").unwrap().1, 100);
}

#[tokio::test]
async fn fetch_error_status_is_an_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/catalog.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let url = format!("{}/catalog.json", mock_server.uri());
    let result = tokio::task::spawn_blocking(move || CatalogIndex::fetch_from(&url))
        .await
        .unwrap();

    match result {
        Err(ApiError::HttpStatus(status)) => assert_eq!(status.as_u16(), 500),
        Err(other) => panic!("Expected ApiError::HttpStatus, got: {other:?}"),
        Ok(_) => panic!("Expected ApiError::HttpStatus, got a catalog"),
    }
}

#[tokio::test]
async fn fetch_malformed_body_is_a_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/catalog.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&mock_server)
        .await;

    let url = format!("{}/catalog.json", mock_server.uri());
    let result = tokio::task::spawn_blocking(move || CatalogIndex::fetch_from(&url))
        .await
        .unwrap();

    assert!(matches!(result, Err(ApiError::Parse(_))));
}

#[tokio::test]
async fn fetch_non_object_body_is_a_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/catalog.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([1, 2, 3])))
        .mount(&mock_server)
        .await;

    let url = format!("{}/catalog.json", mock_server.uri());
    let result = tokio::task::spawn_blocking(move || CatalogIndex::fetch_from(&url))
        .await
        .unwrap();

    assert!(matches!(result, Err(ApiError::Parse(_))));
}
