//! Tests for pagination module

use super::*;
use crate::error::Error;
use crate::types::StringMap;
use serde_json::json;
use test_case::test_case;
use url::Url;

fn request_url() -> Url {
    Url::parse("https://app.getcensus.com/api/v1/syncs?order=asc&per_page=1").unwrap()
}

fn params(pairs: &[(&str, &str)]) -> StringMap {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

// ============================================================================
// NextPage / PaginationState
// ============================================================================

#[test]
fn test_next_page_accessors() {
    let url = Url::parse("https://app.getcensus.com/api/v1/syncs?page=2").unwrap();
    let next = NextPage::Continue(url.clone());
    assert!(next.is_continue());
    assert!(!next.is_done());
    assert_eq!(next.token(), Some(&url));

    assert!(NextPage::Done.is_done());
    assert!(NextPage::Done.token().is_none());
}

#[test]
fn test_pagination_state_mutations() {
    let mut state = PaginationState::new();
    assert!(state.token.is_none());

    state.add_page(3);
    state.advance(Url::parse("https://app.getcensus.com/x?page=2").unwrap());
    assert_eq!(state.pages, 1);
    assert_eq!(state.total_fetched, 3);
    assert!(state.token.is_some());

    state.mark_done();
    assert!(state.done);
    assert!(state.token.is_none());
}

// ============================================================================
// Parameter overlay
// ============================================================================

#[test]
fn test_base_params() {
    let paginator = NextUrlPaginator::census();
    assert_eq!(
        paginator.base_params(),
        params(&[("order", "asc"), ("per_page", "1")])
    );
}

#[test]
fn test_first_request_uses_base_params_only() {
    let paginator = NextUrlPaginator::census();
    let state = PaginationState::new();
    assert_eq!(paginator.request_params(&state), paginator.base_params());
}

#[test]
fn test_overlay_adds_token_params() {
    let token = Url::parse("https://app.getcensus.com/api/v1/syncs?page=2").unwrap();
    let merged = overlay_params(params(&[("order", "asc"), ("per_page", "1")]), Some(&token));
    assert_eq!(
        merged,
        params(&[("order", "asc"), ("per_page", "1"), ("page", "2")])
    );
}

#[test]
fn test_overlay_token_overrides_base() {
    let token =
        Url::parse("https://app.getcensus.com/api/v1/syncs?page=3&per_page=25&order=desc").unwrap();
    let merged = overlay_params(params(&[("order", "asc"), ("per_page", "1")]), Some(&token));
    assert_eq!(
        merged,
        params(&[("order", "desc"), ("per_page", "25"), ("page", "3")])
    );
}

#[test]
fn test_overlay_later_duplicate_wins() {
    let token = Url::parse("https://app.getcensus.com/api/v1/syncs?page=2&page=5").unwrap();
    let merged = overlay_params(StringMap::new(), Some(&token));
    assert_eq!(merged.get("page"), Some(&"5".to_string()));
}

#[test]
fn test_overlay_decodes_percent_encoding() {
    let token =
        Url::parse("https://app.getcensus.com/api/v1/syncs?cursor=a%2Bb%3D&label=my%20sync")
            .unwrap();
    let merged = overlay_params(StringMap::new(), Some(&token));
    assert_eq!(merged.get("cursor"), Some(&"a+b=".to_string()));
    assert_eq!(merged.get("label"), Some(&"my sync".to_string()));
}

#[test]
fn test_overlay_without_token() {
    let base = params(&[("order", "asc")]);
    assert_eq!(overlay_params(base.clone(), None), base);
}

// ============================================================================
// Response processing
// ============================================================================

#[test_case(json!({"data": [], "next": null}) ; "null next")]
#[test_case(json!({"data": []}) ; "missing next")]
#[test_case(json!({"data": [], "next": ""}) ; "empty string next")]
#[test_case(json!({"data": [], "next": false}) ; "false next")]
#[test_case(json!({"data": [], "next": 0}) ; "zero next")]
fn test_falsy_next_terminates(body: serde_json::Value) {
    let paginator = NextUrlPaginator::census();
    let mut state = PaginationState::new();

    let next = paginator
        .process_response(&body, &request_url(), 0, &mut state)
        .unwrap();

    assert!(next.is_done());
    assert!(state.done);
    assert_eq!(state.pages, 1);
}

#[test]
fn test_next_url_continues_and_merges() {
    let paginator = NextUrlPaginator::census();
    let mut state = PaginationState::new();
    let body = json!({
        "data": [{"id": 1}],
        "next": "https://app.getcensus.com/api/v1/syncs?page=2"
    });

    let next = paginator
        .process_response(&body, &request_url(), 1, &mut state)
        .unwrap();

    assert!(next.is_continue());
    assert_eq!(
        paginator.request_params(&state),
        params(&[("order", "asc"), ("per_page", "1"), ("page", "2")])
    );
    assert_eq!(state.total_fetched, 1);
}

#[test]
fn test_relative_next_resolves_against_request() {
    let paginator = NextUrlPaginator::census();
    let mut state = PaginationState::new();
    let body = json!({"data": [], "next": "/api/v1/syncs?page=4"});

    let next = paginator
        .process_response(&body, &request_url(), 0, &mut state)
        .unwrap();

    assert_eq!(
        next.token().unwrap().as_str(),
        "https://app.getcensus.com/api/v1/syncs?page=4"
    );
}

#[test]
fn test_integer_next_is_rejected() {
    let paginator = NextUrlPaginator::census();
    let mut state = PaginationState::new();
    let body = json!({"data": [], "next": 2});

    let err = paginator
        .process_response(&body, &request_url(), 0, &mut state)
        .unwrap_err();
    assert!(matches!(err, Error::Pagination { .. }));
}

#[test]
fn test_repeated_token_is_a_loop() {
    let paginator = NextUrlPaginator::census();
    let mut state = PaginationState::new();
    let body = json!({
        "data": [{"id": 1}],
        "next": "https://app.getcensus.com/api/v1/syncs?page=2"
    });

    paginator
        .process_response(&body, &request_url(), 1, &mut state)
        .unwrap();
    let err = paginator
        .process_response(&body, &request_url(), 1, &mut state)
        .unwrap_err();

    assert!(err.to_string().contains("Loop detected"));
}

#[test]
fn test_cycle_through_earlier_token_is_a_loop() {
    let paginator = NextUrlPaginator::census();
    let mut state = PaginationState::new();
    let page = |n: u32| json!({"data": [{"id": n}], "next": format!("/api/v1/syncs?page={n}")});

    paginator
        .process_response(&page(2), &request_url(), 1, &mut state)
        .unwrap();
    paginator
        .process_response(&page(3), &request_url(), 1, &mut state)
        .unwrap();
    let err = paginator
        .process_response(&page(2), &request_url(), 1, &mut state)
        .unwrap_err();

    assert!(matches!(err, Error::Pagination { .. }));
    assert_eq!(state.pages, 3);
}

#[test]
fn test_with_page_size() {
    let paginator = NextUrlPaginator::census().with_page_size(100);
    assert_eq!(paginator.base_params().get("per_page"), Some(&"100".to_string()));
}
