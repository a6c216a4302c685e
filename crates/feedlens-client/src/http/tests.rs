// crates/feedlens-client/src/http/tests.rs
// ============================================================================
// Module: HTTP Transport Unit Tests
// Description: Unit coverage for URL construction and credential headers.
// Purpose: Ensure routes, prefixes, and identifiers are encoded correctly.
// Dependencies: feedlens-client, feedlens-config
// ============================================================================

//! ## Overview
//! Checks request URL assembly without touching the network.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use feedlens_config::ApiConfig;
use feedlens_config::RouteOverrides;
use feedlens_core::ResourceKind;

use super::ClientBuildError;
use super::HttpTransport;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn request_url_appends_route_and_username() {
    let config = ApiConfig {
        base_url: "https://analytics.example.com".to_string(),
        ..ApiConfig::default()
    };
    let transport = HttpTransport::from_config(&config).unwrap();
    let url = transport.request_url(ResourceKind::WordCloud, "acme");
    assert_eq!(url.as_str(), "https://analytics.example.com/api/instagram/word-cloud?username=acme");
}

#[test]
fn request_url_keeps_base_path_prefix_and_overrides() {
    let config = ApiConfig {
        base_url: "https://example.com/proxy/".to_string(),
        routes: RouteOverrides {
            post_list: Some("/v2/posts".to_string()),
            ..RouteOverrides::default()
        },
        ..ApiConfig::default()
    };
    let transport = HttpTransport::from_config(&config).unwrap();
    let url = transport.request_url(ResourceKind::PostList, "acme");
    assert_eq!(url.as_str(), "https://example.com/proxy/v2/posts?username=acme");
}

#[test]
fn request_url_encodes_identifiers() {
    let transport = HttpTransport::from_config(&ApiConfig::default()).unwrap();
    let url = transport.request_url(ResourceKind::Statistics, "a b&c");
    assert_eq!(url.query(), Some("username=a+b%26c"));
}

#[test]
fn credentials_with_newlines_are_rejected() {
    let config = ApiConfig {
        session_cookie: Some("session=abc\r\nx-injected: 1".to_string()),
        ..ApiConfig::default()
    };
    let Err(err) = HttpTransport::from_config(&config) else {
        panic!("expected header error");
    };
    assert!(matches!(err, ClientBuildError::Header("cookie")));
}

#[test]
fn invalid_base_url_is_a_config_error() {
    let config = ApiConfig {
        base_url: "not a url".to_string(),
        ..ApiConfig::default()
    };
    let Err(err) = HttpTransport::from_config(&config) else {
        panic!("expected config error");
    };
    assert!(matches!(err, ClientBuildError::Config(_)));
}
