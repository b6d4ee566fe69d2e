//! Integration test to verify the workspace wires together correctly.

#![allow(clippy::no_effect_underscore_binding)]

use std::sync::Arc;

use relay_application::{Dispatcher, ExemptPaths, TokenStore};
use relay_infrastructure::{HttpRefreshService, ReqwestTransport};

#[test]
fn domain_crate_compiles() {
    let _method = relay_domain::HttpMethod::Get;
    let _descriptor = relay_domain::RequestDescriptor::get("/health");
    let _token = relay_domain::AccessToken::new("t1");
    let _status = relay_domain::StatusCode::UNAUTHORIZED;
}

#[test]
fn application_crate_compiles() {
    let _error = relay_application::ClientError::SessionExpired;
    let _store = TokenStore::new();
}

#[tokio::test]
async fn full_stack_wires_together() {
    let transport = ReqwestTransport::new("https://api.example.com").map(Arc::new);
    assert!(transport.is_ok());

    #[allow(clippy::unwrap_used)]
    let token_url = reqwest::Url::parse("https://api.example.com/auth/refresh").unwrap();
    #[allow(clippy::unwrap_used)]
    let auth = Arc::new(HttpRefreshService::new(token_url, "refresh-credential").unwrap());

    #[allow(clippy::unwrap_used)]
    let dispatcher = Dispatcher::new(
        transport.unwrap(),
        auth,
        TokenStore::new(),
        ExemptPaths::new(["/auth/login", "/auth/register"], "/auth/refresh"),
    );

    // No network call here; just confirm the assembled dispatcher exposes
    // its shared state.
    assert!(dispatcher.token_store().get().await.is_none());
    assert!(!dispatcher.coordinator().is_refreshing().await);
}
