#![allow(dead_code)]

use std::sync::OnceLock;

use basalam_domain::{BasalamConfig, Environment};
use serde_json::json;
use tracing_subscriber::EnvFilter;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN_PATH: &str = "/oauth/token";

static TRACING: OnceLock<()> = OnceLock::new();

/// Install a test subscriber once; `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    TRACING.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Configuration pointing the token endpoint and every service at `server`.
pub fn config_for(server: &MockServer) -> BasalamConfig {
    BasalamConfig::for_environment(Environment::Development)
        .with_all_services_at(&server.uri())
        .with_token_url(format!("{}{TOKEN_PATH}", server.uri()))
        .with_timeout_secs(5)
}

/// Token endpoint answering every client-credentials request with the
/// tokens in `access_tokens`, one per call, in order.
pub async fn mount_token_sequence(server: &MockServer, access_tokens: &[&str], scope: &str) {
    for (index, token) in access_tokens.iter().enumerate() {
        let mock = Mock::given(method("POST"))
            .and(path(TOKEN_PATH))
            .and(body_string_contains("grant_type=client_credentials"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": token,
                "token_type": "Bearer",
                "expires_in": 3600,
                "scope": scope,
            })))
            .expect(1);
        if index + 1 < access_tokens.len() {
            mock.up_to_n_times(1).mount(server).await;
        } else {
            mock.mount(server).await;
        }
    }
}
