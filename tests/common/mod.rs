use std::path::{Path, PathBuf};

use chrono::{Duration, Utc};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fbooks::{
    Credential, CredentialStore, FileStore, OAuthConfig, RefreshLock, RequestExecutor,
    TokenManager,
};

pub const TOKEN_PATH: &str = "/auth/oauth/token";

pub fn oauth_config(server_uri: &str) -> OAuthConfig {
    OAuthConfig {
        token_url: format!("{server_uri}{TOKEN_PATH}"),
        client_id: "test-client-id".into(),
        client_secret: "test-client-secret".into(),
        redirect_uri: "https://localhost/callback".into(),
    }
}

/// Seed a credentials file. Negative `expires_in_secs` produces an
/// already-expired credential.
pub fn write_credentials(
    dir: &Path,
    access: &str,
    refresh: Option<&str>,
    expires_in_secs: i64,
) -> PathBuf {
    let path = dir.join("credentials");
    let mut store = FileStore::new(path.clone());
    store
        .save(&Credential {
            access_token: access.into(),
            refresh_token: refresh.map(String::from),
            expires_at: Some(Utc::now() + Duration::seconds(expires_in_secs)),
        })
        .unwrap();
    path
}

pub fn manager_for(server_uri: &str, credentials: &Path) -> TokenManager {
    let store = FileStore::new(credentials.to_path_buf());
    let lock = RefreshLock::new(&RefreshLock::lock_path(credentials)).unwrap();
    TokenManager::new(
        oauth_config(server_uri),
        Box::new(store),
        lock,
        reqwest::Client::new(),
    )
    .unwrap()
}

#[allow(dead_code)]
pub fn executor_for(server_uri: &str, credentials: &Path) -> RequestExecutor {
    RequestExecutor::new(
        manager_for(server_uri, credentials),
        reqwest::Client::new(),
        server_uri.to_string(),
    )
}

/// Mount a token endpoint issuing a fixed new pair, asserting it is hit
/// exactly `expect` times.
#[allow(dead_code)]
pub async fn mount_token_endpoint(server: &MockServer, access: &str, refresh: &str, expect: u64) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": access,
            "refresh_token": refresh,
            "expires_in": 43200,
        })))
        .expect(expect)
        .mount(server)
        .await;
}
