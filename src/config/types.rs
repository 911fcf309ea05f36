use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::auth::{credentials_path, OAuthConfig};

fn default_api_url() -> String {
    "https://api.freshbooks.com".to_string()
}

fn default_token_url() -> String {
    "https://api.freshbooks.com/auth/oauth/token".to_string()
}

fn default_authorize_url() -> String {
    "https://auth.freshbooks.com/oauth/authorize".to_string()
}

fn default_http_timeout_secs() -> u64 {
    30
}

/// Account and OAuth client settings.
///
/// These are configuration, never mutated by token refresh; the mutable
/// token state lives in the credential store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub account_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_authorize_url")]
    pub authorize_url: String,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    #[serde(default)]
    pub credentials_path: Option<PathBuf>,
}

impl Config {
    pub fn oauth(&self) -> OAuthConfig {
        OAuthConfig {
            token_url: self.token_url.clone(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            redirect_uri: self.redirect_uri.clone(),
        }
    }

    /// Where the credential store lives: explicit config entry, else the
    /// default (which honors `FBOOKS_CREDENTIALS`).
    pub fn credentials_file(&self) -> PathBuf {
        self.credentials_path
            .clone()
            .unwrap_or_else(credentials_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_gets_defaults() {
        let json = r#"{
            "accountId": "ogqZ2g",
            "clientId": "id",
            "clientSecret": "secret",
            "redirectUri": "https://localhost/callback"
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.api_url, "https://api.freshbooks.com");
        assert_eq!(config.token_url, "https://api.freshbooks.com/auth/oauth/token");
        assert_eq!(config.authorize_url, "https://auth.freshbooks.com/oauth/authorize");
        assert_eq!(config.http_timeout_secs, 30);
        assert!(config.credentials_path.is_none());
    }

    #[test]
    fn overrides_win_over_defaults() {
        let json = r#"{
            "accountId": "a",
            "clientId": "b",
            "clientSecret": "c",
            "redirectUri": "https://localhost/callback",
            "apiUrl": "http://127.0.0.1:9000",
            "tokenUrl": "http://127.0.0.1:9000/token",
            "httpTimeoutSecs": 5,
            "credentialsPath": "/tmp/creds"
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.api_url, "http://127.0.0.1:9000");
        assert_eq!(config.http_timeout_secs, 5);
        assert_eq!(config.credentials_file(), PathBuf::from("/tmp/creds"));
    }

    #[test]
    fn oauth_view_carries_client_settings() {
        let config = Config {
            account_id: "a".into(),
            client_id: "id".into(),
            client_secret: "secret".into(),
            redirect_uri: "https://localhost/cb".into(),
            api_url: default_api_url(),
            token_url: "https://t.example/token".into(),
            authorize_url: default_authorize_url(),
            http_timeout_secs: 30,
            credentials_path: None,
        };
        let oauth = config.oauth();
        assert_eq!(oauth.token_url, "https://t.example/token");
        assert_eq!(oauth.client_id, "id");
    }
}
