pub mod api;
pub mod args;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;

pub use api::{Freshbooks, LineItem, RequestExecutor};
pub use auth::{
    Credential, CredentialStore, FileStore, MemoryStore, OAuthConfig, RefreshLock, TokenManager,
    TokenState,
};
pub use config::{load_config, Config};
pub use error::FbooksError;

use std::time::Duration;

/// HTTP client with the configured bounded timeout. Both the token
/// exchanges and the API calls go through a client built here; there is no
/// unbounded request anywhere.
pub fn http_client(config: &Config) -> Result<reqwest::Client, FbooksError> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()?)
}

/// Token manager wired to the file-backed credential store and its
/// cross-process refresh lock.
pub fn build_token_manager(
    config: &Config,
    http: reqwest::Client,
) -> Result<TokenManager, FbooksError> {
    let path = config.credentials_file();
    let store = FileStore::new(path.clone());
    let lock = RefreshLock::new(&RefreshLock::lock_path(&path))?;
    TokenManager::new(config.oauth(), Box::new(store), lock, http)
}

/// Connect to the configured FreshBooks account.
pub fn connect(config: &Config) -> Result<Freshbooks, FbooksError> {
    let http = http_client(config)?;
    let manager = build_token_manager(config, http.clone())?;
    let executor = RequestExecutor::new(manager, http, config.api_url.clone());
    Ok(Freshbooks::new(executor, config.account_id.clone()))
}
