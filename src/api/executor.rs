use reqwest::{Method, StatusCode};
use serde_json::Value;

use crate::auth::TokenManager;
use crate::error::FbooksError;

/// Executes API calls with token upkeep wrapped around them.
///
/// Policy per call: refresh proactively when the token looks expired (a
/// failure there is logged and swallowed, the old token may still work);
/// on a 401 response, exactly one refresh and one retry, with the refresh
/// failure fatal. Nothing else is retried and non-401 errors pass through
/// with their status and body.
pub struct RequestExecutor {
    manager: TokenManager,
    client: reqwest::Client,
    base_url: String,
}

impl RequestExecutor {
    pub fn new(manager: TokenManager, client: reqwest::Client, base_url: String) -> Self {
        Self {
            manager,
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn manager(&self) -> &TokenManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut TokenManager {
        &mut self.manager
    }

    pub async fn get(&mut self, endpoint: &str, query: &[(String, String)]) -> Result<Value, FbooksError> {
        self.execute(Method::GET, endpoint, None, query).await
    }

    pub async fn post(&mut self, endpoint: &str, body: &Value) -> Result<Value, FbooksError> {
        self.execute(Method::POST, endpoint, Some(body), &[]).await
    }

    pub async fn put(&mut self, endpoint: &str, body: &Value) -> Result<Value, FbooksError> {
        self.execute(Method::PUT, endpoint, Some(body), &[]).await
    }

    pub async fn execute(
        &mut self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        query: &[(String, String)],
    ) -> Result<Value, FbooksError> {
        if self.manager.is_expired() {
            if let Err(e) = self.manager.refresh().await {
                // The held token may still be accepted; let the call decide.
                tracing::warn!("proactive token refresh failed, continuing with current token: {e}");
            }
        }

        let mut response = self.send(method.clone(), endpoint, body, query).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::debug!("got 401, refreshing token and retrying once");
            self.manager.refresh().await?;
            response = self.send(method, endpoint, body, query).await?;
        }

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FbooksError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response.json().await.map_err(FbooksError::Transport)
    }

    async fn send(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        query: &[(String, String)],
    ) -> Result<reqwest::Response, FbooksError> {
        let token = self.manager.access_token().ok_or(FbooksError::NotAuthorized)?;
        let url = format!("{}{}", self.base_url, endpoint);

        let mut request = self.client.request(method, &url).bearer_auth(token);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        Ok(request.send().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MemoryStore, OAuthConfig, RefreshLock};

    fn executor() -> (RequestExecutor, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let lock = RefreshLock::new(&dir.path().join("credentials.lock")).unwrap();
        let manager = TokenManager::new(
            OAuthConfig {
                token_url: "https://auth.example.com/token".into(),
                client_id: "id".into(),
                client_secret: "secret".into(),
                redirect_uri: "https://localhost/callback".into(),
            },
            Box::new(MemoryStore::default()),
            lock,
            reqwest::Client::new(),
        )
        .unwrap();
        let executor = RequestExecutor::new(
            manager,
            reqwest::Client::new(),
            "https://api.example.com/".into(),
        );
        (executor, dir)
    }

    #[test]
    fn base_url_trailing_slash_stripped() {
        let (executor, _dir) = executor();
        assert_eq!(executor.base_url, "https://api.example.com");
    }

    #[tokio::test]
    async fn send_without_credentials_is_not_authorized() {
        let (executor, _dir) = executor();
        let err = executor
            .send(Method::GET, "/x", None, &[])
            .await
            .unwrap_err();
        assert_eq!(err.code(), "not_authorized");
    }
}
