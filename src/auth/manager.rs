use chrono::{Duration, Utc};
use serde::Deserialize;

use crate::auth::credential::{Credential, EXPIRY_MARGIN_SECS};
use crate::auth::lock::RefreshLock;
use crate::auth::store::CredentialStore;
use crate::error::FbooksError;

/// FreshBooks access tokens live 12 hours; used when the response omits
/// `expires_in`.
pub const DEFAULT_EXPIRES_IN_SECS: i64 = 43_200;

/// OAuth client settings needed for token exchanges.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Lifecycle state of the held credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    Valid,
    ExpiringSoon,
    Refreshing,
    Invalid,
}

/// Raw token response from the authorization server.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct AuthErrorBody {
    error: String,
}

/// Owns the current credential, the refresh exchange, and durable
/// persistence. The persisted store is written by this type and nothing
/// else.
///
/// The ordering invariant throughout: durable storage is updated before
/// in-memory state. A crash between the two leaves the new pair on disk,
/// which the next process picks up. The reverse order would leave the old,
/// already-consumed refresh token as the last durable copy — permanently
/// unusable.
pub struct TokenManager {
    oauth: OAuthConfig,
    store: Box<dyn CredentialStore>,
    lock: RefreshLock,
    http: reqwest::Client,
    credential: Option<Credential>,
    state: TokenState,
}

impl TokenManager {
    pub fn new(
        oauth: OAuthConfig,
        store: Box<dyn CredentialStore>,
        lock: RefreshLock,
        http: reqwest::Client,
    ) -> Result<Self, FbooksError> {
        let credential = store.load()?;
        let mut manager = Self {
            oauth,
            store,
            lock,
            http,
            credential,
            state: TokenState::Invalid,
        };
        manager.state = manager.derived_state();
        Ok(manager)
    }

    pub fn state(&self) -> TokenState {
        self.state
    }

    pub fn access_token(&self) -> Option<&str> {
        self.credential.as_ref().map(|c| c.access_token.as_str())
    }

    /// True when no credential is held, no expiry is known, or the expiry is
    /// within the safety margin.
    pub fn is_expired(&self) -> bool {
        self.credential.as_ref().is_none_or(Credential::is_expired)
    }

    /// Exchange the held refresh token for a new pair and persist it.
    ///
    /// The cross-process lock is held from before the token is submitted
    /// until the new pair is durable: submission consumes the refresh token
    /// on the server side whatever happens afterwards, so no other process
    /// may read the store while the replacement is in flight.
    pub async fn refresh(&mut self) -> Result<(), FbooksError> {
        let Some(refresh_token) = self
            .credential
            .as_ref()
            .and_then(|c| c.refresh_token.clone())
        else {
            self.state = TokenState::Invalid;
            return Err(FbooksError::NoRefreshToken);
        };

        let guard = self.lock.acquire()?;
        self.state = TokenState::Refreshing;
        tracing::debug!("refreshing access token");

        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.as_str()),
            ("client_id", self.oauth.client_id.as_str()),
            ("client_secret", self.oauth.client_secret.as_str()),
        ];

        let issued = match request_token(&self.http, &self.oauth.token_url, &params).await {
            Ok(issued) => issued,
            Err(FbooksError::AuthServerError { status, body }) if is_invalid_grant(&body) => {
                drop(guard);
                tracing::error!(status, "refresh token rejected with invalid_grant");
                self.state = TokenState::Invalid;
                return Err(FbooksError::RefreshTokenInvalid);
            }
            Err(e) => {
                drop(guard);
                self.state = self.derived_state();
                return Err(e);
            }
        };

        let credential = issued.into_credential();
        if let Err(e) = self.store.save(&credential) {
            drop(guard);
            // The old refresh token was consumed by the submission above and
            // its replacement could not be made durable.
            self.state = TokenState::Invalid;
            return Err(e);
        }
        self.credential = Some(credential);
        drop(guard);
        self.state = TokenState::Valid;
        tracing::info!("access token refreshed and persisted");
        Ok(())
    }

    /// Make `credential` the durable current pair, then adopt it in memory.
    pub fn persist(&mut self, credential: Credential) -> Result<(), FbooksError> {
        let guard = self.lock.acquire()?;
        let saved = self.store.save(&credential);
        drop(guard);
        saved?;
        self.credential = Some(credential);
        self.state = self.derived_state();
        Ok(())
    }

    /// Initial authorization-code exchange, producing the first credential.
    pub async fn exchange_code(&mut self, code: &str) -> Result<(), FbooksError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.oauth.client_id.as_str()),
            ("client_secret", self.oauth.client_secret.as_str()),
            ("redirect_uri", self.oauth.redirect_uri.as_str()),
        ];
        let issued = request_token(&self.http, &self.oauth.token_url, &params).await?;
        self.persist(issued.into_credential())
    }

    fn derived_state(&self) -> TokenState {
        let Some(ref credential) = self.credential else {
            return TokenState::Invalid;
        };
        match credential.expires_at {
            None => TokenState::Invalid,
            Some(expires) => {
                let now = Utc::now();
                if now >= expires {
                    TokenState::Invalid
                } else if now + Duration::seconds(EXPIRY_MARGIN_SECS) >= expires {
                    TokenState::ExpiringSoon
                } else {
                    TokenState::Valid
                }
            }
        }
    }
}

struct IssuedToken {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
}

impl IssuedToken {
    fn into_credential(self) -> Credential {
        Credential {
            access_token: self.access_token,
            refresh_token: Some(self.refresh_token),
            expires_at: Some(Utc::now() + Duration::seconds(self.expires_in)),
        }
    }
}

async fn request_token(
    http: &reqwest::Client,
    token_url: &str,
    params: &[(&str, &str)],
) -> Result<IssuedToken, FbooksError> {
    let response = http.post(token_url).form(params).send().await?;

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if !status.is_success() {
        return Err(FbooksError::AuthServerError {
            status: status.as_u16(),
            body,
        });
    }

    let parsed: TokenResponse = serde_json::from_str(&body)
        .map_err(|e| FbooksError::MalformedTokenResponse(format!("invalid JSON: {e}")))?;

    let access_token = parsed
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| FbooksError::MalformedTokenResponse("missing access_token".into()))?;
    let refresh_token = parsed
        .refresh_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| FbooksError::MalformedTokenResponse("missing refresh_token".into()))?;

    Ok(IssuedToken {
        access_token,
        refresh_token,
        expires_in: parsed.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS),
    })
}

fn is_invalid_grant(body: &str) -> bool {
    serde_json::from_str::<AuthErrorBody>(body)
        .map(|e| e.error == "invalid_grant")
        .unwrap_or(false)
}
