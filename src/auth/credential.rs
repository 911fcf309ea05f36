use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Tokens are treated as expired this many seconds before their actual
/// expiry, so a request never goes out with a token about to die mid-flight.
pub const EXPIRY_MARGIN_SECS: i64 = 300;

/// An access/refresh token pair with its expiry.
///
/// The refresh token is single-use: the authorization server invalidates it
/// the moment it is submitted, regardless of whether the response ever
/// arrives. Any copy of a `Credential` whose refresh token has been
/// submitted is dead weight until the replacement pair is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    /// True when the access token is expired or expiring within the safety
    /// margin. An unknown expiry counts as expired.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS) >= expires,
            None => true,
        }
    }
}
