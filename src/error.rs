use std::path::PathBuf;

/// Re-authorization instructions shared by every fatal token error.
const REAUTH_HINT: &str =
    "Run `fbooks auth` to open the authorization page, then `fbooks auth <CODE>` with the code \
     from the redirect URL.";

#[derive(Debug, thiserror::Error)]
pub enum FbooksError {
    #[error("Not authorized: no stored credentials. {REAUTH_HINT}")]
    NotAuthorized,

    #[error("No refresh token available; manual re-authorization required. {REAUTH_HINT}")]
    NoRefreshToken,

    #[error(
        "Refresh token rejected as invalid (already used, revoked, or raced by a concurrent \
         refresh). FreshBooks refresh tokens are single-use: if a previous refresh consumed the \
         token but its replacement was never saved, or two processes refreshed at once, the \
         stored token is now dead. Manual re-authorization required. {REAUTH_HINT}"
    )]
    RefreshTokenInvalid,

    #[error("Authorization server error (HTTP {status}): {body}")]
    AuthServerError { status: u16, body: String },

    #[error("Malformed token response from authorization server: {0}")]
    MalformedTokenResponse(String),

    #[error("Failed to persist credentials to {}: {source}", path.display())]
    PersistFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("API request failed (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    #[error("No client found with email '{0}'")]
    ClientNotFound(String),

    #[error("Multiple clients found with email '{0}'; resolve the ambiguity in FreshBooks first")]
    AmbiguousClient(String),

    #[error(
        "Sending an invoice emails the client immediately and requires explicit approval. \
         Re-run with --approve once a human has signed off."
    )]
    ApprovalRequired,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Error in config {}: {detail}", path.display())]
    ConfigError { path: PathBuf, detail: String },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl FbooksError {
    /// Error code string for structured output and scripting.
    pub fn code(&self) -> &'static str {
        match self {
            FbooksError::NotAuthorized => "not_authorized",
            FbooksError::NoRefreshToken => "no_refresh_token",
            FbooksError::RefreshTokenInvalid => "refresh_token_invalid",
            FbooksError::AuthServerError { .. } => "auth_server_error",
            FbooksError::MalformedTokenResponse(_) => "malformed_token_response",
            FbooksError::PersistFailure { .. } => "persist_failure",
            FbooksError::Api { .. } => "api_error",
            FbooksError::ClientNotFound(_) => "not_found",
            FbooksError::AmbiguousClient(_) => "ambiguous_client",
            FbooksError::ApprovalRequired => "approval_required",
            FbooksError::InvalidArgument(_) => "invalid_argument",
            FbooksError::Transport(_) => "transport_error",
            FbooksError::ConfigError { .. } => "config_error",
            FbooksError::IoError(_) => "io_error",
        }
    }

    /// True when recovery requires a fresh authorization-code exchange.
    pub fn needs_reauth(&self) -> bool {
        matches!(
            self,
            FbooksError::NotAuthorized
                | FbooksError::NoRefreshToken
                | FbooksError::RefreshTokenInvalid
        )
    }
}
