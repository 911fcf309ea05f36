pub mod credential;
pub mod lock;
pub mod manager;
pub mod store;

pub use credential::{Credential, EXPIRY_MARGIN_SECS};
pub use lock::RefreshLock;
pub use manager::{OAuthConfig, TokenManager, TokenState, DEFAULT_EXPIRES_IN_SECS};
pub use store::{credentials_path, CredentialStore, FileStore, MemoryStore};
