use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::auth::credential::Credential;
use crate::error::FbooksError;

const KEY_ACCESS_TOKEN: &str = "ACCESS_TOKEN";
const KEY_REFRESH_TOKEN: &str = "REFRESH_TOKEN";
const KEY_EXPIRES_AT: &str = "TOKEN_EXPIRES_AT";

/// Durable storage for the current credential.
///
/// `save` must be failure-atomic: after a failed save the store's durable
/// content equals its content before the call.
pub trait CredentialStore: Send {
    fn load(&self) -> Result<Option<Credential>, FbooksError>;
    fn save(&mut self, credential: &Credential) -> Result<(), FbooksError>;
}

/// Default location of the credentials file.
///
/// `FBOOKS_CREDENTIALS` overrides the path, which tests rely on.
pub fn credentials_path() -> PathBuf {
    if let Ok(path) = std::env::var("FBOOKS_CREDENTIALS") {
        return PathBuf::from(path);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".fbooks")
        .join("credentials")
}

/// Key-value text file store (`KEY=value`, one per line).
///
/// Writes go through a backup/restore protocol: the current file is copied
/// aside before being overwritten, restored if the write fails, and the
/// backup discarded once the write lands. Either the old pair or the new
/// pair is on disk at every point, never a torn mix.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn backup_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".backup");
        self.path.with_file_name(name)
    }

    fn persist_failure(&self, source: std::io::Error) -> FbooksError {
        FbooksError::PersistFailure {
            path: self.path.clone(),
            source,
        }
    }
}

impl CredentialStore for FileStore {
    fn load(&self) -> Result<Option<Credential>, FbooksError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let entries = parse_entries(&content);
        let Some(access_token) = entries.get(KEY_ACCESS_TOKEN) else {
            return Ok(None);
        };

        Ok(Some(Credential {
            access_token: access_token.clone(),
            refresh_token: entries.get(KEY_REFRESH_TOKEN).cloned(),
            expires_at: entries.get(KEY_EXPIRES_AT).and_then(|s| parse_epoch(s)),
        }))
    }

    fn save(&mut self, credential: &Credential) -> Result<(), FbooksError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.persist_failure(e))?;
        }

        let backup = self.backup_path();
        let had_previous = self.path.exists();
        if had_previous {
            std::fs::copy(&self.path, &backup).map_err(|e| self.persist_failure(e))?;
        }

        match std::fs::write(&self.path, render_entries(credential)) {
            Ok(()) => {
                if had_previous {
                    let _ = std::fs::remove_file(&backup);
                }
                Ok(())
            }
            Err(e) => {
                if had_previous {
                    // Best effort: put the old pair back before surfacing the error.
                    let _ = std::fs::copy(&backup, &self.path);
                    let _ = std::fs::remove_file(&backup);
                }
                Err(self.persist_failure(e))
            }
        }
    }
}

/// In-memory store for tests.
#[derive(Default)]
pub struct MemoryStore {
    credential: Option<Credential>,
}

impl MemoryStore {
    pub fn new(credential: Option<Credential>) -> Self {
        Self { credential }
    }
}

impl CredentialStore for MemoryStore {
    fn load(&self) -> Result<Option<Credential>, FbooksError> {
        Ok(self.credential.clone())
    }

    fn save(&mut self, credential: &Credential) -> Result<(), FbooksError> {
        self.credential = Some(credential.clone());
        Ok(())
    }
}

fn parse_entries(content: &str) -> HashMap<String, String> {
    let mut entries = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            entries.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    entries
}

fn render_entries(credential: &Credential) -> String {
    let mut out = String::new();
    out.push_str(&format!("{KEY_ACCESS_TOKEN}={}\n", credential.access_token));
    if let Some(ref refresh) = credential.refresh_token {
        out.push_str(&format!("{KEY_REFRESH_TOKEN}={refresh}\n"));
    }
    if let Some(expires_at) = credential.expires_at {
        out.push_str(&format!("{KEY_EXPIRES_AT}={}\n", render_epoch(expires_at)));
    }
    out
}

/// Parse a string-encoded epoch float. Malformed input yields `None`, which
/// the expiry check treats as "already expired".
fn parse_epoch(s: &str) -> Option<DateTime<Utc>> {
    let secs = s.trim().parse::<f64>().ok()?;
    if !secs.is_finite() || secs < 0.0 {
        return None;
    }
    DateTime::from_timestamp(secs.trunc() as i64, (secs.fract() * 1e9) as u32)
}

fn render_epoch(dt: DateTime<Utc>) -> String {
    format!("{:.6}", dt.timestamp_millis() as f64 / 1000.0)
}
