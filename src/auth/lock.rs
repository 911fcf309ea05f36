use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Advisory cross-process lock guarding the refresh+persist critical section.
///
/// Two processes refreshing concurrently race to submit the same single-use
/// refresh token; only one exchange can succeed and the loser may persist a
/// stale pair. Holding this lock from before the token is submitted until
/// the new pair is durable closes that window on a single machine.
pub struct RefreshLock {
    inner: fd_lock::RwLock<File>,
}

impl RefreshLock {
    /// Lock file conventionally lives next to the credentials file.
    pub fn lock_path(credentials_path: &Path) -> PathBuf {
        let mut name = credentials_path
            .file_name()
            .unwrap_or_default()
            .to_os_string();
        name.push(".lock");
        credentials_path.with_file_name(name)
    }

    pub fn new(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)?;
        Ok(Self {
            inner: fd_lock::RwLock::new(file),
        })
    }

    /// Block until the lock is held. The guard releases on drop.
    pub fn acquire(&mut self) -> io::Result<fd_lock::RwLockWriteGuard<'_, File>> {
        self.inner.write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_path_next_to_credentials() {
        let path = RefreshLock::lock_path(Path::new("/home/user/.fbooks/credentials"));
        assert_eq!(path, PathBuf::from("/home/user/.fbooks/credentials.lock"));
    }

    #[test]
    fn acquire_and_release() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.lock");
        let mut lock = RefreshLock::new(&path).unwrap();
        {
            let _guard = lock.acquire().unwrap();
        }
        // Reacquire after release works.
        let _guard = lock.acquire().unwrap();
    }
}
