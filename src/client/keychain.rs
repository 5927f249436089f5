//! Secret storage keyed by `(service, account)`.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CredentialStoreError {
    #[error("invalid key component {0:?}")]
    InvalidKey(String),

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Capability for keeping small secrets. `save` replaces any existing value;
/// `delete` of a missing entry is not an error.
pub trait CredentialStore: Send + Sync {
    fn save(&self, service: &str, account: &str, data: &[u8]) -> Result<(), CredentialStoreError>;

    fn load(&self, service: &str, account: &str) -> Result<Option<Vec<u8>>, CredentialStoreError>;

    fn delete(&self, service: &str, account: &str) -> Result<(), CredentialStoreError>;
}

/// Process-local store. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryCredentialStore {
    entries: Mutex<HashMap<(String, String), Vec<u8>>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn save(&self, service: &str, account: &str, data: &[u8]) -> Result<(), CredentialStoreError> {
        let mut entries = self.entries.lock().map_err(|_| CredentialStoreError::Poisoned)?;
        entries.insert((service.to_string(), account.to_string()), data.to_vec());
        Ok(())
    }

    fn load(&self, service: &str, account: &str) -> Result<Option<Vec<u8>>, CredentialStoreError> {
        let entries = self.entries.lock().map_err(|_| CredentialStoreError::Poisoned)?;
        Ok(entries
            .get(&(service.to_string(), account.to_string()))
            .cloned())
    }

    fn delete(&self, service: &str, account: &str) -> Result<(), CredentialStoreError> {
        let mut entries = self.entries.lock().map_err(|_| CredentialStoreError::Poisoned)?;
        entries.remove(&(service.to_string(), account.to_string()));
        Ok(())
    }
}

/// One file per entry at `<root>/<service>/<account>`, readable only by the
/// owner on unix.
pub struct FileCredentialStore {
    root: PathBuf,
}

impl FileCredentialStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn entry_path(&self, service: &str, account: &str) -> Result<PathBuf, CredentialStoreError> {
        Ok(self
            .root
            .join(check_component(service)?)
            .join(check_component(account)?))
    }
}

fn check_component(component: &str) -> Result<&str, CredentialStoreError> {
    let valid = !component.is_empty()
        && component != "."
        && component != ".."
        && !component.contains(['/', '\\', '\0']);
    if valid {
        Ok(component)
    } else {
        Err(CredentialStoreError::InvalidKey(component.to_string()))
    }
}

#[cfg(unix)]
fn write_private(path: &Path, data: &[u8]) -> io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(data)
}

#[cfg(not(unix))]
fn write_private(path: &Path, data: &[u8]) -> io::Result<()> {
    fs::write(path, data)
}

impl CredentialStore for FileCredentialStore {
    fn save(&self, service: &str, account: &str, data: &[u8]) -> Result<(), CredentialStoreError> {
        let path = self.entry_path(service, account)?;
        let dir = self.root.join(service);
        fs::create_dir_all(&dir)?;

        // The old entry survives until the new one is fully written
        let staging = dir.join(format!(".{account}.tmp"));
        if let Err(e) = write_private(&staging, data) {
            let _ = fs::remove_file(&staging);
            return Err(e.into());
        }
        fs::rename(&staging, &path)?;
        Ok(())
    }

    fn load(&self, service: &str, account: &str) -> Result<Option<Vec<u8>>, CredentialStoreError> {
        let path = self.entry_path(service, account)?;
        match fs::read(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&self, service: &str, account: &str) -> Result<(), CredentialStoreError> {
        let path = self.entry_path(service, account)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
