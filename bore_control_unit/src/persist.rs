//! State persistence across host restarts.
//!
//! Only the state tag is stored, as plain text. A missing, unreadable or
//! unparseable record means "no prior state".

use std::fs;
use std::path::{Path, PathBuf};

use bore_common::rig::state::RigState;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to read state from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write state to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Host storage for the persisted state tag.
pub trait StateStore {
    /// Stored tag, `None` when nothing was saved.
    fn load(&mut self) -> Result<Option<String>, PersistError>;
    fn save(&mut self, tag: &str) -> Result<(), PersistError>;
}

/// Tag stored in a single text file.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl StateStore for FileStateStore {
    fn load(&mut self) -> Result<Option<String>, PersistError> {
        if !self.path.exists() {
            debug!(path = ?self.path, "State file does not exist, starting fresh");
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).map_err(|source| PersistError::Read {
            path: self.path.clone(),
            source,
        })?;
        let tag = content.trim();
        Ok((!tag.is_empty()).then(|| tag.to_string()))
    }

    fn save(&mut self, tag: &str) -> Result<(), PersistError> {
        let write_err = |source| PersistError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(&self.path, tag).map_err(write_err)?;
        debug!(path = ?self.path, tag, "State saved");
        Ok(())
    }
}

/// In-process store, for hosts without durable storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    tag: Option<String>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tag(tag: &str) -> Self {
        Self {
            tag: Some(tag.to_string()),
        }
    }
}

impl StateStore for MemoryStateStore {
    fn load(&mut self) -> Result<Option<String>, PersistError> {
        Ok(self.tag.clone())
    }

    fn save(&mut self, tag: &str) -> Result<(), PersistError> {
        self.tag = Some(tag.to_string());
        Ok(())
    }
}

/// Load and parse the persisted state. Every failure collapses to `None`.
pub fn restore_state(store: &mut dyn StateStore) -> Option<RigState> {
    let tag = match store.load() {
        Ok(Some(tag)) => tag,
        Ok(None) => return None,
        Err(e) => {
            warn!(error = %e, "Could not load persisted state, starting fresh");
            return None;
        }
    };
    match RigState::from_tag(&tag) {
        Ok(state) => {
            info!(%state, "Restored persisted state");
            Some(state)
        }
        Err(e) => {
            warn!(error = %e, "Ignoring persisted state");
            None
        }
    }
}

/// Store the state tag, logging failures.
pub fn persist_state(store: &mut dyn StateStore, state: RigState) -> bool {
    match store.save(state.tag()) {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Could not persist state");
            false
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStateStore::new(dir.path().join("nested").join("bore_state"));

        assert_eq!(store.load().unwrap(), None);
        assert!(persist_state(&mut store, RigState::ResetLifting));
        assert_eq!(store.load().unwrap().as_deref(), Some("reset_lifting"));
        assert_eq!(restore_state(&mut store), Some(RigState::ResetLifting));
    }

    #[test]
    fn unknown_or_empty_tag_is_no_state() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bore_state");

        fs::write(&path, "digging sideways").unwrap();
        assert_eq!(restore_state(&mut FileStateStore::new(&path)), None);

        fs::write(&path, "  \n").unwrap();
        assert_eq!(restore_state(&mut FileStateStore::new(&path)), None);

        fs::write(&path, "paused\n").unwrap();
        assert_eq!(restore_state(&mut FileStateStore::new(&path)), Some(RigState::Paused));
    }

    #[test]
    fn unreadable_store_is_no_state() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be read as a file.
        let mut store = FileStateStore::new(dir.path());
        assert!(store.load().is_err());
        assert_eq!(restore_state(&mut store), None);
        assert!(!persist_state(&mut store, RigState::Stopped));
    }

    #[test]
    fn memory_store() {
        let mut store = MemoryStateStore::with_tag("movingdown");
        assert_eq!(restore_state(&mut store), Some(RigState::MovingDown));
        persist_state(&mut store, RigState::Stopped);
        assert_eq!(store.load().unwrap().as_deref(), Some("stopped"));
        assert_eq!(restore_state(&mut MemoryStateStore::new()), None);
    }
}
