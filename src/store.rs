// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Modalist-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Modalist and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Favorites and recent directories, behind an injected interface.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const MAX_RECENTS: usize = 50;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid directory store {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read and toggle access used by the working-directory picker.
pub trait DirectoryStore: fmt::Debug {
    /// Most recent first.
    fn recent_dirs(&self) -> Vec<PathBuf>;

    fn favorite_dirs(&self) -> Vec<PathBuf>;

    /// Returns whether `path` is a favorite after the toggle.
    fn toggle_favorite(&self, path: &Path) -> Result<bool, StoreError>;

    fn record_recent(&self, path: &Path) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryState {
    pub favorites: Vec<PathBuf>,
    pub recents: Vec<PathBuf>,
}

impl DirectoryState {
    fn toggle_favorite(&mut self, path: &Path) -> bool {
        if let Some(pos) = self.favorites.iter().position(|p| p == path) {
            self.favorites.remove(pos);
            false
        } else {
            self.favorites.push(path.to_owned());
            self.favorites.sort();
            true
        }
    }

    fn record_recent(&mut self, path: &Path) {
        self.recents.retain(|p| p != path);
        self.recents.insert(0, path.to_owned());
        self.recents.truncate(MAX_RECENTS);
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<DirectoryState>,
}

impl MemoryStore {
    pub fn new(state: DirectoryState) -> Self {
        Self { state: Mutex::new(state) }
    }

    pub fn snapshot(&self) -> DirectoryState {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl DirectoryStore for MemoryStore {
    fn recent_dirs(&self) -> Vec<PathBuf> {
        self.snapshot().recents
    }

    fn favorite_dirs(&self) -> Vec<PathBuf> {
        self.snapshot().favorites
    }

    fn toggle_favorite(&self, path: &Path) -> Result<bool, StoreError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(state.toggle_favorite(path))
    }

    fn record_recent(&self, path: &Path) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.record_recent(path);
        Ok(())
    }
}

/// JSON file persisted after every mutation. A missing file reads as empty.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    state: Mutex<DirectoryState>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let state = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|source| StoreError::Json { path: path.clone(), source })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => DirectoryState::default(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        debug!(path = %path.display(), "opened directory store");
        Ok(Self { path, state: Mutex::new(state) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, state: &DirectoryState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|source| StoreError::Io { path: parent.to_owned(), source })?;
        }
        let json = serde_json::to_string_pretty(state)
            .map_err(|source| StoreError::Json { path: self.path.clone(), source })?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|source| StoreError::Io { path: tmp.clone(), source })?;
        fs::rename(&tmp, &self.path)
            .map_err(|source| StoreError::Io { path: self.path.clone(), source })?;
        Ok(())
    }

    fn mutate<R>(&self, apply: impl FnOnce(&mut DirectoryState) -> R) -> Result<R, StoreError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let before = state.clone();
        let out = apply(&mut state);
        if let Err(err) = self.persist(&state) {
            warn!(path = %self.path.display(), error = %err, "directory store write failed");
            *state = before;
            return Err(err);
        }
        Ok(out)
    }
}

impl DirectoryStore for JsonFileStore {
    fn recent_dirs(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).recents.clone()
    }

    fn favorite_dirs(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).favorites.clone()
    }

    fn toggle_favorite(&self, path: &Path) -> Result<bool, StoreError> {
        self.mutate(|state| state.toggle_favorite(path))
    }

    fn record_recent(&self, path: &Path) -> Result<(), StoreError> {
        self.mutate(|state| state.record_recent(path))
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    use super::{DirectoryState, DirectoryStore, JsonFileStore, MemoryStore, StoreError};

    #[fixture]
    fn tmp() -> TempDir {
        tempfile::tempdir().unwrap()
    }

    #[test]
    fn toggle_reports_new_membership() {
        let store = MemoryStore::default();
        assert!(store.toggle_favorite(Path::new("/b")).unwrap());
        assert!(store.toggle_favorite(Path::new("/a")).unwrap());
        assert_eq!(store.favorite_dirs(), vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        assert!(!store.toggle_favorite(Path::new("/b")).unwrap());
        assert_eq!(store.favorite_dirs(), vec![PathBuf::from("/a")]);
    }

    #[test]
    fn recents_move_to_front_without_duplicates() {
        let store = MemoryStore::new(DirectoryState::default());
        store.record_recent(Path::new("/a")).unwrap();
        store.record_recent(Path::new("/b")).unwrap();
        store.record_recent(Path::new("/a")).unwrap();
        assert_eq!(store.recent_dirs(), vec![PathBuf::from("/a"), PathBuf::from("/b")]);
    }

    #[rstest]
    fn json_store_round_trips_through_disk(tmp: TempDir) {
        let path = tmp.path().join("nested").join("dirs.json");
        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.favorite_dirs().is_empty());

        store.toggle_favorite(Path::new("/work")).unwrap();
        store.record_recent(Path::new("/tmp")).unwrap();
        assert!(path.is_file());

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.favorite_dirs(), vec![PathBuf::from("/work")]);
        assert_eq!(reopened.recent_dirs(), vec![PathBuf::from("/tmp")]);
    }

    #[rstest]
    fn json_store_rejects_corrupt_file(tmp: TempDir) {
        let path = tmp.path().join("dirs.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(JsonFileStore::open(&path), Err(StoreError::Json { .. })));
    }
}
