//! Durable per-session storage.
//!
//! Each session lives in one JSON file, `<storage-key>.json`, holding the full ordered
//! thought list. Writes replace the whole file via a uniquely named `.tmp` sibling and
//! a rename, so a save either lands in full or the previous content stays visible, even
//! when two saves to the same session overlap. There is no
//! index or manifest: enumeration lists the directory.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{SessionError, SessionResult};
use crate::session::naming::{self, SessionNamer};
use crate::session::types::Thought;

const SESSION_EXT: &str = "json";
const TEMP_EXT: &str = "tmp";

/// Filesystem metadata for one session file.
#[derive(Debug, Clone, Serialize)]
pub struct StorageStats {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_at: Option<DateTime<Utc>>,
}

impl StorageStats {
    fn missing() -> Self {
        Self {
            exists: false,
            created_at: None,
            last_modified_at: None,
        }
    }
}

/// Owns the sessions directory. Every name-based call validates the logical name
/// before touching the filesystem.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
    namer: SessionNamer,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>, namer: SessionNamer) -> Self {
        Self {
            dir: dir.into(),
            namer,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn namer(&self) -> &SessionNamer {
        &self.namer
    }

    /// Path of the session file for a logical name.
    pub fn path_for(&self, name: &str) -> SessionResult<PathBuf> {
        let name = self.namer.validate(name)?;
        Ok(self.path_for_key(&naming::encode(name)))
    }

    pub fn path_for_key(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{SESSION_EXT}"))
    }

    /// Fresh staging path for one save of `key`. Never collides with another writer.
    fn temp_path_for_key(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!(".{key}.{}.{TEMP_EXT}", uuid::Uuid::new_v4().simple()))
    }

    /// Load a session's thoughts. A missing file is an empty session, not an error.
    pub async fn load(&self, name: &str) -> SessionResult<Vec<Thought>> {
        let path = self.path_for(name)?;
        read_thoughts(&path).await
    }

    /// Load by storage key, as returned from [`SessionStore::list`].
    pub async fn load_key(&self, key: &str) -> SessionResult<Vec<Thought>> {
        read_thoughts(&self.path_for_key(key)).await
    }

    /// Replace the persisted thought list for `name`.
    pub async fn save(&self, name: &str, thoughts: &[Thought]) -> SessionResult<()> {
        let key = naming::encode(self.namer.validate(name)?);
        let path = self.path_for_key(&key);

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| SessionError::io(&self.dir, e))?;

        let bytes = serde_json::to_vec_pretty(thoughts).map_err(|source| {
            SessionError::Corrupt {
                path: path.clone(),
                source,
            }
        })?;

        let tmp_path = self.temp_path_for_key(&key);
        if let Err(e) = tokio::fs::write(&tmp_path, &bytes).await {
            discard_temp(&tmp_path).await;
            return Err(SessionError::io(&tmp_path, e));
        }
        if let Err(e) = tokio::fs::rename(&tmp_path, &path).await {
            discard_temp(&tmp_path).await;
            return Err(SessionError::io(&path, e));
        }

        tracing::debug!(session = %name, thoughts = thoughts.len(), "session saved");
        Ok(())
    }

    /// Storage keys of every persisted session, sorted.
    pub async fn list(&self) -> SessionResult<Vec<String>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SessionError::io(&self.dir, e)),
        };

        let mut keys = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| SessionError::io(&self.dir, e))?
        {
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            // Staging files are dot-prefixed.
            if file_name.starts_with('.') {
                continue;
            }
            if let Some(key) = file_name.strip_suffix(".json") {
                keys.push(key.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }

    /// Delete a session file. Absence is `NotFound`.
    pub async fn remove(&self, name: &str) -> SessionResult<()> {
        let path = self.path_for(name)?;
        remove_file(&path, name).await
    }

    pub async fn remove_key(&self, key: &str) -> SessionResult<()> {
        remove_file(&self.path_for_key(key), &naming::decode(key)).await
    }

    /// Move a session to a new name: write under `new_name`, then delete `old_name`.
    ///
    /// Not atomic: if the delete fails after the write, the old file remains as an
    /// orphan copy and the error is returned.
    pub async fn rename(&self, old_name: &str, new_name: &str) -> SessionResult<usize> {
        let old_path = self.path_for(old_name)?;
        let new_path = self.path_for(new_name)?;

        let thoughts = read_thoughts(&old_path).await?;
        if thoughts.is_empty() {
            return Err(SessionError::session_not_found(old_name));
        }
        if old_path == new_path {
            return Err(SessionError::invalid_argument(
                "new_session_name",
                "new name maps to the same session",
            ));
        }
        if self.statistics(new_name).await?.exists {
            return Err(SessionError::invalid_argument(
                "new_session_name",
                format!("session already exists: {new_name}"),
            ));
        }

        self.save(new_name, &thoughts).await?;
        if let Err(e) = remove_file(&old_path, old_name).await {
            tracing::warn!(
                old = %old_name,
                new = %new_name,
                error = %e,
                "renamed session written but old copy could not be removed"
            );
            return Err(e);
        }

        Ok(thoughts.len())
    }

    /// Existence and timestamps from file metadata, without parsing content.
    pub async fn statistics(&self, name: &str) -> SessionResult<StorageStats> {
        let path = self.path_for(name)?;
        file_stats(&path).await
    }

    pub async fn statistics_key(&self, key: &str) -> SessionResult<StorageStats> {
        file_stats(&self.path_for_key(key)).await
    }
}

async fn read_thoughts(path: &Path) -> SessionResult<Vec<Thought>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| SessionError::Corrupt {
            path: path.to_path_buf(),
            source,
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(SessionError::io(path, e)),
    }
}

async fn discard_temp(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %e, "could not remove temp file");
        }
    }
}

async fn remove_file(path: &Path, name: &str) -> SessionResult<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(SessionError::session_not_found(name)),
        Err(e) => Err(SessionError::io(path, e)),
    }
}

async fn file_stats(path: &Path) -> SessionResult<StorageStats> {
    let meta = match tokio::fs::metadata(path).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StorageStats::missing()),
        Err(e) => return Err(SessionError::io(path, e)),
    };

    let modified = meta.modified().map_err(|e| SessionError::io(path, e))?;
    // Birth time is unavailable on some filesystems.
    let created = meta.created().unwrap_or(modified);

    Ok(StorageStats {
        exists: true,
        created_at: Some(DateTime::<Utc>::from(created)),
        last_modified_at: Some(DateTime::<Utc>::from(modified)),
    })
}
