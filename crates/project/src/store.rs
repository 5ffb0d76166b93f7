use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::snapshot::SolutionSnapshot;

/// Persists [`SolutionSnapshot`]s as pretty JSON using atomic writes.
/// 以 JSON 搭配原子寫入方式儲存方案快照。
#[derive(Debug)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<SolutionSnapshot, SnapshotStoreError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| SnapshotStoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| SnapshotStoreError::Invalid {
            path: self.path.clone(),
            source,
        })
    }

    pub fn save(&self, snapshot: &SolutionSnapshot) -> Result<(), SnapshotStoreError> {
        let payload =
            serde_json::to_vec_pretty(snapshot).map_err(|source| SnapshotStoreError::Invalid {
                path: self.path.clone(),
                source,
            })?;
        write_atomic(&self.path, &payload).map_err(|source| SnapshotStoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Errors emitted by [`SnapshotStore`].
/// [`SnapshotStore`] 可能拋出的錯誤。
#[derive(Debug, Error)]
pub enum SnapshotStoreError {
    #[error("solution snapshot IO error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid solution snapshot {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, data)?;
    fs::rename(&tmp_path, path)
}
