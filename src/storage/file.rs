use super::{validate_key, KeyValueStore};
use crate::constants::{STORE_FILE_EXTENSION, STORE_LOCK_FILE};
use crate::errors::StorageError;
use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;
use tracing::debug;

/// Key-value store keeping one JSON document per key in a directory.
///
/// Each key maps to `<dir>/<key>.json`. Writes go to a temporary file in the
/// same directory which is then renamed over the target, so a failed write
/// never leaves a truncated document behind. Writers from this process queue
/// on an in-process mutex shared by all clones, then take an advisory lock on
/// `<dir>/.nova.lock` for the duration of the write. `StorageError::Locked`
/// therefore only reports a writer in another process.
///
/// # Examples
///
/// ```no_run
/// use nova::storage::{FileStore, KeyValueStore};
///
/// let store = FileStore::new("/home/me/.nova");
/// store.set("novaSurveyCompleted", "true")?;
/// assert_eq!(store.get("novaSurveyCompleted")?.as_deref(), Some("true"));
/// # Ok::<(), nova::errors::StorageError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Directory holding the stored documents.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", key, STORE_FILE_EXTENSION))
    }

    /// Creates the data directory with owner-only permissions if it is missing.
    fn ensure_dir(&self, key: &str) -> Result<(), StorageError> {
        if self.dir.exists() {
            return Ok(());
        }

        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Unwritable {
            key: key.to_string(),
            source,
        })?;

        #[cfg(unix)]
        {
            let permissions =
                fs::Permissions::from_mode(crate::constants::DEFAULT_DIR_PERMISSIONS);
            fs::set_permissions(&self.dir, permissions).map_err(|source| {
                StorageError::Unwritable {
                    key: key.to_string(),
                    source,
                }
            })?;
            debug!("Set 0o700 permissions on data directory");
        }

        Ok(())
    }

    fn write_atomically(&self, key: &str, value: &str) -> io::Result<()> {
        let mut temp = NamedTempFile::new_in(&self.dir)?;
        temp.write_all(value.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(self.path_for(key)).map_err(|e| e.error)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;

        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Unreadable {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.ensure_dir(key)?;

        let lock_path = self.dir.join(STORE_LOCK_FILE);
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|source| StorageError::Unwritable {
                key: key.to_string(),
                source,
            })?;

        lock_file
            .try_lock_exclusive()
            .map_err(|_| StorageError::Locked {
                path: lock_path.clone(),
            })?;

        let result = self.write_atomically(key, value);
        let _ = FileExt::unlock(&lock_file);
        result.map_err(|source| StorageError::Unwritable {
            key: key.to_string(),
            source,
        })?;

        debug!(bytes = value.len(), "Wrote '{}' to data directory", key);
        Ok(())
    }
}
