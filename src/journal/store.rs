use super::{EntryDate, JournalEntry};
use crate::constants::JOURNAL_ENTRIES_KEY;
use crate::errors::{AppResult, StorageError, ValidationError};
use crate::storage::KeyValueStore;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// The persisted mapping from canonical date key to entry.
type EntryMap = BTreeMap<String, JournalEntry>;

/// Durable, keyed storage of the current user's journal entries.
///
/// All entries live in one JSON document under [`JOURNAL_ENTRIES_KEY`]. Every
/// save reads the whole document, replaces one entry and writes the document
/// back; saves within a process are serialized so two of them never
/// interleave.
///
/// # Examples
///
/// ```
/// use nova::journal::{EntryDate, EntryStore, JournalEntry};
/// use nova::storage::MemoryStore;
/// use std::sync::Arc;
///
/// let store = EntryStore::new(Arc::new(MemoryStore::new()));
/// let date: EntryDate = "2025-04-21".parse()?;
///
/// let mut entry = store.load_entry(&date);
/// entry.free_journal = "A quiet, good day.".to_string();
/// store.save_entry(&date, &entry)?;
///
/// assert_eq!(store.load_entry(&date), entry);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct EntryStore {
    backend: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl EntryStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    fn read_all(&self) -> Result<EntryMap, StorageError> {
        let Some(raw) = self.backend.get(JOURNAL_ENTRIES_KEY)? else {
            return Ok(EntryMap::new());
        };

        serde_json::from_str(&raw).map_err(|source| StorageError::Malformed {
            key: JOURNAL_ENTRIES_KEY.to_string(),
            source,
        })
    }

    /// Returns the entry for `date`, or an all-empty entry if none is stored.
    ///
    /// # Errors
    ///
    /// Returns a read-class `StorageError` if the backend is unreadable or the
    /// stored document is not valid JSON.
    pub fn try_load_entry(&self, date: &EntryDate) -> Result<JournalEntry, StorageError> {
        let mut entries = self.read_all()?;
        Ok(entries.remove(&date.key()).unwrap_or_default())
    }

    /// Returns the entry for `date`, or an all-empty entry if none is stored.
    ///
    /// Read failures are logged and answered with the empty entry so that
    /// writing a new entry is never blocked by a storage problem.
    pub fn load_entry(&self, date: &EntryDate) -> JournalEntry {
        match self.try_load_entry(date) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(date = %date, "Error loading journal data: {}", e);
                JournalEntry::default()
            }
        }
    }

    /// Persists `entry` under `date`, replacing any previous entry for that date.
    ///
    /// # Errors
    ///
    /// - `ValidationError::EmptyEntry` when the free journal and both emotion
    ///   fields are blank; nothing is written.
    /// - A read-class `StorageError` when the existing document cannot be read
    ///   or parsed; it is not overwritten.
    /// - A write-class `StorageError` when the backend rejects the write; the
    ///   previously stored document is left as it was.
    pub fn save_entry(&self, date: &EntryDate, entry: &JournalEntry) -> AppResult<()> {
        if entry.is_empty() {
            debug!(date = %date, "Rejected empty journal entry");
            return Err(ValidationError::EmptyEntry.into());
        }

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut entries = self.read_all()?;
        entries.insert(date.key(), entry.clone());

        let serialized =
            serde_json::to_string(&entries).map_err(|source| StorageError::Encode {
                key: JOURNAL_ENTRIES_KEY.to_string(),
                source,
            })?;
        self.backend.set(JOURNAL_ENTRIES_KEY, &serialized)?;

        info!(date = %date, total_entries = entries.len(), "Saved journal entry");
        Ok(())
    }

    /// Dates that have a stored entry, oldest first.
    ///
    /// Keys that are not canonical dates are skipped. Read failures are logged
    /// and yield an empty list.
    pub fn entry_dates(&self) -> Vec<EntryDate> {
        let entries = match self.read_all() {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Error listing journal entries: {}", e);
                return Vec::new();
            }
        };

        entries
            .keys()
            .filter_map(|key| match EntryDate::parse(key) {
                Ok(date) => Some(date),
                Err(_) => {
                    debug!("Skipping non-date key in journal data: {}", key);
                    None
                }
            })
            .collect()
    }
}
