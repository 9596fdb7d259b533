/*!
# Nova

Nova is a guided journaling companion. It keeps one structured entry per day,
offers a short reflection conversation with an assistant, and records the
answers to a one-time onboarding survey.

## Core Features

- Load and save the journal entry for any date, one entry per date
- Reflection chats whose replies are generated in the background and appended
  in request order
- Pluggable reply generators: canned prompts or a local Ollama model
- Onboarding survey with a completion flag

## Architecture

- `storage`: Key-value persistence backends (in-memory and on-disk)
- `journal`: Dates, entries and the entry store
- `reflection`: Reflection sessions and reply generators
- `onboarding`: Survey persistence
- `ai`: Ollama client used as a reply generator
- `cli`: Command-line interface handling using clap
- `config`: Configuration loading and validation
- `errors`: Error handling infrastructure

## Usage Example

```rust
use nova::journal::{EntryDate, EntryStore, JournalEntry};
use nova::storage::MemoryStore;
use std::sync::Arc;

fn main() -> nova::AppResult<()> {
    let store = EntryStore::new(Arc::new(MemoryStore::new()));
    let date = EntryDate::parse("2025-03-09")?;

    let entry = JournalEntry {
        free_journal: "Went for a long walk".to_string(),
        ..JournalEntry::default()
    };
    store.save_entry(&date, &entry)?;

    assert_eq!(store.load_entry(&date), entry);
    Ok(())
}
```
*/

/// Ollama integration for reply generation
pub mod ai;
/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Application-wide constants
pub mod constants;
/// Error types and utilities for error handling
pub mod errors;
/// Journal dates, entries and the entry store
pub mod journal;
/// Onboarding survey persistence
pub mod onboarding;
/// Reflection sessions and reply generators
pub mod reflection;
/// Key-value persistence backends
pub mod storage;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use journal::{EntryDate, EntryStore, JournalEntry};
pub use reflection::{ReflectionMessage, ReflectionSession, Sender};
