use std::fs;
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::tempdir;

use nova::errors::{AppError, StorageError};
use nova::journal::{EntryDate, EntryStore, JournalEntry};
use nova::onboarding::{OnboardingStore, SurveyResponses};
use nova::storage::{FileStore, KeyValueStore};

fn file_backend(dir: &std::path::Path) -> Arc<dyn KeyValueStore> {
    Arc::new(FileStore::new(dir))
}

fn entry(text: &str) -> JournalEntry {
    JournalEntry {
        free_journal: text.to_string(),
        ..JournalEntry::default()
    }
}

#[test]
fn test_entries_persist_across_store_instances() {
    let temp_dir = tempdir().unwrap();
    let date = EntryDate::parse("2024-01-15").unwrap();

    EntryStore::new(file_backend(temp_dir.path()))
        .save_entry(&date, &entry("First day back at work"))
        .unwrap();

    let reopened = EntryStore::new(file_backend(temp_dir.path()));
    assert_eq!(reopened.load_entry(&date), entry("First day back at work"));
    assert_eq!(reopened.entry_dates(), vec![date]);
}

#[test]
fn test_data_dir_created_on_first_save() {
    let temp_dir = tempdir().unwrap();
    let data_dir = temp_dir.path().join("nested").join("nova");
    let store = EntryStore::new(file_backend(&data_dir));
    let date = EntryDate::parse("2024-01-15").unwrap();

    // Reading from a directory that does not exist yet is not an error.
    assert_eq!(store.load_entry(&date), JournalEntry::default());
    assert!(!data_dir.exists());

    store.save_entry(&date, &entry("Hello")).unwrap();

    assert!(data_dir.join("novaJournalEntries.json").exists());
}

#[test]
fn test_malformed_file_is_preserved() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("novaJournalEntries.json");
    fs::write(&path, "{\"2024-01-15\": {\"freeJournal\": ").unwrap();

    let store = EntryStore::new(file_backend(temp_dir.path()));
    let date = EntryDate::parse("2024-01-15").unwrap();

    assert_eq!(store.load_entry(&date), JournalEntry::default());
    assert!(store.entry_dates().is_empty());

    match store.save_entry(&date, &entry("Overwrite attempt")) {
        Err(AppError::Storage(StorageError::Malformed { key, .. })) => {
            assert_eq!(key, "novaJournalEntries")
        }
        other => panic!("Expected Malformed error, got {:?}", other),
    }
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "{\"2024-01-15\": {\"freeJournal\": "
    );
}

#[test]
fn test_concurrent_saves_through_file_store() {
    let temp_dir = tempdir().unwrap();
    let store = Arc::new(EntryStore::new(file_backend(temp_dir.path())));

    let handles: Vec<_> = (1..=10)
        .map(|day| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let date = EntryDate::parse(&format!("2024-03-{:02}", day)).unwrap();
                store
                    .save_entry(&date, &entry(&format!("Day {}", day)))
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let reopened = EntryStore::new(file_backend(temp_dir.path()));
    let dates = reopened.entry_dates();
    assert_eq!(dates.len(), 10);
    for (i, date) in dates.iter().enumerate() {
        assert_eq!(reopened.load_entry(date), entry(&format!("Day {}", i + 1)));
    }
}

fn completed_survey() -> SurveyResponses {
    SurveyResponses {
        vision_lifelong: "Be present".to_string(),
        routine_weekday: "Code, cook, read".to_string(),
        doing_well: "Exercise".to_string(),
        struggling_with: "Sleep".to_string(),
        ..SurveyResponses::default()
    }
}

#[test]
fn test_entry_saves_alongside_survey_submits() {
    let temp_dir = tempdir().unwrap();
    let backend = file_backend(temp_dir.path());
    let journal = Arc::new(EntryStore::new(Arc::clone(&backend)));
    let onboarding = Arc::new(OnboardingStore::new(Arc::clone(&backend)));

    for round in 1..=50 {
        let barrier = Arc::new(Barrier::new(2));

        let saver = {
            let journal = Arc::clone(&journal);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let date = EntryDate::parse("2024-01-15").unwrap();
                barrier.wait();
                journal.save_entry(&date, &entry(&format!("Round {}", round)))
            })
        };
        let submitter = {
            let onboarding = Arc::clone(&onboarding);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                onboarding.submit(&completed_survey())
            })
        };

        if let Err(e) = saver.join().unwrap() {
            panic!("Entry save failed in round {}: {}", round, e);
        }
        if let Err(e) = submitter.join().unwrap() {
            panic!("Survey submit failed in round {}: {}", round, e);
        }
    }

    let date = EntryDate::parse("2024-01-15").unwrap();
    assert_eq!(journal.load_entry(&date), entry("Round 50"));
    assert!(onboarding.is_completed());
}

#[test]
fn test_journal_and_survey_share_backend() {
    let temp_dir = tempdir().unwrap();
    let backend = file_backend(temp_dir.path());
    let journal = EntryStore::new(Arc::clone(&backend));
    let onboarding = OnboardingStore::new(Arc::clone(&backend));

    let survey = completed_survey();
    onboarding.submit(&survey).unwrap();
    journal
        .save_entry(&EntryDate::parse("2024-01-15").unwrap(), &entry("Survey done"))
        .unwrap();

    let reopened = OnboardingStore::new(file_backend(temp_dir.path()));
    assert!(reopened.is_completed());
    assert_eq!(reopened.load(), survey);
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("novaSurveyCompleted.json")).unwrap(),
        "true"
    );
}
