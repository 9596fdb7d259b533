//! Date-keyed journal entries.
//!
//! This module contains the entry data model and the [`EntryStore`] that
//! persists entries through an injected key-value backend. Entries are keyed
//! by their canonical `YYYY-MM-DD` date; the whole mapping is stored as a
//! single JSON document and rewritten on every save.

pub mod store;


pub use store::EntryStore;

use crate::constants::{DATE_FORMAT_ISO, DISPLAY_DATE_FORMAT};
use crate::errors::DateError;
use chrono::{Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar date used as the identity of a journal entry.
///
/// Only the canonical `YYYY-MM-DD` form is accepted when parsing, so every
/// entry has exactly one key.
///
/// # Examples
///
/// ```
/// use nova::journal::EntryDate;
///
/// let date: EntryDate = "2025-04-21".parse().unwrap();
/// assert_eq!(date.to_string(), "2025-04-21");
/// assert_eq!(date.display_string(), "April 21, 2025");
///
/// assert!("2025-4-21".parse::<EntryDate>().is_err());
/// assert!("20250421".parse::<EntryDate>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryDate(NaiveDate);

impl EntryDate {
    /// Parses a canonical `YYYY-MM-DD` key.
    ///
    /// # Errors
    ///
    /// Returns `DateError::Invalid` if the input is not a real calendar date
    /// or is not written in canonical form (missing zero padding, compact
    /// form, surrounding whitespace).
    pub fn parse(input: &str) -> Result<Self, DateError> {
        let invalid = || DateError::Invalid {
            input: input.to_string(),
        };

        let date = NaiveDate::parse_from_str(input, DATE_FORMAT_ISO).map_err(|_| invalid())?;
        if date.format(DATE_FORMAT_ISO).to_string() != input {
            return Err(invalid());
        }
        Ok(Self(date))
    }

    /// Today's date in the local timezone.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    /// The canonical storage key.
    pub fn key(&self) -> String {
        self.0.format(DATE_FORMAT_ISO).to_string()
    }

    /// Long human-readable form, e.g. "April 21, 2025".
    ///
    /// The time of day is pinned to midnight before formatting so the result
    /// depends only on the date, never on the executing timezone.
    pub fn display_string(&self) -> String {
        self.0
            .and_time(NaiveTime::MIN)
            .format(DISPLAY_DATE_FORMAT)
            .to_string()
    }
}

impl From<NaiveDate> for EntryDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl FromStr for EntryDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for EntryDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT_ISO))
    }
}

/// Converts a canonical date key into its long display form.
///
/// # Errors
///
/// Returns `DateError::Invalid` for malformed input; it is never coerced to
/// another date.
///
/// # Examples
///
/// ```
/// use nova::journal::format_display_date;
///
/// assert_eq!(format_display_date("2025-04-21").unwrap(), "April 21, 2025");
/// assert!(format_display_date("April 21").is_err());
/// ```
pub fn format_display_date(date: &str) -> Result<String, DateError> {
    EntryDate::parse(date).map(|d| d.display_string())
}

/// One day's journal content.
///
/// All fields are free text and default to the empty string. The serialized
/// field names match the stored format (`freeJournal`, `positiveEmotions`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JournalEntry {
    /// Free-form answer to "How was your day?"
    pub free_journal: String,
    pub positive_emotions: String,
    pub negative_emotions: String,
    pub positive_actions: String,
    pub negative_actions: String,
    pub improve_tomorrow: String,
}

impl JournalEntry {
    /// Returns true when the free journal and both emotion fields are blank.
    ///
    /// The action and improvement fields do not count: an entry with only
    /// those filled in is still empty.
    pub fn is_empty(&self) -> bool {
        [
            &self.free_journal,
            &self.positive_emotions,
            &self.negative_emotions,
        ]
        .iter()
        .all(|field| field.trim().is_empty())
    }

    pub fn field(&self, field: EntryField) -> &str {
        match field {
            EntryField::FreeJournal => &self.free_journal,
            EntryField::PositiveEmotions => &self.positive_emotions,
            EntryField::NegativeEmotions => &self.negative_emotions,
            EntryField::PositiveActions => &self.positive_actions,
            EntryField::NegativeActions => &self.negative_actions,
            EntryField::ImproveTomorrow => &self.improve_tomorrow,
        }
    }

    pub fn set_field(&mut self, field: EntryField, value: impl Into<String>) {
        let slot = match field {
            EntryField::FreeJournal => &mut self.free_journal,
            EntryField::PositiveEmotions => &mut self.positive_emotions,
            EntryField::NegativeEmotions => &mut self.negative_emotions,
            EntryField::PositiveActions => &mut self.positive_actions,
            EntryField::NegativeActions => &mut self.negative_actions,
            EntryField::ImproveTomorrow => &mut self.improve_tomorrow,
        };
        *slot = value.into();
    }
}

/// Names one field of a [`JournalEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
    FreeJournal,
    PositiveEmotions,
    NegativeEmotions,
    PositiveActions,
    NegativeActions,
    ImproveTomorrow,
}

impl EntryField {
    /// All fields in display order.
    pub const ALL: [EntryField; 6] = [
        EntryField::FreeJournal,
        EntryField::PositiveEmotions,
        EntryField::NegativeEmotions,
        EntryField::PositiveActions,
        EntryField::NegativeActions,
        EntryField::ImproveTomorrow,
    ];

    /// Serialized field name.
    pub fn key(&self) -> &'static str {
        match self {
            EntryField::FreeJournal => "freeJournal",
            EntryField::PositiveEmotions => "positiveEmotions",
            EntryField::NegativeEmotions => "negativeEmotions",
            EntryField::PositiveActions => "positiveActions",
            EntryField::NegativeActions => "negativeActions",
            EntryField::ImproveTomorrow => "improveTomorrow",
        }
    }

    /// Prompt shown next to the field.
    pub fn label(&self) -> &'static str {
        match self {
            EntryField::FreeJournal => "How was your day?",
            EntryField::PositiveEmotions => "Positive emotions felt",
            EntryField::NegativeEmotions => "Negative emotions felt",
            EntryField::PositiveActions => "Positive actions taken",
            EntryField::NegativeActions => "Actions you regret or wish you hadn't done",
            EntryField::ImproveTomorrow => "Things to improve tomorrow",
        }
    }
}

impl FromStr for EntryField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntryField::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| format!("Unknown entry field: {}", s))
    }
}
