//! Command-line argument parsing.
//!
//! The binary is organised as `nova <command> <action>`, with logging options
//! that apply to every command.

use crate::constants::{APP_DESCRIPTION, APP_NAME, DEFAULT_LOG_LEVEL, LOG_FORMAT_JSON, LOG_FORMAT_TEXT};
use crate::errors::DateError;
use crate::journal::{EntryDate, EntryField, JournalEntry};
use crate::onboarding::SurveyResponses;
use clap::{Args, Parser, Subcommand};

/// A guided journaling companion with daily entries and reflection chats
#[derive(Parser, Debug)]
#[command(name = APP_NAME, about = APP_DESCRIPTION, author, version, long_about = None)]
pub struct CliArgs {
    /// Log output format
    #[arg(
        long,
        global = true,
        default_value = LOG_FORMAT_TEXT,
        value_parser = [LOG_FORMAT_TEXT, LOG_FORMAT_JSON]
    )]
    pub log_format: String,

    /// Minimum log level when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Show, save or list daily journal entries
    Entry {
        #[command(subcommand)]
        action: EntryCommand,
    },

    /// Start an interactive reflection chat
    Chat,

    /// Submit or check the onboarding survey
    Survey {
        #[command(subcommand)]
        action: SurveyCommand,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum EntryCommand {
    /// Print the entry for a date
    Show {
        /// Entry date (format: YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Update fields of an entry and save it
    Save(SaveEntryArgs),

    /// List the dates that have a stored entry
    List,
}

/// Fields to write into an entry. Fields left out keep their stored value.
#[derive(Args, Debug, Default, PartialEq)]
pub struct SaveEntryArgs {
    /// Entry date (format: YYYY-MM-DD, defaults to today)
    #[arg(short, long)]
    pub date: Option<String>,

    /// How was your day?
    #[arg(long)]
    pub free_journal: Option<String>,

    /// Positive emotions felt
    #[arg(long)]
    pub positive_emotions: Option<String>,

    /// Negative emotions felt
    #[arg(long)]
    pub negative_emotions: Option<String>,

    /// Positive actions taken
    #[arg(long)]
    pub positive_actions: Option<String>,

    /// Actions you regret or wish you hadn't done
    #[arg(long)]
    pub negative_actions: Option<String>,

    /// Things to improve tomorrow
    #[arg(long)]
    pub improve_tomorrow: Option<String>,
}

impl SaveEntryArgs {
    /// Overwrites the fields that were given on the command line.
    pub fn apply_to(&self, entry: &mut JournalEntry) {
        let given = [
            (EntryField::FreeJournal, &self.free_journal),
            (EntryField::PositiveEmotions, &self.positive_emotions),
            (EntryField::NegativeEmotions, &self.negative_emotions),
            (EntryField::PositiveActions, &self.positive_actions),
            (EntryField::NegativeActions, &self.negative_actions),
            (EntryField::ImproveTomorrow, &self.improve_tomorrow),
        ];

        for (field, value) in given {
            if let Some(value) = value {
                entry.set_field(field, value.as_str());
            }
        }
    }
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum SurveyCommand {
    /// Submit the onboarding survey answers
    Submit(SurveyArgs),

    /// Report whether onboarding has been completed
    Status,
}

/// Answers to the onboarding survey.
#[derive(Args, Debug, Default, PartialEq)]
pub struct SurveyArgs {
    /// Where do you see yourself in a month?
    #[arg(long, default_value = "")]
    pub vision_month: String,
    /// Where do you see yourself in a year?
    #[arg(long = "vision-1-year", default_value = "")]
    pub vision_1_year: String,
    /// Where do you see yourself in 5 years?
    #[arg(long = "vision-5-years", default_value = "")]
    pub vision_5_years: String,
    /// Where do you see yourself in 10 years?
    #[arg(long = "vision-10-years", default_value = "")]
    pub vision_10_years: String,
    /// Where do you see yourself in 20 years?
    #[arg(long = "vision-20-years", default_value = "")]
    pub vision_20_years: String,
    /// What do you want your life to be about? (required)
    #[arg(long, default_value = "")]
    pub vision_lifelong: String,
    /// Describe a typical weekday (required)
    #[arg(long, default_value = "")]
    pub routine_weekday: String,
    /// Describe a typical weekend
    #[arg(long, default_value = "")]
    pub routine_weekend: String,
    /// What is going well right now? (required)
    #[arg(long, default_value = "")]
    pub doing_well: String,
    /// What are you struggling with? (required)
    #[arg(long, default_value = "")]
    pub struggling_with: String,
    /// If you could change one thing, what would it be?
    #[arg(long, default_value = "")]
    pub change_one_thing: String,
    /// Anything else you'd like to share?
    #[arg(long, default_value = "")]
    pub anything_else: String,
}

impl From<SurveyArgs> for SurveyResponses {
    fn from(args: SurveyArgs) -> Self {
        SurveyResponses {
            vision_month: args.vision_month,
            vision_1_year: args.vision_1_year,
            vision_5_years: args.vision_5_years,
            vision_10_years: args.vision_10_years,
            vision_20_years: args.vision_20_years,
            vision_lifelong: args.vision_lifelong,
            routine_weekday: args.routine_weekday,
            routine_weekend: args.routine_weekend,
            doing_well: args.doing_well,
            struggling_with: args.struggling_with,
            change_one_thing: args.change_one_thing,
            anything_else: args.anything_else,
        }
    }
}

/// Resolves an optional `--date` value, defaulting to today's local date.
pub fn resolve_date(date: Option<&str>) -> Result<EntryDate, DateError> {
    match date {
        Some(raw) => EntryDate::parse(raw),
        None => Ok(EntryDate::today()),
    }
}
