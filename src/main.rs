/*!
# Nova - A Guided Journaling Companion

Nova is a command-line tool for keeping a structured daily journal and for
reflecting on your day in a short conversation with an assistant.

This file contains the main application flow: it sets up logging, loads the
configuration, opens the on-disk store and dispatches to the requested command.

## Usage

```text
nova [OPTIONS] <COMMAND>

Commands:
  entry   Show, save or list daily journal entries
  chat    Start an interactive reflection chat
  survey  Submit or check the onboarding survey

Options:
      --log-format <LOG_FORMAT>  Log output format [default: text] [possible values: text, json]
      --log-level <LOG_LEVEL>    Minimum log level when RUST_LOG is not set [default: info]
  -h, --help                     Print help
  -V, --version                  Print version
```

## Configuration

See [`nova::config`] for the environment variables that are read.
*/

use clap::Parser;
use nova::ai::{OllamaClient, OllamaResponder};
use nova::cli::{resolve_date, CliArgs, Command, EntryCommand, SurveyCommand};
use nova::config::{Config, GeneratorKind};
use nova::constants::{LOG_FORMAT_JSON, TRACING_ROOT_SPAN_NAME, TRACING_SERVICE_NAME};
use nova::errors::{AppError, AppResult, ValidationError};
use nova::journal::{EntryField, EntryStore};
use nova::onboarding::OnboardingStore;
use nova::reflection::{CannedResponder, ReflectionSession, ResponseGenerator};
use nova::storage::{FileStore, KeyValueStore};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, info_span, Instrument};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `level`. Output always goes to stderr so
/// it never mixes with command output.
fn init_tracing(format: &str, level: &str) -> AppResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| AppError::Config(format!("Invalid log level '{}': {}", level, e)))?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = if format == LOG_FORMAT_JSON {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    result.map_err(|e| AppError::Config(format!("Failed to initialize logging: {}", e)))
}

/// The main entry point for the nova application.
///
/// Errors are reported once here: validation problems as a short notice,
/// everything else as an error line. Either way the process exits non-zero.
#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    if let Err(e) = init_tracing(&args.log_format, &args.log_level) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let correlation_id = Uuid::new_v4();
    let root_span = info_span!(
        TRACING_ROOT_SPAN_NAME,
        service_name = TRACING_SERVICE_NAME,
        correlation_id = %correlation_id
    );

    match run(args).instrument(root_span.clone()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            root_span.in_scope(|| error!("Command failed: {}", e));
            match &e {
                AppError::Validation(v @ ValidationError::EmptyEntry) => {
                    eprintln!("Empty Entry: {}", v)
                }
                AppError::Validation(v @ ValidationError::IncompleteSurvey { .. }) => {
                    eprintln!("Incomplete Survey: {}", v)
                }
                _ => eprintln!("Error: {}", e),
            }
            ExitCode::FAILURE
        }
    }
}

/// Loads the configuration and runs one command.
async fn run(args: CliArgs) -> AppResult<()> {
    info!("Starting nova");

    let config = Config::load()?;
    config.validate()?;
    debug!("Loaded configuration: {:?}", config);

    let backend: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.data_dir));

    match args.command {
        Command::Entry { action } => run_entry(action, EntryStore::new(backend)),
        Command::Survey { action } => run_survey(action, OnboardingStore::new(backend)),
        Command::Chat => run_chat(&config).await,
    }
}

fn run_entry(action: EntryCommand, store: EntryStore) -> AppResult<()> {
    match action {
        EntryCommand::Show { date } => {
            let date = resolve_date(date.as_deref())?;
            let entry = store.load_entry(&date);

            println!("{}", date.display_string());
            let mut printed = false;
            for field in EntryField::ALL {
                let value = entry.field(field);
                if !value.trim().is_empty() {
                    println!("\n{}\n{}", field.label(), value);
                    printed = true;
                }
            }
            if !printed {
                println!("\nNo entry for this date yet.");
            }
        }
        EntryCommand::Save(save) => {
            let date = resolve_date(save.date.as_deref())?;
            let mut entry = store.load_entry(&date);
            save.apply_to(&mut entry);

            store.save_entry(&date, &entry)?;
            println!("Entry saved for {}", date.display_string());
        }
        EntryCommand::List => {
            let dates = store.entry_dates();
            if dates.is_empty() {
                println!("No entries yet.");
            }
            for date in dates {
                println!("{}", date);
            }
        }
    }

    Ok(())
}

fn run_survey(action: SurveyCommand, store: OnboardingStore) -> AppResult<()> {
    match action {
        SurveyCommand::Submit(answers) => {
            store.submit(&answers.into())?;
            println!("Survey saved. Onboarding complete.");
        }
        SurveyCommand::Status => {
            if store.is_completed() {
                println!("Onboarding complete");
            } else {
                println!("Onboarding not completed");
            }
        }
    }

    Ok(())
}

fn build_generator(config: &Config) -> Arc<dyn ResponseGenerator> {
    match config.generator {
        GeneratorKind::Canned => Arc::new(CannedResponder::new().with_latency(config.reply_delay)),
        GeneratorKind::Ollama => Arc::new(OllamaResponder::new(
            OllamaClient::new(config.ollama_url.as_str()),
            config.chat_model.as_str(),
        )),
    }
}

/// Runs the reflection chat on stdin/stdout until `quit`, `exit` or end of input.
async fn run_chat(config: &Config) -> AppResult<()> {
    let generator = build_generator(config);
    let session = ReflectionSession::open().with_reply_timeout(config.reply_timeout);
    info!(session_id = %session.id(), generator = %config.generator, "Starting reflection chat");

    for message in session.transcript() {
        println!("Nova: {}", message.text);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        if text.eq_ignore_ascii_case("quit") || text.eq_ignore_ascii_case("exit") {
            break;
        }
        if text.is_empty() {
            continue;
        }

        session.submit_user_message(&line);
        if let Some(reply) = session.reply(Arc::clone(&generator)).await? {
            println!("Nova: {}", reply.text);
        }
    }

    session.close();
    info!(session_id = %session.id(), messages = session.len(), "Reflection chat ended");
    Ok(())
}
