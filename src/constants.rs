//! Constants used throughout the application.
//!
//! This module contains all constants used in the Nova application, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "nova";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "A guided journal with a reflection assistant";

// CLI Arguments & Defaults
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Configuration Keys & Environment Variables
/// Environment variable for the directory holding persisted data.
pub const ENV_VAR_NOVA_DIR: &str = "NOVA_DIR";
/// Environment variable selecting the reply generator (`canned` or `ollama`).
pub const ENV_VAR_NOVA_GENERATOR: &str = "NOVA_GENERATOR";
/// Environment variable for the Ollama base URL.
pub const ENV_VAR_NOVA_OLLAMA_URL: &str = "NOVA_OLLAMA_URL";
/// Environment variable for the Ollama chat model.
pub const ENV_VAR_NOVA_CHAT_MODEL: &str = "NOVA_CHAT_MODEL";
/// Environment variable for the reply timeout, in seconds.
pub const ENV_VAR_NOVA_REPLY_TIMEOUT_SECS: &str = "NOVA_REPLY_TIMEOUT_SECS";
/// Environment variable for the simulated canned reply latency, in milliseconds.
pub const ENV_VAR_NOVA_REPLY_DELAY_MS: &str = "NOVA_REPLY_DELAY_MS";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Default sub-directory name for persisted data within the user's home directory.
pub const DEFAULT_DATA_SUBDIR: &str = ".nova";
/// Default Ollama API base URL.
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
/// Default Ollama chat model.
pub const DEFAULT_CHAT_MODEL: &str = "llama3.2:3b";
/// Default bound on a single reply generation, in seconds.
pub const DEFAULT_REPLY_TIMEOUT_SECS: u64 = 30;
/// Default simulated latency of the canned responder, in milliseconds.
pub const DEFAULT_REPLY_DELAY_MS: u64 = 1200;

// Storage Keys
/// Key under which the whole journal mapping is stored.
pub const JOURNAL_ENTRIES_KEY: &str = "novaJournalEntries";
/// Key under which the onboarding survey answers are stored.
pub const SURVEY_DATA_KEY: &str = "novaSurveyData";
/// Key holding the onboarding completion flag.
pub const SURVEY_COMPLETED_KEY: &str = "novaSurveyCompleted";
/// Stored value of the completion flag once the survey is submitted.
pub const SURVEY_COMPLETED_VALUE: &str = "true";

// File System Parameters
/// File extension for stored documents.
pub const STORE_FILE_EXTENSION: &str = "json";
/// Name of the advisory lock file guarding writes in the data directory.
pub const STORE_LOCK_FILE: &str = ".nova.lock";
/// Default POSIX permissions for newly created directories (owner read/write/execute).
#[cfg(unix)]
pub const DEFAULT_DIR_PERMISSIONS: u32 = 0o700;
/// Placeholder string for redacted information in debug output.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

// Date/Time Logic
/// Date format string for the canonical date key (YYYY-MM-DD).
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";
/// Long display format, e.g. "April 21, 2025".
pub const DISPLAY_DATE_FORMAT: &str = "%B %-d, %Y";

// Reflection Session
/// Assistant greeting seeded into every new session.
pub const REFLECTION_GREETING: &str = "Hello! I'm Nova. How can I help you reflect today?";
/// Reply used when the generator fails, times out or returns nothing.
pub const FALLBACK_REPLY: &str =
    "I'm having trouble finding the right words right now. Could you tell me more?";
/// Open-ended prompts used by the canned responder.
pub const CANNED_REPLIES: &[&str] = &[
    "That's insightful. Can you elaborate a bit more?",
    "How did that make you feel?",
    "Thank you for sharing that. What else comes to mind?",
    "I hear you. What kind of support feels right at this moment?",
    "Let's delve into that. What thoughts or sensations are present?",
    "Interesting perspective. What led you to that thought?",
    "Acknowledging that is important. What's the core feeling here?",
];

// Logging Configuration
/// Service name used in tracing spans and structured logs.
pub const TRACING_SERVICE_NAME: &str = "nova";
/// Name for the root tracing span covering an application invocation.
pub const TRACING_ROOT_SPAN_NAME: &str = "app_invocation";
