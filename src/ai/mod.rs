//! Language-model backed reply generation.
//!
//! This module provides integration with Ollama for local LLM inference,
//! used as an optional [`ResponseGenerator`](crate::reflection::ResponseGenerator)
//! for reflection sessions.
//!
//! # Module Structure
//!
//! - `ollama`: HTTP client for the Ollama chat API and the session adapter
//! - `prompts`: System prompt and transcript-to-message conversion
//!
//! # Example
//!
//! ```no_run
//! use nova::ai::{Message, OllamaClient};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new("http://127.0.0.1:11434");
//! let reply = client.chat("llama3.2:3b", &[Message::user("Hello")]).await?;
//! # Ok(())
//! # }
//! ```

pub mod ollama;
pub mod prompts;

pub use ollama::{Message, OllamaClient, OllamaResponder};
pub use prompts::{reflection_messages, REFLECTION_SYSTEM_PROMPT};
