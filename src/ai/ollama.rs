//! Ollama HTTP client for chat completion.
//!
//! This module provides a small async client for the Ollama `/api/chat`
//! endpoint and [`OllamaResponder`], which plugs it into reflection sessions.

use super::prompts::reflection_messages;
use crate::errors::GeneratorError;
use crate::reflection::{ReflectionMessage, ResponseGenerator};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A message in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender (system, user, assistant)
    pub role: String,
    /// The content of the message
    pub content: String,
}

impl Message {
    /// Creates a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for chat completion.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
}

/// Response from chat completion.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Message,
}

/// Client for interacting with the Ollama API.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: String,
    client: Client,
}

impl OllamaClient {
    /// Creates a new Ollama client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the Ollama API (e.g., "http://127.0.0.1:11434")
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends a non-streaming chat completion request.
    ///
    /// # Arguments
    ///
    /// * `model` - Name of the chat model (e.g., "llama3.2:3b")
    /// * `messages` - Conversation messages
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Ollama API is not reachable (`Offline`)
    /// - Model is not found (`ModelNotFound`)
    /// - API returns an error status or an unparseable body (`InvalidResponse`)
    pub async fn chat(&self, model: &str, messages: &[Message]) -> Result<String, GeneratorError> {
        debug!("Sending chat request with model: {}", model);

        let url = format!("{}/api/chat", self.base_url);
        let request = ChatRequest {
            model,
            messages,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(GeneratorError::Offline)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 404 {
                return Err(GeneratorError::ModelNotFound(model.to_string()));
            }

            return Err(GeneratorError::InvalidResponse(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            GeneratorError::InvalidResponse(format!("Failed to parse chat response: {}", e))
        })?;

        debug!(
            chars = chat_response.message.content.len(),
            "Received chat response"
        );
        Ok(chat_response.message.content)
    }
}

/// Generates reflection replies with a local Ollama model.
///
/// The whole transcript is sent on every turn, preceded by
/// [`REFLECTION_SYSTEM_PROMPT`](super::REFLECTION_SYSTEM_PROMPT).
#[derive(Debug, Clone)]
pub struct OllamaResponder {
    client: OllamaClient,
    model: String,
}

impl OllamaResponder {
    pub fn new(client: OllamaClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ResponseGenerator for OllamaResponder {
    async fn generate(
        &self,
        _user_text: &str,
        transcript: &[ReflectionMessage],
    ) -> Result<String, GeneratorError> {
        let messages = reflection_messages(transcript);
        let reply = self.client.chat(&self.model, &messages).await?;
        Ok(reply.trim().to_string())
    }
}
