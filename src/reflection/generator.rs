//! Reply generation strategies for reflection sessions.

use super::ReflectionMessage;
use crate::constants::CANNED_REPLIES;
use crate::errors::GeneratorError;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use std::time::Duration;

/// Produces the assistant's reply to the latest user message.
///
/// Implementations may be a static table, a rule engine or a call to a remote
/// language model. The session calls `generate` from a background task and
/// bounds it with a timeout, so implementations are free to await I/O.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    /// Returns the reply text for `user_text` given the transcript so far.
    ///
    /// `transcript` already contains the user message being answered.
    ///
    /// # Errors
    ///
    /// Returns a `GeneratorError` when no reply can be produced. The session
    /// substitutes a fallback reply in that case.
    async fn generate(
        &self,
        user_text: &str,
        transcript: &[ReflectionMessage],
    ) -> Result<String, GeneratorError>;
}

/// Replies with a random open-ended prompt, ignoring what the user wrote.
///
/// An optional latency simulates a slower backend without blocking the
/// runtime.
///
/// # Examples
///
/// ```
/// use nova::reflection::{CannedResponder, ResponseGenerator};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let responder = CannedResponder::new();
/// let reply = responder.generate("I had a long day", &[]).await.unwrap();
/// assert!(responder.replies().contains(&reply));
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CannedResponder {
    replies: Vec<String>,
    latency: Duration,
}

impl Default for CannedResponder {
    fn default() -> Self {
        Self {
            replies: CANNED_REPLIES.iter().map(|r| r.to_string()).collect(),
            latency: Duration::ZERO,
        }
    }
}

impl CannedResponder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the reply table.
    pub fn with_replies(mut self, replies: Vec<String>) -> Self {
        self.replies = replies;
        self
    }

    /// Waits this long before every reply.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn replies(&self) -> &[String] {
        &self.replies
    }

    fn pick(&self) -> Option<String> {
        self.replies.choose(&mut rand::thread_rng()).cloned()
    }
}

#[async_trait]
impl ResponseGenerator for CannedResponder {
    async fn generate(
        &self,
        _user_text: &str,
        _transcript: &[ReflectionMessage],
    ) -> Result<String, GeneratorError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        self.pick()
            .ok_or_else(|| GeneratorError::Failed("no canned replies configured".to_string()))
    }
}

/// Adapts a plain function of `(user_text, transcript)` into a generator.
///
/// Useful for rule-based replies and for tests.
///
/// # Examples
///
/// ```
/// use nova::reflection::{FnResponder, ReflectionMessage};
///
/// let echo = FnResponder::new(|text: &str, _: &[ReflectionMessage]| format!("You said: {}", text));
/// ```
pub struct FnResponder<F> {
    reply: F,
}

impl<F> FnResponder<F>
where
    F: Fn(&str, &[ReflectionMessage]) -> String + Send + Sync,
{
    pub fn new(reply: F) -> Self {
        Self { reply }
    }
}

#[async_trait]
impl<F> ResponseGenerator for FnResponder<F>
where
    F: Fn(&str, &[ReflectionMessage]) -> String + Send + Sync,
{
    async fn generate(
        &self,
        user_text: &str,
        transcript: &[ReflectionMessage],
    ) -> Result<String, GeneratorError> {
        Ok((self.reply)(user_text, transcript))
    }
}
