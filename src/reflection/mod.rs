//! Conversational reflection sessions.
//!
//! A [`ReflectionSession`] holds an append-only transcript of an exchange
//! between the user and the assistant. User messages are appended
//! immediately; assistant replies are produced by a pluggable
//! [`ResponseGenerator`] on a background task and appended once generation
//! completes, in the order they were requested.
//!
//! # Example
//!
//! ```
//! use nova::reflection::{CannedResponder, ReflectionSession, Sender};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> nova::AppResult<()> {
//! let session = ReflectionSession::open();
//! session.submit_user_message("Work was stressful today");
//!
//! let reply = session.reply(Arc::new(CannedResponder::new())).await?;
//! assert_eq!(reply.map(|m| m.sender), Some(Sender::Assistant));
//! assert_eq!(session.len(), 3);
//! # Ok(())
//! # }
//! ```

pub mod generator;

#[cfg(test)]
mod tests;

pub use generator::{CannedResponder, FnResponder, ResponseGenerator};

use crate::constants::{DEFAULT_REPLY_TIMEOUT_SECS, FALLBACK_REPLY, REFLECTION_GREETING};
use crate::errors::{AppError, AppResult, GeneratorError};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    #[serde(alias = "nova")]
    Assistant,
}

/// One committed message of a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionMessage {
    pub sender: Sender,
    pub text: String,
}

impl ReflectionMessage {
    /// Creates a new user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    /// Creates a new assistant message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Assistant,
            text: text.into(),
        }
    }
}

/// State shared between a session and its in-flight reply tasks.
struct Shared {
    id: Uuid,
    transcript: Mutex<Vec<ReflectionMessage>>,
    /// Reply slots handed out so far.
    issued: AtomicU64,
    /// Reply slots resolved so far; slot `n` may commit once this equals `n`.
    resolved: watch::Sender<u64>,
    closed: CancellationToken,
}

impl Shared {
    fn transcript(&self) -> MutexGuard<'_, Vec<ReflectionMessage>> {
        self.transcript.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Runs one reply slot to completion: generate, wait for earlier slots,
    /// append (unless closed), then let the next slot through.
    async fn resolve_slot(
        self: Arc<Self>,
        slot: u64,
        generator: Arc<dyn ResponseGenerator>,
        user_text: String,
        snapshot: Vec<ReflectionMessage>,
        timeout: Duration,
    ) -> Option<ReflectionMessage> {
        let text = match self.generate(generator, user_text, snapshot, timeout).await {
            Some(Ok(text)) => Some(text),
            Some(Err(e)) => {
                warn!(session_id = %self.id, slot, "Reply generation failed, using fallback: {}", e);
                Some(FALLBACK_REPLY.to_string())
            }
            None => None,
        };

        let mut turn = self.resolved.subscribe();
        // The sender lives in `self`, so this only returns once it is our turn.
        let _ = turn.wait_for(|resolved| *resolved == slot).await;

        let committed = {
            // `close` cancels under this lock, so the check and push are atomic with it.
            let mut transcript = self.transcript();
            match text {
                Some(text) if !self.closed.is_cancelled() => {
                    let message = ReflectionMessage::assistant(text);
                    transcript.push(message.clone());
                    debug!(session_id = %self.id, slot, "Appended assistant reply");
                    Some(message)
                }
                _ => {
                    debug!(session_id = %self.id, slot, "Session closed, discarding reply");
                    None
                }
            }
        };

        self.resolved.send_modify(|resolved| *resolved += 1);
        committed
    }

    /// Calls the generator on its own task so a panic or hang cannot wedge
    /// later slots. Returns `None` if the session is closed first.
    async fn generate(
        &self,
        generator: Arc<dyn ResponseGenerator>,
        user_text: String,
        snapshot: Vec<ReflectionMessage>,
        timeout: Duration,
    ) -> Option<Result<String, GeneratorError>> {
        let mut task =
            tokio::spawn(async move { generator.generate(&user_text, &snapshot).await });

        tokio::select! {
            biased;
            _ = self.closed.cancelled() => {
                task.abort();
                None
            }
            joined = &mut task => Some(match joined {
                Ok(Ok(text)) if text.trim().is_empty() => Err(GeneratorError::EmptyReply),
                Ok(result) => result,
                Err(e) => Err(GeneratorError::Failed(format!("generator task ended abnormally: {}", e))),
            }),
            _ = tokio::time::sleep(timeout) => {
                task.abort();
                Some(Err(GeneratorError::TimedOut(timeout)))
            }
        }
    }
}

/// An in-memory reflection conversation.
///
/// The transcript starts with one assistant greeting and only ever grows.
/// Consecutive messages from the same sender are allowed. Dropping or
/// closing the session discards replies that are still being generated.
pub struct ReflectionSession {
    shared: Arc<Shared>,
    reply_timeout: Duration,
}

impl ReflectionSession {
    /// Opens a session seeded with the assistant greeting.
    pub fn open() -> Self {
        let (resolved, _) = watch::channel(0);
        let shared = Shared {
            id: Uuid::new_v4(),
            transcript: Mutex::new(vec![ReflectionMessage::assistant(REFLECTION_GREETING)]),
            issued: AtomicU64::new(0),
            resolved,
            closed: CancellationToken::new(),
        };
        debug!(session_id = %shared.id, "Opened reflection session");

        Self {
            shared: Arc::new(shared),
            reply_timeout: Duration::from_secs(DEFAULT_REPLY_TIMEOUT_SECS),
        }
    }

    /// Bounds each reply generation; on expiry the fallback reply is used.
    pub fn with_reply_timeout(mut self, timeout: Duration) -> Self {
        self.reply_timeout = timeout;
        self
    }

    /// Identifier used to correlate this session's log lines.
    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    /// A snapshot of the transcript.
    pub fn transcript(&self) -> Vec<ReflectionMessage> {
        self.shared.transcript().clone()
    }

    pub fn len(&self) -> usize {
        self.shared.transcript().len()
    }

    /// Always false: a session starts with its greeting.
    pub fn is_empty(&self) -> bool {
        self.shared.transcript().is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.shared.closed.is_cancelled()
    }

    /// Appends a user message and returns the updated transcript.
    ///
    /// Text that is empty after trimming is ignored, as is anything submitted
    /// after the session was closed. The text is stored as given.
    pub fn submit_user_message(&self, text: &str) -> Vec<ReflectionMessage> {
        let mut transcript = self.shared.transcript();
        if text.trim().is_empty() || self.is_closed() {
            return transcript.clone();
        }

        transcript.push(ReflectionMessage::user(text));
        debug!(session_id = %self.shared.id, chars = text.len(), "Appended user message");
        transcript.clone()
    }

    /// Starts generating a reply to the most recent user message.
    ///
    /// Returns immediately; the reply is appended by a background task when
    /// `generator` finishes. Replies are appended in the order this method
    /// was called, whatever order the generators finish in. Generator
    /// failures and timeouts append a fallback reply instead.
    ///
    /// Must be called from within a tokio runtime.
    pub fn request_reply(&self, generator: Arc<dyn ResponseGenerator>) -> PendingReply {
        let (slot, user_text, snapshot) = {
            let transcript = self.shared.transcript();
            let user_text = transcript
                .iter()
                .rev()
                .find(|m| m.sender == Sender::User)
                .map(|m| m.text.clone())
                .unwrap_or_default();
            let slot = self.shared.issued.fetch_add(1, Ordering::SeqCst);
            (slot, user_text, transcript.clone())
        };
        debug!(session_id = %self.shared.id, slot, "Requested assistant reply");

        let shared = Arc::clone(&self.shared);
        let handle = tokio::spawn(shared.resolve_slot(
            slot,
            generator,
            user_text,
            snapshot,
            self.reply_timeout,
        ));

        PendingReply { handle }
    }

    /// Requests a reply and waits for it to be appended.
    pub async fn reply(
        &self,
        generator: Arc<dyn ResponseGenerator>,
    ) -> AppResult<Option<ReflectionMessage>> {
        self.request_reply(generator).await
    }

    /// Closes the session. In-flight replies are discarded and later
    /// submissions ignored.
    pub fn close(&self) {
        let _transcript = self.shared.transcript();
        if !self.shared.closed.is_cancelled() {
            debug!(session_id = %self.shared.id, "Closed reflection session");
        }
        self.shared.closed.cancel();
    }
}

impl Drop for ReflectionSession {
    fn drop(&mut self) {
        self.close();
    }
}

/// A reply that is being generated.
///
/// Resolves to the appended assistant message, or `None` if the session was
/// closed before the reply could be appended. Dropping it does not cancel
/// the reply.
pub struct PendingReply {
    handle: JoinHandle<Option<ReflectionMessage>>,
}

impl Future for PendingReply {
    type Output = AppResult<Option<ReflectionMessage>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.handle
            .poll_unpin(cx)
            .map(|joined| joined.map_err(|e| AppError::Session(format!("reply task failed: {}", e))))
    }
}
