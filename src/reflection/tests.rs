use super::*;
use async_trait::async_trait;
use std::sync::Mutex as StdMutex;

/// Echoes the user text after a delay chosen by the text itself.
struct DelayedEcho;

#[async_trait]
impl ResponseGenerator for DelayedEcho {
    async fn generate(
        &self,
        user_text: &str,
        _transcript: &[ReflectionMessage],
    ) -> Result<String, GeneratorError> {
        let delay = match user_text {
            "slow" | "A" => 200,
            _ => 10,
        };
        tokio::time::sleep(Duration::from_millis(delay)).await;
        Ok(format!("reply to {}", user_text))
    }
}

struct FailingResponder;

#[async_trait]
impl ResponseGenerator for FailingResponder {
    async fn generate(
        &self,
        _user_text: &str,
        _transcript: &[ReflectionMessage],
    ) -> Result<String, GeneratorError> {
        Err(GeneratorError::InvalidResponse("HTTP 500".to_string()))
    }
}

struct PanickingResponder;

#[async_trait]
impl ResponseGenerator for PanickingResponder {
    async fn generate(
        &self,
        _user_text: &str,
        _transcript: &[ReflectionMessage],
    ) -> Result<String, GeneratorError> {
        panic!("generator bug");
    }
}

/// Records what the session passed in.
#[derive(Default)]
struct RecordingResponder {
    calls: StdMutex<Vec<(String, Vec<ReflectionMessage>)>>,
}

#[async_trait]
impl ResponseGenerator for RecordingResponder {
    async fn generate(
        &self,
        user_text: &str,
        transcript: &[ReflectionMessage],
    ) -> Result<String, GeneratorError> {
        self.calls
            .lock()
            .unwrap()
            .push((user_text.to_string(), transcript.to_vec()));
        Ok("recorded".to_string())
    }
}

fn fixed(text: &'static str) -> Arc<dyn ResponseGenerator> {
    Arc::new(FnResponder::new(move |_: &str, _: &[ReflectionMessage]| {
        text.to_string()
    }))
}

#[test]
fn test_open_seeds_greeting() {
    let session = ReflectionSession::open();

    let transcript = session.transcript();
    assert_eq!(transcript.len(), 1);
    assert_eq!(transcript[0].sender, Sender::Assistant);
    assert_eq!(transcript[0].text, REFLECTION_GREETING);
    assert!(!session.is_closed());
}

#[test]
fn test_sessions_have_distinct_ids() {
    assert_ne!(ReflectionSession::open().id(), ReflectionSession::open().id());
}

#[test]
fn test_blank_submission_ignored() {
    let session = ReflectionSession::open();

    assert_eq!(session.submit_user_message("").len(), 1);
    assert_eq!(session.submit_user_message("   \n\t").len(), 1);
    assert_eq!(session.len(), 1);
}

#[test]
fn test_submission_visible_immediately() {
    let session = ReflectionSession::open();

    let transcript = session.submit_user_message("  I slept badly ");

    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[1], ReflectionMessage::user("  I slept badly "));
    assert_eq!(session.transcript(), transcript);
}

#[test]
fn test_consecutive_user_messages_allowed() {
    let session = ReflectionSession::open();

    session.submit_user_message("first");
    let transcript = session.submit_user_message("second");

    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript[1].sender, Sender::User);
    assert_eq!(transcript[2].sender, Sender::User);
}

#[tokio::test]
async fn test_reply_appends_after_user_message() {
    let session = ReflectionSession::open();
    let before = session.len();

    session.submit_user_message("hello");
    let reply = session
        .reply(Arc::new(CannedResponder::new()))
        .await
        .unwrap()
        .unwrap();

    let transcript = session.transcript();
    assert_eq!(transcript.len(), before + 2);
    assert_eq!(transcript[before], ReflectionMessage::user("hello"));
    assert_eq!(transcript[before + 1], reply);
    assert_eq!(reply.sender, Sender::Assistant);
    assert!(crate::constants::CANNED_REPLIES.contains(&reply.text.as_str()));
}

#[tokio::test]
async fn test_generator_receives_latest_user_text_and_transcript() {
    let session = ReflectionSession::open();
    let recorder = Arc::new(RecordingResponder::default());

    session.submit_user_message("first");
    session.submit_user_message("second");
    session.reply(recorder.clone()).await.unwrap();

    let calls = recorder.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "second");
    assert_eq!(calls[0].1.len(), 3);
    assert_eq!(calls[0].1[2], ReflectionMessage::user("second"));
}

#[tokio::test]
async fn test_reply_without_user_message_gets_empty_text() {
    let session = ReflectionSession::open();
    let recorder = Arc::new(RecordingResponder::default());

    session.reply(recorder.clone()).await.unwrap();

    assert_eq!(recorder.calls.lock().unwrap()[0].0, "");
    assert_eq!(session.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_request_reply_does_not_block() {
    let session = ReflectionSession::open();
    session.submit_user_message("slow");

    let pending = session.request_reply(Arc::new(DelayedEcho));

    // The caller can keep using the session while the reply is generated.
    session.submit_user_message("still typing");
    assert_eq!(session.len(), 3);

    let reply = pending.await.unwrap().unwrap();
    assert_eq!(reply.text, "reply to slow");
    assert_eq!(session.len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_replies_keep_request_order() {
    let session = ReflectionSession::open();
    let generator: Arc<dyn ResponseGenerator> = Arc::new(DelayedEcho);

    session.submit_user_message("A");
    let first = session.request_reply(generator.clone());
    session.submit_user_message("B");
    let second = session.request_reply(generator.clone());

    // B's generator finishes long before A's.
    let (a, b) = tokio::join!(first, second);
    assert_eq!(a.unwrap().unwrap().text, "reply to A");
    assert_eq!(b.unwrap().unwrap().text, "reply to B");

    let texts: Vec<String> = session.transcript().into_iter().map(|m| m.text).collect();
    assert_eq!(
        texts[1..],
        [
            "A".to_string(),
            "B".to_string(),
            "reply to A".to_string(),
            "reply to B".to_string()
        ]
    );
}

#[tokio::test]
async fn test_failed_generation_appends_fallback() {
    let session = ReflectionSession::open();
    session.submit_user_message("hello");

    let reply = session
        .reply(Arc::new(FailingResponder))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(reply, ReflectionMessage::assistant(FALLBACK_REPLY));
    assert_eq!(session.len(), 3);
}

#[tokio::test]
async fn test_blank_generation_appends_fallback() {
    let session = ReflectionSession::open();
    session.submit_user_message("hello");

    let reply = session.reply(fixed("  ")).await.unwrap().unwrap();

    assert_eq!(reply.text, FALLBACK_REPLY);
}

#[tokio::test]
async fn test_panicking_generator_appends_fallback_and_later_replies_continue() {
    let session = ReflectionSession::open();
    session.submit_user_message("hello");

    let first = session.request_reply(Arc::new(PanickingResponder));
    let second = session.request_reply(fixed("still here"));

    assert_eq!(first.await.unwrap().unwrap().text, FALLBACK_REPLY);
    assert_eq!(second.await.unwrap().unwrap().text, "still here");
    assert_eq!(session.len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_appends_fallback() {
    let session = ReflectionSession::open().with_reply_timeout(Duration::from_millis(50));
    session.submit_user_message("slow");

    let reply = session.reply(Arc::new(DelayedEcho)).await.unwrap().unwrap();

    assert_eq!(reply.text, FALLBACK_REPLY);
    assert_eq!(session.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_close_discards_pending_reply() {
    let session = ReflectionSession::open();
    session.submit_user_message("slow");

    let pending = session.request_reply(Arc::new(DelayedEcho));
    session.close();

    assert_eq!(pending.await.unwrap(), None);
    assert!(session.is_closed());
    assert_eq!(session.len(), 2);

    // Nothing is accepted after closing.
    assert_eq!(session.submit_user_message("hello?").len(), 2);
    assert_eq!(session.reply(fixed("late")).await.unwrap(), None);
    assert_eq!(session.len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_nothing_appended_after_close_returns() {
    for _ in 0..200 {
        let session = ReflectionSession::open();
        session.submit_user_message("hello");

        let pending = session.request_reply(fixed("instant"));
        tokio::task::yield_now().await;
        session.close();
        let len_at_close = session.len();

        let reply = pending.await.unwrap();
        assert_eq!(session.len(), len_at_close);
        match reply {
            Some(message) => {
                assert_eq!(len_at_close, 3);
                assert_eq!(session.transcript()[2], message);
            }
            None => assert_eq!(len_at_close, 2),
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_dropping_session_discards_pending_reply() {
    let session = ReflectionSession::open();
    session.submit_user_message("slow");

    let pending = session.request_reply(Arc::new(DelayedEcho));
    drop(session);

    assert_eq!(pending.await.unwrap(), None);
}

#[test]
fn test_message_serialization() {
    let json = serde_json::to_string(&ReflectionMessage::assistant("hi")).unwrap();
    assert_eq!(json, r#"{"sender":"assistant","text":"hi"}"#);

    let legacy: ReflectionMessage =
        serde_json::from_str(r#"{"sender":"nova","text":"Hello!"}"#).unwrap();
    assert_eq!(legacy.sender, Sender::Assistant);

    let user: ReflectionMessage =
        serde_json::from_str(r#"{"sender":"user","text":"hey"}"#).unwrap();
    assert_eq!(user, ReflectionMessage::user("hey"));
}
