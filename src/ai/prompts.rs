//! System prompt and message builders for reflection chats.

use super::ollama::Message;
use crate::reflection::{ReflectionMessage, Sender};

/// System prompt establishing the assistant's role in a reflection session.
pub const REFLECTION_SYSTEM_PROMPT: &str = r#"You are Nova, a warm and thoughtful journaling companion. Your role is to help the user reflect on their day and their thoughts.

Guidelines:
- Be empathetic and non-judgmental
- Reply in two or three sentences at most
- Ask one open-ended question that invites the user to go deeper
- Never give medical, legal or financial advice
- Avoid generic advice; respond to what the user actually wrote

Remember: You're talking with someone about their personal experiences.
Treat them with care and respect."#;

/// Builds the chat messages for a reflection transcript.
///
/// The system prompt comes first, followed by every transcript message with
/// its sender mapped to the chat role. The transcript is expected to already
/// end with the user message being answered.
pub fn reflection_messages(transcript: &[ReflectionMessage]) -> Vec<Message> {
    std::iter::once(Message::system(REFLECTION_SYSTEM_PROMPT))
        .chain(transcript.iter().map(|m| match m.sender {
            Sender::User => Message::user(m.text.clone()),
            Sender::Assistant => Message::assistant(m.text.clone()),
        }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflection_messages_maps_roles() {
        let transcript = vec![
            ReflectionMessage::assistant("Hello!"),
            ReflectionMessage::user("Rough day"),
        ];

        let messages = reflection_messages(&transcript);

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, REFLECTION_SYSTEM_PROMPT);
        assert_eq!(messages[1].role, "assistant");
        assert_eq!(messages[1].content, "Hello!");
        assert_eq!(messages[2].role, "user");
        assert_eq!(messages[2].content, "Rough day");
    }

    #[test]
    fn test_reflection_messages_empty_transcript() {
        let messages = reflection_messages(&[]);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "system");
    }
}
