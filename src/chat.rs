//! Chat session: transcript plus in-flight assistant replies.

use std::task::{Context, Poll};

use futures::FutureExt;

use crate::model::{CategoryKey, ChatMessage, Transcript, lookup};
use crate::services::{ChatAssistant, ChatError, ServiceFuture, question_about};

/// Posted by the assistant when its backend fails.
pub const ASSISTANT_UNAVAILABLE: &str =
    "Lo siento, el asistente no está disponible en este momento. Inténtalo de nuevo más tarde.";

/// Owns the transcript and the replies that have not arrived yet.
///
/// User messages are appended immediately. Each reply is independent: replies
/// are appended as their futures complete, in issue order among those that
/// complete on the same poll.
pub struct ChatSession {
    assistant: Box<dyn ChatAssistant>,
    transcript: Transcript,
    pending: Vec<ServiceFuture<Result<String, ChatError>>>,
}

impl ChatSession {
    /// Empty session backed by an assistant.
    pub fn new(assistant: Box<dyn ChatAssistant>) -> Self {
        Self {
            assistant,
            transcript: Transcript::new(),
            pending: Vec::new(),
        }
    }

    /// Transcript so far.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Number of replies still on their way.
    pub fn pending_replies(&self) -> usize {
        self.pending.len()
    }

    /// Ask how to dispose of a category.
    pub fn ask(&mut self, key: CategoryKey) {
        let info = lookup(key);
        log::debug!("💬 Asking assistant about {}", key);
        self.transcript.push(ChatMessage::user(question_about(info)));
        self.pending.push(self.assistant.answer_about(key));
    }

    /// Send a free-text message. Blank messages are ignored; returns whether
    /// the message was sent.
    pub fn send(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }

        self.transcript.push(ChatMessage::user(text));
        self.pending.push(self.assistant.reply(text));
        true
    }

    /// Append every reply that has completed. Returns how many were appended.
    pub fn poll_replies(&mut self, cx: &mut Context<'_>) -> usize {
        let mut arrived = 0;
        let mut still_pending = Vec::with_capacity(self.pending.len());

        for mut reply in self.pending.drain(..) {
            match reply.poll_unpin(cx) {
                Poll::Ready(Ok(text)) => {
                    self.transcript.push(ChatMessage::assistant(text));
                    arrived += 1;
                }
                Poll::Ready(Err(e)) => {
                    log::warn!("Assistant reply failed: {}", e);
                    self.transcript.push(ChatMessage::assistant(ASSISTANT_UNAVAILABLE));
                    arrived += 1;
                }
                Poll::Pending => still_pending.push(reply),
            }
        }

        self.pending = still_pending;
        arrived
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Sender;
    use crate::services::{CANNED_REPLIES, Clock, ManualClock, ScriptedAssistant};
    use futures::future;
    use std::rc::Rc;
    use std::time::Duration;

    const DELAY: Duration = Duration::from_millis(1000);

    fn session(clock: &Rc<ManualClock>) -> ChatSession {
        let clock: Rc<dyn Clock> = clock.clone();
        ChatSession::new(Box::new(ScriptedAssistant::new(clock, Some(3))))
    }

    fn poll(session: &mut ChatSession) -> usize {
        session.poll_replies(&mut Context::from_waker(futures::task::noop_waker_ref()))
    }

    #[test]
    fn test_sequential_sends_interleave() {
        let clock = Rc::new(ManualClock::new());
        let mut chat = session(&clock);

        assert!(chat.send("A"));
        clock.advance(DELAY);
        assert_eq!(poll(&mut chat), 1);

        assert!(chat.send("B"));
        clock.advance(DELAY);
        assert_eq!(poll(&mut chat), 1);

        let messages = chat.transcript().messages();
        let senders: Vec<_> = messages.iter().map(|m| m.sender).collect();
        assert_eq!(
            senders,
            vec![Sender::User, Sender::Assistant, Sender::User, Sender::Assistant]
        );
        assert_eq!(messages[0].text, "A");
        assert_eq!(messages[2].text, "B");
        assert!(CANNED_REPLIES.contains(&messages[1].text.as_str()));
        assert!(CANNED_REPLIES.contains(&messages[3].text.as_str()));
    }

    #[test]
    fn test_reply_waits_for_delay() {
        let clock = Rc::new(ManualClock::new());
        let mut chat = session(&clock);

        chat.send("¿Dónde tiro las pilas?");
        assert_eq!(chat.transcript().len(), 1);
        assert_eq!(poll(&mut chat), 0);

        clock.advance(Duration::from_millis(999));
        assert_eq!(poll(&mut chat), 0);
        clock.advance(Duration::from_millis(1));
        assert_eq!(poll(&mut chat), 1);
        assert_eq!(chat.pending_replies(), 0);
    }

    #[test]
    fn test_blank_message_is_ignored() {
        let clock = Rc::new(ManualClock::new());
        let mut chat = session(&clock);

        assert!(!chat.send("   "));
        assert!(chat.transcript().is_empty());
        assert_eq!(chat.pending_replies(), 0);
    }

    #[test]
    fn test_message_is_trimmed() {
        let clock = Rc::new(ManualClock::new());
        let mut chat = session(&clock);

        chat.send("  hola  ");
        assert_eq!(chat.transcript().messages()[0].text, "hola");
    }

    #[test]
    fn test_ask_posts_question_then_answer() {
        let clock = Rc::new(ManualClock::new());
        let mut chat = session(&clock);

        chat.ask(CategoryKey::Hazardous);
        assert_eq!(
            chat.transcript().messages()[0].text,
            "Tengo dudas sobre cómo reciclar peligroso. ¿Podrías ayudarme?"
        );

        clock.advance(DELAY);
        poll(&mut chat);
        let answer = chat.transcript().last().unwrap();
        assert_eq!(answer.sender, Sender::Assistant);
        assert!(answer.text.contains("punto limpio o contenedores especiales"));
    }

    #[test]
    fn test_overlapping_sends_resolve_in_issue_order() {
        let clock = Rc::new(ManualClock::new());
        let mut chat = session(&clock);

        chat.send("uno");
        chat.send("dos");
        clock.advance(DELAY);
        assert_eq!(poll(&mut chat), 2);

        let senders: Vec<_> = chat.transcript().messages().iter().map(|m| m.sender).collect();
        assert_eq!(
            senders,
            vec![Sender::User, Sender::User, Sender::Assistant, Sender::Assistant]
        );
    }

    struct BrokenAssistant;

    impl ChatAssistant for BrokenAssistant {
        fn answer_about(&self, _key: CategoryKey) -> ServiceFuture<Result<String, ChatError>> {
            future::ready(Err(ChatError::Unavailable("offline".to_string()))).boxed_local()
        }

        fn reply(&self, _message: &str) -> ServiceFuture<Result<String, ChatError>> {
            future::ready(Err(ChatError::Unavailable("offline".to_string()))).boxed_local()
        }
    }

    #[test]
    fn test_backend_failure_posts_apology() {
        let mut chat = ChatSession::new(Box::new(BrokenAssistant));
        chat.send("hola");
        assert_eq!(poll(&mut chat), 1);
        assert_eq!(
            chat.transcript().last().map(|m| m.text.as_str()),
            Some(ASSISTANT_UNAVAILABLE)
        );
    }
}
