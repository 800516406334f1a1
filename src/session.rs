use tracing::debug;

use crate::advice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// Macro-state of the conversation, derived from the session fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    CategorySelection,
    ActiveChat,
}

/// Handed out by [`Session::begin_submit`]; a delayed reply is only applied if
/// its token still matches the session generation when it arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyToken {
    generation: u64,
}

/// Conversation state for one category session.
///
/// Owns the transcript, the selected category and the pending-reply flag.
/// All transitions are synchronous; the delayed part of a submission lives
/// outside this type and reports back through [`Session::complete_reply`].
#[derive(Debug, Default)]
pub struct Session {
    selected_category: Option<&'static str>,
    transcript: Vec<Message>,
    pending: bool,
    generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        if self.selected_category.is_some() {
            Phase::ActiveChat
        } else {
            Phase::CategorySelection
        }
    }

    pub fn selected_category(&self) -> Option<&'static str> {
        self.selected_category
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Enters (or switches to) a chat for the given category. Unknown ids are
    /// ignored. Any in-flight reply is invalidated and the transcript is
    /// replaced with the advisor greeting.
    pub fn select_category(&mut self, id: &str) -> bool {
        let Some(category) = advice::find_category(id) else {
            debug!(id, "ignoring unknown category selection");
            return false;
        };

        self.generation += 1;
        self.selected_category = Some(category.id);
        self.pending = false;
        self.transcript.clear();
        self.transcript.push(Message {
            role: Role::Assistant,
            content: advice::greeting(category),
        });
        debug!(category = category.id, "category selected");
        true
    }

    /// Records the user message and marks a reply as pending. Returns `None`
    /// (leaving state untouched) when no category is active, a reply is
    /// already pending, or the trimmed text is empty.
    pub fn begin_submit(&mut self, text: &str) -> Option<ReplyToken> {
        if self.selected_category.is_none() || self.pending {
            return None;
        }
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        self.transcript.push(Message {
            role: Role::User,
            content: trimmed.to_string(),
        });
        self.pending = true;
        Some(ReplyToken {
            generation: self.generation,
        })
    }

    /// Applies a delayed advisor reply. A token minted before a `reset` or a
    /// category switch no longer matches the generation and is discarded.
    pub fn complete_reply(&mut self, token: ReplyToken, content: String) -> bool {
        if token.generation != self.generation || !self.pending {
            debug!(token.generation, "discarding stale reply");
            return false;
        }

        self.transcript.push(Message {
            role: Role::Assistant,
            content,
        });
        self.pending = false;
        true
    }

    /// Returns to category selection, dropping the transcript and invalidating
    /// any in-flight reply.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.selected_category = None;
        self.transcript.clear();
        self.pending = false;
        debug!("session reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::CATEGORIES;

    #[test]
    fn starts_in_category_selection() {
        let session = Session::new();
        assert_eq!(session.phase(), Phase::CategorySelection);
        assert!(session.transcript().is_empty());
        assert!(!session.is_pending());
    }

    #[test]
    fn selecting_any_fixed_category_greets_once() {
        for category in &CATEGORIES {
            let mut session = Session::new();
            assert!(session.select_category(category.id));
            assert_eq!(session.phase(), Phase::ActiveChat);
            assert_eq!(session.transcript().len(), 1);
            let greeting = &session.transcript()[0];
            assert_eq!(greeting.role, Role::Assistant);
            assert!(greeting.content.contains(category.name));
        }
    }

    #[test]
    fn unknown_category_is_a_no_op() {
        let mut session = Session::new();
        assert!(!session.select_category("astrology"));
        assert_eq!(session.phase(), Phase::CategorySelection);
        assert!(session.transcript().is_empty());

        session.select_category("career");
        assert!(!session.select_category("nope"));
        assert_eq!(session.selected_category(), Some("career"));
        assert_eq!(session.transcript().len(), 1);
    }

    #[test]
    fn submit_requires_an_active_chat() {
        let mut session = Session::new();
        assert!(session.begin_submit("hello?").is_none());
    }

    #[test]
    fn blank_submissions_are_rejected() {
        let mut session = Session::new();
        session.select_category("health");
        assert!(session.begin_submit("").is_none());
        assert!(session.begin_submit("   ").is_none());
        assert_eq!(session.transcript().len(), 1);
        assert!(!session.is_pending());
    }

    #[test]
    fn submit_trims_and_sets_pending() {
        let mut session = Session::new();
        session.select_category("finance");
        let token = session.begin_submit("  How much should I save?  ").unwrap();

        assert!(session.is_pending());
        assert_eq!(session.transcript().len(), 2);
        let user = &session.transcript()[1];
        assert_eq!(user.role, Role::User);
        assert_eq!(user.content, "How much should I save?");

        assert!(session.complete_reply(token, "Save 20%.".to_string()));
        assert!(!session.is_pending());
        assert_eq!(session.transcript().len(), 3);
        assert_eq!(session.transcript()[2].role, Role::Assistant);
    }

    #[test]
    fn second_submit_while_pending_is_rejected() {
        let mut session = Session::new();
        session.select_category("career");
        let _token = session.begin_submit("first").unwrap();
        assert!(session.begin_submit("second").is_none());
        assert_eq!(session.transcript().len(), 2);
        assert!(session.is_pending());
    }

    #[test]
    fn reset_clears_everything() {
        let mut session = Session::new();
        session.select_category("education");
        session.begin_submit("question");
        session.reset();

        assert_eq!(session.phase(), Phase::CategorySelection);
        assert!(session.transcript().is_empty());
        assert_eq!(session.selected_category(), None);
        assert!(!session.is_pending());
    }

    #[test]
    fn reply_arriving_after_reset_is_discarded() {
        let mut session = Session::new();
        session.select_category("lifestyle");
        let token = session.begin_submit("question").unwrap();
        session.reset();

        assert!(!session.complete_reply(token, "too late".to_string()));
        assert!(session.transcript().is_empty());
        assert!(!session.is_pending());
    }

    #[test]
    fn reply_arriving_after_category_switch_is_discarded() {
        let mut session = Session::new();
        session.select_category("career");
        let token = session.begin_submit("question").unwrap();
        session.select_category("health");

        assert!(!session.complete_reply(token, "stale career advice".to_string()));
        assert_eq!(session.transcript().len(), 1);
        assert!(!session.is_pending());
        assert_eq!(session.selected_category(), Some("health"));
    }

    #[test]
    fn stale_token_does_not_satisfy_a_new_submission() {
        let mut session = Session::new();
        session.select_category("career");
        let old = session.begin_submit("first").unwrap();
        session.select_category("career");
        let _new = session.begin_submit("second").unwrap();

        assert!(!session.complete_reply(old, "from the first life".to_string()));
        assert!(session.is_pending());
    }
}
