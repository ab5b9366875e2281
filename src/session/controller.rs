use crate::gateway::{Backend, GatewayResult, Word, WordDraft, WordUpdate, failure_message};
use crate::session::review::{ButtonState, ReviewState, compute_button_state};

/// A learner action that round-trips to the trainer and rewrites the card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReviewAction {
    Next,
    Prev,
    Choice(String),
    Mastered,
    Reset,
    AddWord(WordDraft),
    EditWord(WordDraft),
}

impl ReviewAction {
    pub fn name(&self) -> &'static str {
        match self {
            ReviewAction::Next => "next",
            ReviewAction::Prev => "prev",
            ReviewAction::Choice(_) => "choice",
            ReviewAction::Mastered => "mastered",
            ReviewAction::Reset => "reset",
            ReviewAction::AddWord(_) => "add-word",
            ReviewAction::EditWord(_) => "edit-word",
        }
    }

    /// Review state entered on success; `None` for corpus edits, which
    /// leave the flow where it was.
    fn target_state(&self) -> Option<ReviewState> {
        match self {
            ReviewAction::Next => Some(ReviewState::Fresh),
            ReviewAction::Reset => Some(ReviewState::Restarted),
            ReviewAction::Prev => Some(ReviewState::BackViewed),
            ReviewAction::Choice(_) | ReviewAction::Mastered => Some(ReviewState::Answered),
            ReviewAction::AddWord(_) | ReviewAction::EditWord(_) => None,
        }
    }

    fn announces_message(&self) -> bool {
        matches!(
            self,
            ReviewAction::Reset | ReviewAction::AddWord(_) | ReviewAction::EditWord(_)
        )
    }

    /// Actions gated by the card's state. These wait for the outstanding
    /// request, since the state they were checked against is about to change.
    fn follows_review_state(&self) -> bool {
        matches!(
            self,
            ReviewAction::Next | ReviewAction::Prev | ReviewAction::Choice(_) | ReviewAction::Mastered
        )
    }

    fn allowed_by(&self, buttons: ButtonState) -> bool {
        match self {
            ReviewAction::Next => buttons.next_enabled,
            ReviewAction::Prev => buttons.prev_enabled,
            ReviewAction::Choice(_) => buttons.choices_enabled,
            ReviewAction::Mastered => buttons.mastered_enabled(),
            ReviewAction::Reset | ReviewAction::AddWord(_) | ReviewAction::EditWord(_) => true,
        }
    }
}

/// An issued request. Only the most recently issued ticket may apply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ticket {
    pub seq: u64,
    pub action: ReviewAction,
}

impl Ticket {
    pub fn execute(&self, backend: &dyn Backend) -> GatewayResult<WordUpdate> {
        match &self.action {
            ReviewAction::Next => backend.next_word(),
            ReviewAction::Prev => backend.prev_word(),
            ReviewAction::Choice(choice) => backend.submit_choice(choice),
            ReviewAction::Mastered => backend.mark_mastered(),
            ReviewAction::Reset => backend.reset_progress(),
            ReviewAction::AddWord(draft) => backend.add_word(draft),
            ReviewAction::EditWord(draft) => backend.edit_word(draft),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Applied {
    /// Display and state were updated; carries the message to announce, if any.
    Updated { announce: Option<String> },
    /// The trainer or the transport failed; nothing changed.
    Failed { message: String },
    /// A newer request was issued after this one; the result was dropped.
    Stale,
}

/// The displayed card, its status line and the review state, mutated only by
/// applying completed requests.
#[derive(Debug, Default)]
pub struct ReviewSession {
    word: Option<Word>,
    status: String,
    definition: String,
    state: ReviewState,
    can_undo: Option<bool>,
    last_issued: u64,
    awaiting: Option<u64>,
}

impl ReviewSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn word(&self) -> Option<&Word> {
        self.word.as_ref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Definition text as currently shown; empty while the answer is hidden.
    pub fn definition(&self) -> &str {
        &self.definition
    }

    pub fn state(&self) -> ReviewState {
        self.state
    }

    pub fn can_undo(&self) -> Option<bool> {
        self.can_undo
    }

    pub fn buttons(&self) -> ButtonState {
        compute_button_state(self.state)
    }

    /// Request the first card. Stays `Fresh` and bypasses button policy.
    pub fn start(&mut self) -> Ticket {
        self.issue(ReviewAction::Next)
    }

    /// Drop the displayed card and request a new first card. Sequence numbers
    /// keep counting so replies to earlier requests stay stale.
    pub fn reload(&mut self) -> Ticket {
        self.word = None;
        self.status.clear();
        self.definition.clear();
        self.state = ReviewState::Fresh;
        self.can_undo = None;
        self.issue(ReviewAction::Next)
    }

    /// Replace only the status line, as a parameter update does.
    pub fn set_status(&mut self, status: String) {
        self.status = status;
    }

    /// Whether a request is out whose reply has not been applied yet.
    pub fn is_awaiting(&self) -> bool {
        self.awaiting.is_some()
    }

    /// Issue `action` if the current controls allow it.
    pub fn begin(&mut self, action: ReviewAction) -> Option<Ticket> {
        if action.follows_review_state() && self.awaiting.is_some() {
            tracing::debug!(
                action = action.name(),
                awaiting = ?self.awaiting,
                "action ignored: request in flight"
            );
            return None;
        }
        if !action.allowed_by(self.buttons()) {
            tracing::debug!(
                action = action.name(),
                state = self.state.as_str(),
                "action ignored: control disabled"
            );
            return None;
        }
        Some(self.issue(action))
    }

    fn issue(&mut self, action: ReviewAction) -> Ticket {
        self.last_issued += 1;
        self.awaiting = Some(self.last_issued);
        tracing::debug!(seq = self.last_issued, action = action.name(), "review request issued");
        Ticket {
            seq: self.last_issued,
            action,
        }
    }

    /// Whether `ticket` is still the newest outstanding request.
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.seq == self.last_issued
    }

    pub fn complete(&mut self, ticket: &Ticket, result: GatewayResult<WordUpdate>) -> Applied {
        if !self.is_current(ticket) {
            tracing::debug!(
                seq = ticket.seq,
                latest = self.last_issued,
                action = ticket.action.name(),
                "stale completion discarded"
            );
            return Applied::Stale;
        }
        self.awaiting = None;

        let update = match failure_message(result) {
            Ok(update) => update,
            Err(message) => {
                tracing::warn!(action = ticket.action.name(), %message, "review request failed");
                return Applied::Failed { message };
            }
        };

        match ticket.action.target_state() {
            Some(next) => {
                self.state = next;
                self.definition = if next.reveals_definition() {
                    update.word.definition.clone()
                } else {
                    String::new()
                };
            }
            // Corpus edits show the edited definition only where it was
            // already visible.
            None if matches!(ticket.action, ReviewAction::EditWord(_))
                && self.state.reveals_definition() =>
            {
                self.definition = update.word.definition.clone();
            }
            None => {}
        }

        self.word = Some(update.word);
        self.status = update.status;
        self.can_undo = update.can_undo;

        let announce = if ticket.action.announces_message() {
            update.message
        } else {
            None
        };
        Applied::Updated { announce }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayError, Reply};

    fn update(word: &str, definition: &str, status: &str) -> GatewayResult<WordUpdate> {
        Ok(Reply::Ok(WordUpdate {
            word: Word {
                word: word.to_string(),
                definition: definition.to_string(),
                tag: "L".to_string(),
                learned: false,
            },
            status: status.to_string(),
            message: Some("server says hi".to_string()),
            can_undo: Some(true),
        }))
    }

    fn loaded() -> ReviewSession {
        let mut s = ReviewSession::new();
        let t = s.start();
        assert_eq!(
            s.complete(&t, update("abate", "to lessen", "1/10")),
            Applied::Updated { announce: None }
        );
        s
    }

    #[test]
    fn initial_load_is_fresh_with_hidden_definition() {
        let s = loaded();
        assert_eq!(s.state(), ReviewState::Fresh);
        assert_eq!(s.word().map(|w| w.word.as_str()), Some("abate"));
        assert_eq!(s.definition(), "");
        let b = s.buttons();
        assert!(b.choices_enabled && b.prev_enabled && !b.next_enabled);
    }

    #[test]
    fn choice_reveals_definition_and_arms_next() {
        let mut s = loaded();
        let t = s.begin(ReviewAction::Choice("familiar".into())).unwrap();
        let applied = s.complete(&t, update("abate", "to lessen", "2/10"));
        assert_eq!(applied, Applied::Updated { announce: None });
        assert_eq!(s.state(), ReviewState::Answered);
        assert_eq!(s.definition(), "to lessen");
        assert_eq!(s.status(), "2/10");
        let b = s.buttons();
        assert!(!b.choices_enabled && !b.prev_enabled && b.next_enabled);
    }

    #[test]
    fn next_after_answer_clears_definition() {
        let mut s = loaded();
        let t = s.begin(ReviewAction::Mastered).unwrap();
        s.complete(&t, update("abate", "to lessen", "2/10"));
        let t = s.begin(ReviewAction::Next).unwrap();
        s.complete(&t, update("banal", "trite", "3/10"));
        assert_eq!(s.state(), ReviewState::Fresh);
        assert_eq!(s.definition(), "");
        assert_eq!(s.word().unwrap().word, "banal");
    }

    #[test]
    fn prev_enters_back_viewed() {
        let mut s = loaded();
        let t = s.begin(ReviewAction::Prev).unwrap();
        s.complete(&t, update("zeal", "fervor", "1/10"));
        assert_eq!(s.state(), ReviewState::BackViewed);
        assert_eq!(s.definition(), "");
        let b = s.buttons();
        assert!(b.choices_enabled && !b.prev_enabled && !b.next_enabled);
    }

    #[test]
    fn disabled_controls_issue_nothing() {
        let mut s = loaded();
        assert!(s.begin(ReviewAction::Next).is_none());

        let t = s.begin(ReviewAction::Choice("L".into())).unwrap();
        s.complete(&t, update("abate", "to lessen", "2/10"));
        assert!(s.begin(ReviewAction::Choice("H".into())).is_none());
        assert!(s.begin(ReviewAction::Mastered).is_none());
        assert!(s.begin(ReviewAction::Prev).is_none());
    }

    #[test]
    fn failure_leaves_everything_unchanged() {
        let mut s = loaded();
        let t = s.begin(ReviewAction::Choice("M".into())).unwrap();
        let applied = s.complete(
            &t,
            Ok(Reply::Fail {
                message: "no current word".into(),
            }),
        );
        assert_eq!(
            applied,
            Applied::Failed {
                message: "no current word".into()
            }
        );
        assert_eq!(s.state(), ReviewState::Fresh);
        assert_eq!(s.status(), "1/10");
        assert_eq!(s.definition(), "");
    }

    #[test]
    fn transport_failure_is_reported_like_backend_failure() {
        let mut s = loaded();
        let t = s.begin(ReviewAction::Prev).unwrap();
        let applied = s.complete(&t, Err(GatewayError::Status(500)));
        assert!(matches!(applied, Applied::Failed { .. }));
        assert_eq!(s.state(), ReviewState::Fresh);
    }

    #[test]
    fn out_of_order_completion_is_discarded() {
        let mut s = loaded();
        let older = s.begin(ReviewAction::Choice("L".into())).unwrap();
        let newer = s.begin(ReviewAction::Reset).unwrap();

        assert_eq!(
            s.complete(&newer, update("first", "def", "reset")),
            Applied::Updated {
                announce: Some("server says hi".into())
            }
        );
        assert_eq!(s.complete(&older, update("stale", "def", "old")), Applied::Stale);
        assert_eq!(s.word().unwrap().word, "first");
        assert_eq!(s.state(), ReviewState::Restarted);
    }

    #[test]
    fn reload_clears_card_and_outdates_earlier_requests() {
        let mut s = loaded();
        let before = s.begin(ReviewAction::Choice("L".into())).unwrap();
        let t = s.reload();
        assert!(s.word().is_none());
        assert_eq!(s.status(), "");
        assert_eq!(s.complete(&before, update("x", "y", "z")), Applied::Stale);
        s.complete(&t, update("first", "def", "1/3"));
        assert_eq!(s.word().unwrap().word, "first");
        assert_eq!(s.state(), ReviewState::Fresh);
    }

    #[test]
    fn reset_returns_to_fresh_from_answered() {
        let mut s = loaded();
        let t = s.begin(ReviewAction::Mastered).unwrap();
        s.complete(&t, update("abate", "to lessen", "2/10"));
        let t = s.begin(ReviewAction::Reset).unwrap();
        s.complete(&t, update("abate", "to lessen", "0/10"));
        assert_eq!(s.state(), ReviewState::Restarted);
        assert_eq!(s.definition(), "");
        let b = s.buttons();
        assert!(b.choices_enabled);
        assert!(!b.prev_enabled);
        assert!(!b.next_enabled);
        assert!(s.begin(ReviewAction::Prev).is_none());
    }

    #[test]
    fn answer_after_reset_rearms_prev_on_next_card() {
        let mut s = loaded();
        let t = s.begin(ReviewAction::Reset).unwrap();
        s.complete(&t, update("abate", "to lessen", "0/10"));
        let t = s.begin(ReviewAction::Choice("H".into())).unwrap();
        s.complete(&t, update("abate", "to lessen", "1/10"));
        let t = s.begin(ReviewAction::Next).unwrap();
        s.complete(&t, update("banal", "trite", "1/10"));
        assert_eq!(s.state(), ReviewState::Fresh);
        assert!(s.buttons().prev_enabled);
    }

    #[test]
    fn second_choice_waits_for_the_first() {
        let mut s = loaded();
        let first = s.begin(ReviewAction::Choice("L".into())).unwrap();
        assert!(s.is_awaiting());
        assert!(s.begin(ReviewAction::Choice("L".into())).is_none());
        assert!(s.begin(ReviewAction::Mastered).is_none());
        assert!(s.begin(ReviewAction::Prev).is_none());

        s.complete(&first, update("abate", "to lessen", "2/10"));
        assert!(!s.is_awaiting());
        assert!(s.begin(ReviewAction::Next).is_some());
    }

    #[test]
    fn failed_request_releases_the_controls() {
        let mut s = loaded();
        let t = s.begin(ReviewAction::Prev).unwrap();
        s.complete(&t, Err(GatewayError::Status(502)));
        assert!(s.begin(ReviewAction::Prev).is_some());
    }

    #[test]
    fn add_word_keeps_review_state() {
        let mut s = loaded();
        let t = s.begin(ReviewAction::Choice("H".into())).unwrap();
        s.complete(&t, update("abate", "to lessen", "2/10"));

        let draft = WordDraft {
            word: "quell".into(),
            definition: "to suppress".into(),
        };
        let t = s.begin(ReviewAction::AddWord(draft)).unwrap();
        let applied = s.complete(&t, update("quell", "to suppress", "2/11"));
        assert_eq!(
            applied,
            Applied::Updated {
                announce: Some("server says hi".into())
            }
        );
        assert_eq!(s.state(), ReviewState::Answered);
        assert_eq!(s.word().unwrap().word, "quell");
        assert_eq!(s.status(), "2/11");
        assert!(s.buttons().next_enabled);
    }

    #[test]
    fn edit_word_updates_visible_definition_only() {
        let mut s = loaded();
        let draft = WordDraft {
            word: "abate".into(),
            definition: "to reduce".into(),
        };
        let t = s.begin(ReviewAction::EditWord(draft.clone())).unwrap();
        s.complete(&t, update("abate", "to reduce", "1/10"));
        assert_eq!(s.definition(), "");

        let t = s.begin(ReviewAction::Choice("L".into())).unwrap();
        s.complete(&t, update("abate", "to reduce", "1/10"));
        let t = s.begin(ReviewAction::EditWord(draft)).unwrap();
        s.complete(&t, update("abate", "to diminish", "1/10"));
        assert_eq!(s.definition(), "to diminish");
        assert_eq!(s.state(), ReviewState::Answered);
    }
}
