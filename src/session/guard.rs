use crate::gateway::FileId;

/// An irreversible operation that needs explicit confirmation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DestructiveAction {
    DeleteFile { file: FileId, shared: bool },
    ResetProgress,
}

impl DestructiveAction {
    pub fn title(&self) -> &'static str {
        match self {
            DestructiveAction::DeleteFile { .. } => "Delete file",
            DestructiveAction::ResetProgress => "Reset progress",
        }
    }

    pub fn warning(&self) -> String {
        match self {
            DestructiveAction::DeleteFile { file, shared: false } => format!(
                "Delete file #{file}? The file and all of its learning progress will be removed permanently."
            ),
            DestructiveAction::DeleteFile { file, shared: true } => format!(
                "Delete shared file #{file}? It will also leave the shared collection, and all of its learning progress will be removed permanently."
            ),
            DestructiveAction::ResetProgress => {
                "Reset learning progress? All saved progress will be erased and the session starts over."
                    .to_string()
            }
        }
    }
}

/// Open confirmation prompt. Lives only until the learner answers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingConfirmation {
    pub action: DestructiveAction,
    pub message: String,
}

/// Holds at most one confirmation prompt in front of destructive requests.
#[derive(Debug, Default)]
pub struct DestructiveActionGuard {
    pending: Option<PendingConfirmation>,
}

impl DestructiveActionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<&PendingConfirmation> {
        self.pending.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    /// Open the prompt for `action`. An already open prompt is kept.
    pub fn request(&mut self, action: DestructiveAction) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(PendingConfirmation {
            action,
            message: action.warning(),
        });
        true
    }

    /// Close the prompt. Returns the action to run only when confirmed.
    pub fn resolve(&mut self, confirmed: bool) -> Option<DestructiveAction> {
        let pending = self.pending.take()?;
        tracing::info!(action = pending.action.title(), confirmed, "confirmation answered");
        confirmed.then_some(pending.action)
    }
}
