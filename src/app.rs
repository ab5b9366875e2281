use std::collections::VecDeque;
use std::time::Instant;

use crossterm::event::KeyEvent;

use crate::config::Config;
use crate::gateway::dispatch::{Completion, Dispatcher};
use crate::gateway::{FileId, WordDraft, failure_message};
use crate::session::controller::{Applied, ReviewAction, ReviewSession};
use crate::session::guard::{DestructiveAction, DestructiveActionGuard};
use crate::session::params::{ParamDebouncer, ParamField, ParamFlush};
use crate::ui::line_input::{InputResult, LineInput};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Blocking message box; every other interaction waits until it is dismissed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptKind {
    AddWord,
    EditWord,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptStep {
    Word,
    Definition,
}

/// Two-step word/definition entry for adding or editing a card.
#[derive(Clone, Debug)]
pub struct WordPrompt {
    pub kind: PromptKind,
    pub step: PromptStep,
    pub input: LineInput,
    word: String,
    definition_seed: String,
}

impl WordPrompt {
    pub fn title(&self) -> &'static str {
        match (self.kind, self.step) {
            (PromptKind::AddWord, PromptStep::Word) => "Enter the word",
            (PromptKind::AddWord, PromptStep::Definition) => "Enter the definition",
            (PromptKind::EditWord, PromptStep::Word) => "Edit the word",
            (PromptKind::EditWord, PromptStep::Definition) => "Edit the definition",
        }
    }
}

/// The two scheduling parameter fields and their inline validation hint.
#[derive(Clone, Debug)]
pub struct ParamEditor {
    pub a: LineInput,
    pub b: LineInput,
    pub focus: Option<ParamField>,
    pub error: Option<String>,
}

impl ParamEditor {
    fn new(a: u32, b: u32) -> Self {
        Self {
            a: LineInput::new(&a.to_string()),
            b: LineInput::new(&b.to_string()),
            focus: None,
            error: None,
        }
    }

    fn focused_input(&mut self) -> Option<&mut LineInput> {
        match self.focus? {
            ParamField::A => Some(&mut self.a),
            ParamField::B => Some(&mut self.b),
        }
    }
}

pub struct App {
    pub config: Config,
    pub theme: &'static Theme,
    pub session: ReviewSession,
    pub params: ParamEditor,
    pub guard: DestructiveActionGuard,
    pub prompt: Option<WordPrompt>,
    pub notice: Option<Notice>,
    pub should_quit: bool,
    queued_notices: VecDeque<Notice>,
    quit_after_notice: bool,
    debouncer: ParamDebouncer,
    dispatcher: Dispatcher,
}

impl App {
    pub fn new(config: Config, theme: &'static Theme, dispatcher: Dispatcher) -> Self {
        let params = ParamEditor::new(config.initial_a, config.initial_b);
        let debouncer = ParamDebouncer::new(config.param_debounce());
        Self {
            config,
            theme,
            session: ReviewSession::new(),
            params,
            guard: DestructiveActionGuard::new(),
            prompt: None,
            notice: None,
            should_quit: false,
            queued_notices: VecDeque::new(),
            quit_after_notice: false,
            debouncer,
            dispatcher,
        }
    }

    /// Load the first card, as a freshly opened page would.
    pub fn start(&mut self) {
        let ticket = self.session.start();
        self.dispatcher.review(ticket);
    }

    /// Whether a modal currently swallows all input.
    pub fn is_blocked(&self) -> bool {
        self.notice.is_some() || self.guard.is_open()
    }

    fn review(&mut self, action: ReviewAction) {
        if let Some(ticket) = self.session.begin(action) {
            self.dispatcher.review(ticket);
        }
    }

    pub fn choose(&mut self, index: usize) {
        let Some(choice) = self.config.choices.get(index) else {
            return;
        };
        let value = choice.value.clone();
        self.review(ReviewAction::Choice(value));
    }

    pub fn mark_mastered(&mut self) {
        self.review(ReviewAction::Mastered);
    }

    pub fn next_word(&mut self) {
        self.review(ReviewAction::Next);
    }

    pub fn prev_word(&mut self) {
        self.review(ReviewAction::Prev);
    }

    pub fn exit_session(&mut self) {
        tracing::info!("exit requested");
        self.dispatcher.exit_session();
    }

    // --- destructive actions ---

    pub fn request_reset(&mut self) {
        self.guard.request(DestructiveAction::ResetProgress);
    }

    pub fn request_delete_file(&mut self) {
        match self.config.file_id {
            Some(id) => {
                self.guard.request(DestructiveAction::DeleteFile {
                    file: FileId(id),
                    shared: self.config.file_shared,
                });
            }
            None => {
                self.show_error("No vocabulary file is selected; start with --file-id to delete one.")
            }
        }
    }

    pub fn answer_confirmation(&mut self, confirmed: bool) {
        match self.guard.resolve(confirmed) {
            Some(DestructiveAction::ResetProgress) => self.review(ReviewAction::Reset),
            Some(DestructiveAction::DeleteFile { file, .. }) => {
                tracing::info!(%file, "deleting file");
                self.dispatcher.delete_file(file);
            }
            None => {}
        }
    }

    // --- notices ---

    fn show_info(&mut self, message: impl Into<String>) {
        self.show(NoticeKind::Info, message.into());
    }

    fn show_error(&mut self, message: impl Into<String>) {
        self.show(NoticeKind::Error, message.into());
    }

    /// An open notice stays up; later ones wait behind it in arrival order.
    fn show(&mut self, kind: NoticeKind, message: String) {
        let notice = Notice { kind, message };
        if self.notice.is_some() {
            self.queued_notices.push_back(notice);
        } else {
            self.notice = Some(notice);
        }
    }

    pub fn dismiss_notice(&mut self) {
        if self.notice.take().is_none() {
            return;
        }
        self.notice = self.queued_notices.pop_front();
        if self.notice.is_none() && self.quit_after_notice {
            self.should_quit = true;
        }
    }

    // --- add / edit prompts ---

    pub fn begin_add_word(&mut self) {
        self.prompt = Some(WordPrompt {
            kind: PromptKind::AddWord,
            step: PromptStep::Word,
            input: LineInput::new(""),
            word: String::new(),
            definition_seed: String::new(),
        });
    }

    pub fn begin_edit_word(&mut self) {
        let current = self
            .session
            .word()
            .map(|w| w.word.clone())
            .unwrap_or_default();
        self.prompt = Some(WordPrompt {
            kind: PromptKind::EditWord,
            step: PromptStep::Word,
            input: LineInput::new(&current),
            word: String::new(),
            definition_seed: self.session.definition().to_string(),
        });
    }

    pub fn prompt_key(&mut self, key: KeyEvent) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };
        match prompt.input.handle(key) {
            InputResult::Cancel => self.prompt = None,
            InputResult::Submit => self.advance_prompt(),
            InputResult::Continue | InputResult::Edited => {}
        }
    }

    fn advance_prompt(&mut self) {
        let Some(mut prompt) = self.prompt.take() else {
            return;
        };
        let value = prompt.input.value().trim().to_string();
        // An empty entry abandons the whole prompt.
        if value.is_empty() {
            return;
        }
        match prompt.step {
            PromptStep::Word => {
                prompt.word = value;
                prompt.step = PromptStep::Definition;
                prompt.input = LineInput::new(&prompt.definition_seed);
                self.prompt = Some(prompt);
            }
            PromptStep::Definition => {
                let draft = WordDraft {
                    word: prompt.word,
                    definition: value,
                };
                let action = match prompt.kind {
                    PromptKind::AddWord => ReviewAction::AddWord(draft),
                    PromptKind::EditWord => ReviewAction::EditWord(draft),
                };
                self.review(action);
            }
        }
    }

    // --- scheduling parameters ---

    pub fn focus_params(&mut self) {
        self.params.focus = match self.params.focus {
            None => Some(ParamField::A),
            Some(ParamField::A) => Some(ParamField::B),
            Some(ParamField::B) => None,
        };
    }

    pub fn param_key(&mut self, key: KeyEvent, now: Instant) {
        let Some(input) = self.params.focused_input() else {
            return;
        };
        match input.handle(key) {
            InputResult::Edited => {
                self.debouncer
                    .on_param_edited(self.params.a.value(), self.params.b.value(), now);
            }
            InputResult::Submit | InputResult::Cancel => self.params.focus = None,
            InputResult::Continue => {}
        }
    }

    /// Periodic housekeeping: flushes a due parameter edit.
    pub fn tick(&mut self, now: Instant) {
        match self.debouncer.poll(now) {
            Some(ParamFlush::Submit { seq, params }) => {
                self.params.error = None;
                tracing::debug!(seq, a = params.a, b = params.b, "submitting parameters");
                self.dispatcher.update_params(seq, params);
            }
            Some(ParamFlush::Invalid(err)) => self.params.error = Some(err.to_string()),
            None => {}
        }
    }

    // --- completions ---

    pub fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Review(ticket, result) => match self.session.complete(&ticket, result) {
                Applied::Updated {
                    announce: Some(message),
                } => self.show_info(message),
                Applied::Updated { announce: None } | Applied::Stale => {}
                Applied::Failed { message } => self.show_error(message),
            },
            Completion::Params(seq, result) => {
                if !self.debouncer.is_latest(seq) {
                    tracing::debug!(seq, "stale parameter reply discarded");
                    return;
                }
                match failure_message(result) {
                    Ok(update) => self.session.set_status(update.status),
                    Err(message) => {
                        tracing::warn!(%message, "parameter update failed");
                        self.show_error(message);
                    }
                }
            }
            Completion::FileDeleted(result) => match failure_message(result) {
                Ok(notice) => {
                    self.show_info(notice.message);
                    let ticket = self.session.reload();
                    self.dispatcher.review(ticket);
                }
                Err(message) => self.show_error(message),
            },
            Completion::Exited(result) => match failure_message(result) {
                Ok(notice) => {
                    self.show_info(notice.message);
                    self.quit_after_notice = true;
                }
                Err(message) => self.show_error(message),
            },
        }
    }
}
