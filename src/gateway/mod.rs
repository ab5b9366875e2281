pub mod dispatch;
pub mod http;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::params::SchedulingParams;

const DEFAULT_FAILURE_MESSAGE: &str = "The trainer reported a failure without details";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub word: String,
    pub definition: String,
    #[serde(default)]
    pub tag: String,
    /// Set by the trainer on its "all words learned" placeholder.
    #[serde(default)]
    pub learned: bool,
}

/// Payload of every endpoint that moves or rewrites the displayed card.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct WordUpdate {
    pub word: Word,
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub can_undo: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Notice {
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply<T> {
    Ok(T),
    Fail { message: String },
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("could not reach the trainer: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("trainer answered with HTTP {0}")]
    Status(u16),
    #[error("malformed trainer response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type GatewayResult<T> = Result<Reply<T>, GatewayError>;

/// Collapses transport failures and backend-reported failures into the
/// message shown to the learner.
pub fn failure_message<T>(result: GatewayResult<T>) -> Result<T, String> {
    match result {
        Ok(Reply::Ok(value)) => Ok(value),
        Ok(Reply::Fail { message }) => Err(message),
        Err(err) => Err(err.to_string()),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WordDraft {
    pub word: String,
    pub definition: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChoiceRequest<'a> {
    pub choice: &'a str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub u64);

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One method per trainer endpoint. Implementations perform exactly one
/// request/response round trip and never touch the display model.
pub trait Backend: Send + Sync {
    fn next_word(&self) -> GatewayResult<WordUpdate>;
    fn prev_word(&self) -> GatewayResult<WordUpdate>;
    fn submit_choice(&self, choice: &str) -> GatewayResult<WordUpdate>;
    fn mark_mastered(&self) -> GatewayResult<WordUpdate>;
    fn reset_progress(&self) -> GatewayResult<WordUpdate>;
    fn add_word(&self, draft: &WordDraft) -> GatewayResult<WordUpdate>;
    fn edit_word(&self, draft: &WordDraft) -> GatewayResult<WordUpdate>;
    fn delete_file(&self, file: FileId) -> GatewayResult<Notice>;
    fn update_params(&self, params: SchedulingParams) -> GatewayResult<StatusUpdate>;
    fn exit_session(&self) -> GatewayResult<Notice>;
}

#[derive(Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

/// Decode a trainer response body: the `success` flag selects between the
/// operation's schema and a failure carrying the trainer's message.
pub fn decode_reply<T: DeserializeOwned>(body: &str) -> GatewayResult<T> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    let envelope = Envelope::deserialize(&value)?;
    if !envelope.success {
        let message = envelope
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
        return Ok(Reply::Fail { message });
    }
    Ok(Reply::Ok(T::deserialize(value)?))
}
