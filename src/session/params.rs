use std::num::IntErrorKind;
use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;

pub const PARAM_MIN: u32 = 1;
pub const PARAM_MAX: u32 = 100;

/// The two re-insertion knobs of the trainer's scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SchedulingParams {
    pub a: u32,
    pub b: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamField {
    A,
    B,
}

impl ParamField {
    pub fn label(self) -> &'static str {
        match self {
            ParamField::A => "a",
            ParamField::B => "b",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("{} must be a whole number", .0.label())]
    NotInteger(ParamField),
    #[error("{} must be between 1 and 100, got {}", .0.label(), .1)]
    OutOfRange(ParamField, String),
}

impl SchedulingParams {
    pub fn parse(a_raw: &str, b_raw: &str) -> Result<Self, ParamError> {
        Ok(Self {
            a: parse_field(ParamField::A, a_raw)?,
            b: parse_field(ParamField::B, b_raw)?,
        })
    }
}

fn parse_field(field: ParamField, raw: &str) -> Result<u32, ParamError> {
    let raw = raw.trim();
    let value: i64 = raw.parse().map_err(|err: std::num::ParseIntError| match err.kind() {
        // Too many digits is still a whole number, just a huge one.
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            ParamError::OutOfRange(field, raw.to_string())
        }
        _ => ParamError::NotInteger(field),
    })?;
    if value < PARAM_MIN as i64 || value > PARAM_MAX as i64 {
        return Err(ParamError::OutOfRange(field, raw.to_string()));
    }
    Ok(value as u32)
}

/// What a due debounce window resolved to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamFlush {
    Submit { seq: u64, params: SchedulingParams },
    Invalid(ParamError),
}

struct PendingEdit {
    a_raw: String,
    b_raw: String,
    edited_at: Instant,
}

/// Trailing-edge debounce for parameter edits. Every edit restarts the quiet
/// period; `poll` flushes at most once per window.
pub struct ParamDebouncer {
    quiet: Duration,
    pending: Option<PendingEdit>,
    next_seq: u64,
    latest_seq: Option<u64>,
}

impl ParamDebouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            next_seq: 0,
            latest_seq: None,
        }
    }


    pub fn on_param_edited(&mut self, a_raw: &str, b_raw: &str, now: Instant) {
        self.pending = Some(PendingEdit {
            a_raw: a_raw.to_string(),
            b_raw: b_raw.to_string(),
            edited_at: now,
        });
    }


    pub fn poll(&mut self, now: Instant) -> Option<ParamFlush> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|p| now.saturating_duration_since(p.edited_at) >= self.quiet);
        if !due {
            return None;
        }
        let edit = self.pending.take()?;

        match SchedulingParams::parse(&edit.a_raw, &edit.b_raw) {
            Ok(params) => {
                self.next_seq += 1;
                self.latest_seq = Some(self.next_seq);
                Some(ParamFlush::Submit {
                    seq: self.next_seq,
                    params,
                })
            }
            Err(err) => {
                tracing::debug!(%err, "parameter edit rejected");
                Some(ParamFlush::Invalid(err))
            }
        }
    }

    /// Whether a status reply for submission `seq` is still the newest one.
    pub fn is_latest(&self, seq: u64) -> bool {
        self.latest_seq == Some(seq)
    }
}
