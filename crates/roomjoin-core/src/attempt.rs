//! Per-candidate attempt records.

use crate::{ReasonCategory, classify};

/// State of a single join attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    /// Join call issued, result not yet known.
    Pending,
    /// Service accepted the join.
    Succeeded,
    /// Service rejected the join with a protocol code.
    Failed {
        /// Raw rejection code.
        code: u16,
    },
}

/// One candidate nickname tried during a negotiation.
///
/// Owned by the retry loop and discarded once classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinAttempt {
    number: u32,
    nickname: String,
    state: AttemptState,
}

impl JoinAttempt {
    /// Start a pending attempt.
    pub fn new(number: u32, nickname: String) -> Self {
        Self { number, nickname, state: AttemptState::Pending }
    }

    /// 1-based attempt number.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Candidate nickname used for this attempt.
    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    /// Current state.
    pub fn state(&self) -> AttemptState {
        self.state
    }

    /// Record the service's answer.
    pub fn resolve(&mut self, result: Result<(), u16>) {
        debug_assert_eq!(self.state, AttemptState::Pending, "attempt resolved twice");
        self.state = match result {
            Ok(()) => AttemptState::Succeeded,
            Err(code) => AttemptState::Failed { code },
        };
    }

    /// Rejection category. `None` while pending or after success.
    pub fn reason(&self) -> Option<ReasonCategory> {
        match self.state {
            AttemptState::Failed { code } => Some(classify(code)),
            AttemptState::Pending | AttemptState::Succeeded => None,
        }
    }

    /// Consume the attempt, returning the candidate nickname.
    pub fn into_nickname(self) -> String {
        self.nickname
    }
}
