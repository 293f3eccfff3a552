//! Nickname candidates for routing around in-room conflicts.
//!
//! The first attempt uses the base nickname unchanged. Every later attempt
//! appends the decimal attempt number, so `alice` becomes `alice2`, `alice3`
//! and so on. Generation is pure and deterministic; no randomness is involved.

use std::fmt;

use crate::RequestError;

/// Attempt numbers run from 1 up to, but excluding, this limit.
///
/// A negotiation therefore issues at most `ATTEMPT_LIMIT - 1` join calls.
pub const ATTEMPT_LIMIT: u32 = 10;

/// Trimmed, non-empty base nickname.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Nickname(String);

impl Nickname {
    /// Validate a nickname. Surrounding whitespace is trimmed.
    pub fn new(text: &str) -> Result<Self, RequestError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(RequestError::EmptyNickname);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Nickname text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Candidate nickname for the given attempt.
    pub fn candidate(&self, attempt: u32) -> String {
        candidate(&self.0, attempt)
    }

    /// Lazy sequence of `(attempt, candidate)` pairs for one negotiation.
    pub fn candidates(&self) -> NicknameSequence<'_> {
        NicknameSequence { base: &self.0, next_attempt: 1 }
    }
}

impl fmt::Display for Nickname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Candidate nickname for `attempt` (1-based).
///
/// Attempt 1 yields `base` unmodified; attempt `n > 1` yields `base`
/// followed by the decimal digits of `n`.
pub fn candidate(base: &str, attempt: u32) -> String {
    debug_assert!(attempt >= 1, "attempt numbers are 1-based");
    if attempt <= 1 { base.to_string() } else { format!("{base}{attempt}") }
}

/// Iterator over the candidates of a single negotiation.
///
/// Yields attempts `1..ATTEMPT_LIMIT`, computing each candidate only when
/// requested.
#[derive(Debug, Clone)]
pub struct NicknameSequence<'a> {
    base: &'a str,
    next_attempt: u32,
}

impl Iterator for NicknameSequence<'_> {
    type Item = (u32, String);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_attempt >= ATTEMPT_LIMIT {
            return None;
        }
        let attempt = self.next_attempt;
        self.next_attempt += 1;
        Some((attempt, candidate(self.base, attempt)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = ATTEMPT_LIMIT.saturating_sub(self.next_attempt) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for NicknameSequence<'_> {}
