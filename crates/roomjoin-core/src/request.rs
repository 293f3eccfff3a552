//! Join requests.

use crate::{Nickname, RequestError, RoomId};

/// How a negotiation is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Runs to completion on the caller's thread.
    #[default]
    Blocking,
    /// Runs on a worker; the outcome is handed back to a completion context.
    Async,
}

/// Intent to join one room under a base nickname.
///
/// Immutable once built. An empty password is stored as no password at all,
/// so the transport never sees an explicit empty credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    room_id: RoomId,
    nickname: Nickname,
    password: Option<String>,
    mode: ExecutionMode,
}

impl JoinRequest {
    /// Create a blocking request without a password.
    pub fn new(room_id: RoomId, nickname: &str) -> Result<Self, RequestError> {
        Ok(Self {
            room_id,
            nickname: Nickname::new(nickname)?,
            password: None,
            mode: ExecutionMode::Blocking,
        })
    }

    /// Attach a password. `None` or an empty string both mean "not supplied".
    #[must_use]
    pub fn with_password(mut self, password: Option<impl Into<String>>) -> Self {
        self.password = password.map(Into::into).filter(|p| !p.is_empty());
        self
    }

    /// Select the execution mode.
    #[must_use]
    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Target room.
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Base nickname.
    pub fn nickname(&self) -> &Nickname {
        &self.nickname
    }

    /// Supplied password, never empty.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Execution mode.
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }
}
