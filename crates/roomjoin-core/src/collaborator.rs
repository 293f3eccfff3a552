//! Capabilities the negotiation consumes from its surroundings.
//!
//! The core never talks to a network, a UI or a settings store directly.
//! Everything outside the negotiation algorithm is reached through these
//! traits, so production code and deterministic tests drive the exact same
//! coordinator.
//!
//! # Implementations
//!
//! - **Production**: an adapter over the chat session (join, presence) and
//!   its service-discovery client.
//! - **Testing**: the scripted collaborators in `roomjoin-harness`.

use thiserror::Error;

use crate::{DiscoveryError, JoinOutcome, RoomId, RoomInfo};

/// A rejected join, carrying the protocol code the service answered with.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("join rejected with code {code}")]
pub struct JoinFailure {
    /// Protocol rejection code. `0` means the service never answered.
    pub code: u16,
}

impl JoinFailure {
    /// Failure with an explicit code.
    pub fn new(code: u16) -> Self {
        Self { code }
    }

    /// Failure for a join that timed out without a response.
    pub fn no_response() -> Self {
        Self { code: crate::CODE_NO_RESPONSE }
    }
}

/// Chat session capable of entering rooms.
///
/// `join_room` is the only call in a negotiation that may block. It is never
/// invoked concurrently by the same negotiation.
pub trait SessionTransport: Send + Sync {
    /// Live handle to a room membership.
    type Session: Clone + Send + Sync + 'static;

    /// Enter `room_id` as `nickname`.
    ///
    /// `password` is `None` when no credential was supplied; it is never
    /// `Some("")`.
    ///
    /// # Errors
    ///
    /// Returns the service's rejection code when the join is refused.
    fn join_room(
        &self,
        room_id: &RoomId,
        nickname: &str,
        password: Option<&str>,
    ) -> Result<Self::Session, JoinFailure>;

    /// Whether the session still holds active membership.
    fn is_joined(&self, session: &Self::Session) -> bool;
}

/// Service discovery for room metadata.
pub trait RoomDiscovery: Send + Sync {
    /// Metadata for `room_id`.
    fn room_info(&self, room_id: &RoomId) -> Result<RoomInfo, DiscoveryError>;

    /// Whether the room requires a password to enter.
    fn requires_password(&self, room_id: &RoomId) -> Result<bool, DiscoveryError> {
        self.room_info(room_id).map(|info| info.is_password_protected())
    }
}

/// Registry entry for a room the client is (or was) in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomMembership<S> {
    /// Session handle backing the membership.
    pub session: S,
    /// Nickname the membership was established under.
    pub nickname: String,
}

impl<S> RoomMembership<S> {
    /// Create a membership entry.
    pub fn new(session: S, nickname: impl Into<String>) -> Self {
        Self { session, nickname: nickname.into() }
    }
}

/// Process-wide map from room to membership.
///
/// Shared between the coordinator (reads) and the caller (writes after a
/// join). Implementations provide their own synchronization; the last
/// registration for a room wins.
pub trait RoomRegistry: Send + Sync {
    /// Session handle type stored in entries.
    type Session;

    /// Membership for `room_id`, if one is registered.
    fn lookup(&self, room_id: &RoomId) -> Option<RoomMembership<Self::Session>>;

    /// Store `membership` for `room_id`, replacing any previous entry.
    fn register(&self, room_id: RoomId, membership: RoomMembership<Self::Session>);

    /// Bring the room to the foreground. Returns `false` if it is not
    /// registered.
    fn activate(&self, room_id: &RoomId) -> bool;
}

/// User-facing boundary that renders terminal outcomes.
pub trait NotificationSink: Send + Sync {
    /// Receive the terminal outcome of a negotiation for `room_id`.
    fn notify(&self, room_id: &RoomId, outcome: &JoinOutcome);
}
