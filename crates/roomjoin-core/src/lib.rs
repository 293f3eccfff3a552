//! Room join negotiation
//!
//! Sans-IO core of the conference-room join protocol: given a room, a base
//! nickname and an optional password, negotiate membership while routing
//! around nickname conflicts and classifying every other rejection.
//!
//! # Architecture
//!
//! The core owns no I/O. The chat session, service discovery, the room
//! registry and the user-facing notification boundary are injected as traits
//! ([`SessionTransport`], [`RoomDiscovery`], [`RoomRegistry`],
//! [`NotificationSink`]). Execution modes and the completion handoff live in
//! `roomjoin-client`.
//!
//! # Components
//!
//! - [`classify`]: maps protocol rejection codes to a [`ReasonCategory`]
//! - [`Nickname`]: base nickname and its candidate sequence
//! - [`JoinCoordinator`]: bounded, sequential retry loop producing a
//!   [`JoinOutcome`]

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod attempt;
mod collaborator;
mod coordinator;
mod error;
mod nickname;
mod outcome;
mod reason;
mod request;
mod room;
mod room_info;

pub use attempt::{AttemptState, JoinAttempt};
pub use collaborator::{
    JoinFailure, NotificationSink, RoomDiscovery, RoomMembership, RoomRegistry, SessionTransport,
};
pub use coordinator::{JoinCoordinator, Negotiation};
pub use error::{DiscoveryError, RequestError};
pub use nickname::{ATTEMPT_LIMIT, Nickname, NicknameSequence, candidate};
pub use outcome::{JoinOrigin, JoinOutcome};
pub use reason::{
    CODE_CONFLICT, CODE_FORBIDDEN, CODE_NO_RESPONSE, CODE_NOT_AUTHORIZED, CODE_NOT_FOUND,
    CODE_REGISTRATION_REQUIRED, ReasonCategory, classify,
};
pub use request::{ExecutionMode, JoinRequest};
pub use room::{RoomId, escape_local_part};
pub use room_info::{FEATURE_PASSWORD_PROTECTED, RoomInfo};
pub use tokio_util::sync::CancellationToken;
