//! Join negotiation.
//!
//! [`JoinCoordinator`] turns a [`JoinRequest`] into exactly one
//! [`JoinOutcome`]:
//!
//! 1. An active membership in the registry short-circuits to `Joined`.
//! 2. A password-protected room without a supplied password yields
//!    `PasswordRequired` before any join call.
//! 3. Otherwise candidate nicknames are tried one at a time until the service
//!    accepts one, rejects for a non-conflict reason, or the attempt budget
//!    runs out.
//!
//! The coordinator only reads the registry. Registering and activating a new
//! membership is left to the caller once it holds the outcome.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::{
    JoinAttempt, JoinOrigin, JoinOutcome, JoinRequest, RoomDiscovery, RoomId, RoomRegistry,
    SessionTransport,
};

/// Result of a negotiation together with the live session it produced.
///
/// `session` is `Some` only for a freshly negotiated `Joined` outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Negotiation<S> {
    /// Terminal outcome.
    pub outcome: JoinOutcome,
    /// Session of a newly established membership.
    pub session: Option<S>,
}

impl<S> Negotiation<S> {
    fn settled(outcome: JoinOutcome) -> Self {
        Self { outcome, session: None }
    }
}

/// Negotiation engine over injected collaborators.
///
/// Stateless between calls; one coordinator can serve any number of
/// sequential or concurrent negotiations for different rooms.
pub struct JoinCoordinator<T, D, R> {
    transport: Arc<T>,
    discovery: Arc<D>,
    registry: Arc<R>,
}

impl<T, D, R> JoinCoordinator<T, D, R>
where
    T: SessionTransport,
    D: RoomDiscovery,
    R: RoomRegistry<Session = T::Session>,
{
    /// Create a coordinator.
    pub fn new(transport: Arc<T>, discovery: Arc<D>, registry: Arc<R>) -> Self {
        Self { transport, discovery, registry }
    }

    /// Shared room registry.
    pub fn registry(&self) -> &Arc<R> {
        &self.registry
    }

    /// Negotiate to completion on the current thread.
    pub fn negotiate(&self, request: &JoinRequest) -> JoinOutcome {
        self.negotiate_until(request, &CancellationToken::new()).outcome
    }

    /// Negotiate, checking `cancel` before every join call.
    ///
    /// A cancelled negotiation stops issuing attempts but never retracts the
    /// one already in flight: if that attempt succeeds the outcome is still
    /// `Joined`.
    pub fn negotiate_until(
        &self,
        request: &JoinRequest,
        cancel: &CancellationToken,
    ) -> Negotiation<T::Session> {
        let room_id = request.room_id();

        if let Some(nickname) = self.active_membership(room_id) {
            tracing::info!(room = %room_id, %nickname, "already in room, resuming membership");
            return Negotiation::settled(JoinOutcome::Joined {
                nickname,
                origin: JoinOrigin::Resumed,
            });
        }

        if request.password().is_none() && self.password_required(room_id) {
            tracing::info!(room = %room_id, "room requires a password");
            return Negotiation::settled(JoinOutcome::PasswordRequired);
        }

        self.run_attempts(request, cancel)
    }

    /// Nickname of a registered membership that is still live.
    fn active_membership(&self, room_id: &RoomId) -> Option<String> {
        let membership = self.registry.lookup(room_id)?;
        if self.transport.is_joined(&membership.session) {
            Some(membership.nickname)
        } else {
            tracing::debug!(room = %room_id, "registered membership is no longer joined");
            None
        }
    }

    /// Discovery failures count as "no password required".
    fn password_required(&self, room_id: &RoomId) -> bool {
        match self.discovery.requires_password(room_id) {
            Ok(required) => required,
            Err(e) => {
                tracing::warn!(room = %room_id, error = %e, "password check failed, assuming none");
                false
            },
        }
    }

    fn run_attempts(
        &self,
        request: &JoinRequest,
        cancel: &CancellationToken,
    ) -> Negotiation<T::Session> {
        let room_id = request.room_id();
        let mut issued: u32 = 0;

        for (number, candidate) in request.nickname().candidates() {
            if cancel.is_cancelled() {
                tracing::info!(room = %room_id, issued, "negotiation cancelled");
                return Negotiation::settled(JoinOutcome::Cancelled);
            }

            let mut attempt = JoinAttempt::new(number, candidate);
            tracing::debug!(
                room = %room_id,
                attempt = attempt.number(),
                nickname = attempt.nickname(),
                "issuing join"
            );

            let result = self.transport.join_room(room_id, attempt.nickname(), request.password());
            issued += 1;

            match result {
                Ok(session) => {
                    attempt.resolve(Ok(()));
                    let nickname = attempt.into_nickname();
                    tracing::info!(room = %room_id, %nickname, attempts = issued, "joined room");
                    return Negotiation {
                        outcome: JoinOutcome::Joined {
                            nickname,
                            origin: JoinOrigin::Negotiated { attempts: issued },
                        },
                        session: Some(session),
                    };
                },
                Err(failure) => attempt.resolve(Err(failure.code)),
            }

            if let Some(reason) = attempt.reason() {
                tracing::debug!(
                    room = %room_id,
                    attempt = attempt.number(),
                    state = ?attempt.state(),
                    ?reason,
                    "join rejected"
                );
                if reason.is_terminal() {
                    tracing::info!(room = %room_id, ?reason, "join refused");
                    return Negotiation::settled(JoinOutcome::Rejected(reason));
                }
            }
        }

        tracing::info!(room = %room_id, attempts = issued, "every candidate nickname was taken");
        Negotiation::settled(JoinOutcome::Exhausted { attempts: issued })
    }
}
