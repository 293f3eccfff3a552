//! Join service.
//!
//! [`JoinService`] runs the coordinator in the execution mode a request asks
//! for and then does what the caller must do with a terminal outcome:
//! register and activate a new membership, re-activate a resumed one, and
//! hand every outcome to the notification sink.
//!
//! # Execution modes
//!
//! - **Blocking**: negotiation, registry glue and the caller's handler all
//!   run on the calling thread before [`JoinService::join`] returns.
//! - **Async**: negotiation runs on the runtime's blocking pool. When the
//!   retry loop has finished, the registry glue and the handler are posted
//!   together to the [`CompletionQueue`](crate::CompletionQueue) and run when
//!   its owner drains it.

use std::sync::Arc;

use roomjoin_core::{
    ExecutionMode, JoinCoordinator, JoinOrigin, JoinOutcome, JoinRequest, Negotiation,
    NotificationSink, RoomDiscovery, RoomId, RoomMembership, RoomRegistry, SessionTransport,
};
use tokio::{runtime::Handle, sync::oneshot, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::{CompletionSender, ServiceError};

/// Entry point for joining rooms.
pub struct JoinService<T, D, R, N> {
    coordinator: Arc<JoinCoordinator<T, D, R>>,
    sink: Arc<N>,
    runtime: Handle,
    completions: CompletionSender,
}

impl<T, D, R, N> JoinService<T, D, R, N>
where
    T: SessionTransport + 'static,
    D: RoomDiscovery + 'static,
    R: RoomRegistry<Session = T::Session> + 'static,
    N: NotificationSink + 'static,
{
    /// Create a service.
    ///
    /// Async negotiations are spawned on `runtime`; their completions are
    /// posted through `completions`.
    pub fn new(
        coordinator: JoinCoordinator<T, D, R>,
        sink: Arc<N>,
        runtime: Handle,
        completions: CompletionSender,
    ) -> Self {
        Self { coordinator: Arc::new(coordinator), sink, runtime, completions }
    }

    /// Join in the mode `request` asks for, calling `on_complete` exactly once
    /// with the terminal outcome.
    ///
    /// If a collaborator panics during an async negotiation there is no
    /// outcome: `on_complete` is dropped without running, nothing reaches the
    /// registry or the sink, and [`JoinTicket::outcome`] returns
    /// [`ServiceError::WorkerPanicked`]. In Blocking mode the panic unwinds
    /// into the caller.
    pub fn join<F>(&self, request: JoinRequest, on_complete: F) -> JoinTicket
    where
        F: FnOnce(&JoinOutcome) + Send + 'static,
    {
        self.join_until(request, &CancellationToken::new(), on_complete)
    }

    /// Like [`join`](Self::join), but also stops issuing join calls once
    /// `cancel` fires.
    ///
    /// The returned ticket's own cancellation is a child of `cancel`.
    pub fn join_until<F>(
        &self,
        request: JoinRequest,
        cancel: &CancellationToken,
        on_complete: F,
    ) -> JoinTicket
    where
        F: FnOnce(&JoinOutcome) + Send + 'static,
    {
        match request.mode() {
            ExecutionMode::Blocking => {
                let outcome = self.settle_on_caller(&request, cancel);
                on_complete(&outcome);
                JoinTicket::settled(outcome)
            },
            ExecutionMode::Async => self.spawn(request, cancel.child_token(), on_complete),
        }
    }

    /// Negotiate and settle on the calling thread.
    pub fn join_blocking(&self, request: &JoinRequest) -> JoinOutcome {
        self.settle_on_caller(request, &CancellationToken::new())
    }

    /// Negotiate on a worker and settle on the completion context.
    ///
    /// The handler runs after the worker's last join call has returned and
    /// after the registry glue, never before.
    pub fn join_async<F>(&self, request: JoinRequest, on_complete: F) -> JoinTicket
    where
        F: FnOnce(&JoinOutcome) + Send + 'static,
    {
        self.spawn(request, CancellationToken::new(), on_complete)
    }

    fn settle_on_caller(&self, request: &JoinRequest, cancel: &CancellationToken) -> JoinOutcome {
        let negotiation = self.coordinator.negotiate_until(request, cancel);
        let registry = self.coordinator.registry().as_ref();
        settle(registry, self.sink.as_ref(), request.room_id(), negotiation)
    }

    fn spawn<F>(
        &self,
        request: JoinRequest,
        cancel: CancellationToken,
        on_complete: F,
    ) -> JoinTicket
    where
        F: FnOnce(&JoinOutcome) + Send + 'static,
    {
        let token = cancel.clone();
        let coordinator = Arc::clone(&self.coordinator);
        let sink = Arc::clone(&self.sink);
        let completions = self.completions.clone();
        let (delivered_tx, delivered_rx) = oneshot::channel();

        let worker = self.runtime.spawn_blocking(move || {
            let negotiation = coordinator.negotiate_until(&request, &token);
            let registry = Arc::clone(coordinator.registry());
            let room_id = request.room_id().clone();

            let posted = completions.post(move || {
                let outcome = settle(registry.as_ref(), sink.as_ref(), &room_id, negotiation);
                on_complete(&outcome);
                // Ticket may have been dropped; delivery already happened.
                let _ = delivered_tx.send(outcome);
            });
            if let Err(e) = posted {
                tracing::warn!(room = %request.room_id(), error = %e, "outcome not delivered");
            }
        });

        JoinTicket { cancel, state: TicketState::Pending { worker, delivered: delivered_rx } }
    }
}

/// Apply a terminal outcome to the registry and notify the sink.
fn settle<R, N>(
    registry: &R,
    sink: &N,
    room_id: &RoomId,
    negotiation: Negotiation<R::Session>,
) -> JoinOutcome
where
    R: RoomRegistry + ?Sized,
    N: NotificationSink + ?Sized,
{
    let Negotiation { outcome, session } = negotiation;

    match (&outcome, session) {
        (
            JoinOutcome::Joined { nickname, origin: JoinOrigin::Negotiated { .. } },
            Some(session),
        ) => {
            registry.register(room_id.clone(), RoomMembership::new(session, nickname.clone()));
            activate(registry, room_id);
        },
        (JoinOutcome::Joined { origin: JoinOrigin::Resumed, .. }, _) => {
            activate(registry, room_id);
        },
        _ => {},
    }

    sink.notify(room_id, &outcome);
    outcome
}

fn activate<R: RoomRegistry + ?Sized>(registry: &R, room_id: &RoomId) {
    if !registry.activate(room_id) {
        // Another writer removed the room between negotiation and settling.
        tracing::warn!(room = %room_id, "joined room vanished from registry before activation");
    }
}

enum TicketState {
    Settled(JoinOutcome),
    Pending { worker: JoinHandle<()>, delivered: oneshot::Receiver<JoinOutcome> },
}

/// Handle to a submitted join.
pub struct JoinTicket {
    cancel: CancellationToken,
    state: TicketState,
}

impl JoinTicket {
    fn settled(outcome: JoinOutcome) -> Self {
        Self { cancel: CancellationToken::new(), state: TicketState::Settled(outcome) }
    }

    /// Stop issuing further join calls. The call in flight is not retracted.
    ///
    /// Has no effect on a settled ticket.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the outcome was already delivered when the ticket was issued.
    pub fn is_settled(&self) -> bool {
        matches!(self.state, TicketState::Settled(_))
    }

    /// Wait until the outcome has been delivered to the handler.
    ///
    /// For async joins this resolves only after the completion context has
    /// run the completion.
    pub async fn outcome(self) -> Result<JoinOutcome, ServiceError> {
        match self.state {
            TicketState::Settled(outcome) => Ok(outcome),
            TicketState::Pending { worker, delivered } => match delivered.await {
                Ok(outcome) => Ok(outcome),
                Err(_) => match worker.await {
                    Ok(()) => Err(ServiceError::ContextClosed),
                    Err(e) if e.is_panic() => Err(ServiceError::WorkerPanicked),
                    Err(_) => Err(ServiceError::WorkerAborted),
                },
            },
        }
    }
}
