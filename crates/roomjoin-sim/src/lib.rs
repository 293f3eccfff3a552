//! Room join simulation.
//!
//! Wires the join service to the in-memory harness collaborators and runs a
//! single negotiation, driving the completion queue the way a UI loop would.
//! The transport script, discovery answers and registry contents all come
//! from [`SimulationConfig`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

pub use error::SimError;
use roomjoin_client::{CompletionQueue, JoinService, JoinTicket, completion_channel};
use roomjoin_core::{
    CancellationToken, DiscoveryError, ExecutionMode, JoinCoordinator, JoinOutcome, JoinRequest,
    RoomId, RoomMembership, RoomRegistry,
};
use roomjoin_harness::{
    MemoryRegistry, RecordingSink, Reply, ScriptedTransport, SimSession, StaticDiscovery,
};
use tokio::runtime::Handle;

/// Simulation parameters.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Room to join (`local@service`)
    pub room: String,
    /// Base nickname
    pub nickname: String,
    /// Password supplied with the request
    pub password: Option<String>,
    /// Discovery reports the room as password protected
    pub password_protected: bool,
    /// Discovery fails with no response
    pub discovery_fails: bool,
    /// Rejection codes answered in order before the transport accepts
    pub rejections: Vec<u16>,
    /// Registry already holds a live membership for the room
    pub already_joined: bool,
    /// Execution mode of the request
    pub mode: ExecutionMode,
    /// Cancel once this many join calls have been issued
    pub cancel_after: Option<usize>,
    /// Simulated round-trip of each join call
    pub latency: Option<Duration>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            room: "lobby@conference.example.org".to_string(),
            nickname: "guest".to_string(),
            password: None,
            password_protected: false,
            discovery_fails: false,
            rejections: Vec::new(),
            already_joined: false,
            mode: ExecutionMode::Blocking,
            cancel_after: None,
            latency: None,
        }
    }
}

/// What a simulated join produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationReport {
    /// Terminal outcome delivered to the handler
    pub outcome: JoinOutcome,
    /// Join calls that reached the transport
    pub transport_calls: usize,
    /// Room the registry considers active afterwards
    pub active_room: Option<RoomId>,
}

impl SimulationReport {
    /// Whether the simulated user ended up in the room.
    pub fn is_joined(&self) -> bool {
        self.outcome.is_joined()
    }
}

/// Run one negotiation as described by `config`.
///
/// Must be called from within a multi-threaded tokio runtime when the mode
/// is [`ExecutionMode::Async`].
pub async fn run(config: &SimulationConfig) -> Result<SimulationReport, SimError> {
    let room_id = RoomId::parse(&config.room)?;
    let request = JoinRequest::new(room_id.clone(), &config.nickname)?
        .with_password(config.password.clone())
        .with_mode(config.mode);

    let cancel = CancellationToken::new();
    let transport = Arc::new(scripted_transport(config, &cancel));
    let discovery = Arc::new(static_discovery(config, &room_id));
    let registry: Arc<MemoryRegistry<SimSession>> = Arc::new(MemoryRegistry::new());
    if config.already_joined {
        let nickname = request.nickname().as_str();
        let session = SimSession::new(room_id.clone(), nickname);
        registry.register(room_id.clone(), RoomMembership::new(session, nickname));
    }

    let (completions, queue) = completion_channel();
    let coordinator =
        JoinCoordinator::new(Arc::clone(&transport), discovery, Arc::clone(&registry));
    let sink = Arc::new(RecordingSink::new());
    let service = JoinService::new(coordinator, sink, Handle::current(), completions);

    tracing::info!(room = %room_id, mode = ?config.mode, "starting join");
    let ticket = service.join_until(request, &cancel, |outcome| {
        tracing::debug!(?outcome, "completion handler invoked");
    });
    let outcome = await_delivery(service, ticket, queue).await?;

    Ok(SimulationReport {
        outcome,
        transport_calls: transport.call_count(),
        active_room: registry.active_room(),
    })
}

/// Drain `queue` until the join behind `ticket` has been delivered.
///
/// Takes the service so that its completion sender is gone: the queue then
/// closes once the worker finishes, including when the worker dies without
/// posting, and the ticket's error is returned instead of waiting forever.
pub async fn await_delivery<T, D, R, N>(
    service: JoinService<T, D, R, N>,
    ticket: JoinTicket,
    mut queue: CompletionQueue,
) -> Result<JoinOutcome, SimError> {
    drop(service);
    while queue.run_next().await {}
    Ok(ticket.outcome().await?)
}

fn scripted_transport(config: &SimulationConfig, cancel: &CancellationToken) -> ScriptedTransport {
    let script = config.rejections.iter().copied().map(Reply::Reject);
    let mut transport = ScriptedTransport::new(script);

    if let Some(latency) = config.latency {
        transport = transport.with_latency(latency);
    }

    if let Some(limit) = config.cancel_after {
        let issued = AtomicUsize::new(0);
        let cancel = cancel.clone();
        transport = transport.with_observer(move |call| {
            if issued.fetch_add(1, Ordering::SeqCst) + 1 >= limit {
                tracing::debug!(nickname = %call.nickname, "cancelling after this call");
                cancel.cancel();
            }
        });
    }

    transport
}

fn static_discovery(config: &SimulationConfig, room_id: &RoomId) -> StaticDiscovery {
    let mut discovery = StaticDiscovery::new();
    if config.password_protected {
        discovery = discovery.with_password_protected(room_id.clone());
    }
    if config.discovery_fails {
        discovery = discovery.with_failure(room_id.clone(), DiscoveryError::NoResponse);
    }
    discovery
}
