//! Join coordinator behavior tests
//!
//! Drives the coordinator against scripted collaborators and checks exactly
//! which join calls reach the transport for each scenario.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use proptest::prelude::*;
use roomjoin_core::{
    CancellationToken, DiscoveryError, JoinCoordinator, JoinOrigin, JoinOutcome, JoinRequest,
    ReasonCategory, RoomId, RoomMembership, RoomRegistry, candidate,
};
use roomjoin_harness::{MemoryRegistry, Reply, ScriptedTransport, SimSession, StaticDiscovery};

type Coordinator = JoinCoordinator<ScriptedTransport, StaticDiscovery, MemoryRegistry<SimSession>>;

struct Fixture {
    transport: Arc<ScriptedTransport>,
    discovery: Arc<StaticDiscovery>,
    registry: Arc<MemoryRegistry<SimSession>>,
    coordinator: Coordinator,
}

impl Fixture {
    fn new(transport: ScriptedTransport) -> Self {
        Self::with_discovery(transport, StaticDiscovery::new())
    }

    fn with_discovery(transport: ScriptedTransport, discovery: StaticDiscovery) -> Self {
        let transport = Arc::new(transport);
        let discovery = Arc::new(discovery);
        let registry = Arc::new(MemoryRegistry::new());
        let coordinator =
            JoinCoordinator::new(transport.clone(), discovery.clone(), registry.clone());
        Self { transport, discovery, registry, coordinator }
    }
}

fn room() -> RoomId {
    RoomId::parse("dev@conference.example.org").unwrap()
}

fn request(nickname: &str) -> JoinRequest {
    JoinRequest::new(room(), nickname).unwrap()
}

#[test]
fn active_membership_short_circuits_without_transport_calls() {
    let fx = Fixture::new(ScriptedTransport::accepting());
    fx.registry.register(room(), RoomMembership::new(SimSession::new(room(), "alice7"), "alice7"));

    let outcome = fx.coordinator.negotiate(&request("alice"));

    assert_eq!(
        outcome,
        JoinOutcome::Joined { nickname: "alice7".into(), origin: JoinOrigin::Resumed }
    );
    assert_eq!(fx.transport.call_count(), 0);
    assert_eq!(fx.discovery.queries(), 0);
}

#[test]
fn stale_membership_is_negotiated_again() {
    let fx = Fixture::new(ScriptedTransport::accepting());
    let stale = SimSession::new(room(), "alice");
    stale.leave();
    fx.registry.register(room(), RoomMembership::new(stale, "alice"));

    let negotiation = fx.coordinator.negotiate_until(&request("alice"), &CancellationToken::new());

    assert_eq!(
        negotiation.outcome,
        JoinOutcome::Joined {
            nickname: "alice".into(),
            origin: JoinOrigin::Negotiated { attempts: 1 }
        }
    );
    assert!(negotiation.session.is_some_and(|s| s.is_joined()));
    assert_eq!(fx.transport.call_count(), 1);
}

#[test]
fn conflicts_on_every_candidate_exhaust_after_nine_calls() {
    let fx = Fixture::new(ScriptedTransport::rejecting(409));

    let outcome = fx.coordinator.negotiate(&request("alice"));

    assert_eq!(outcome, JoinOutcome::Exhausted { attempts: 9 });
    assert_eq!(fx.transport.call_count(), 9);
    assert_eq!(
        fx.transport.nicknames(),
        ["alice", "alice2", "alice3", "alice4", "alice5", "alice6", "alice7", "alice8", "alice9"]
    );
}

#[test]
fn forbidden_stops_after_one_call() {
    let fx = Fixture::new(ScriptedTransport::new([Reply::Reject(403)]));

    let outcome = fx.coordinator.negotiate(&request("alice"));

    assert_eq!(outcome, JoinOutcome::Rejected(ReasonCategory::Forbidden));
    assert_eq!(fx.transport.call_count(), 1);
}

#[test]
fn success_after_conflict_uses_second_candidate() {
    let fx = Fixture::new(ScriptedTransport::new([Reply::Reject(409), Reply::Accept]));

    let negotiation = fx.coordinator.negotiate_until(&request("alice"), &CancellationToken::new());

    assert_eq!(
        negotiation.outcome,
        JoinOutcome::Joined {
            nickname: "alice2".into(),
            origin: JoinOrigin::Negotiated { attempts: 2 }
        }
    );
    assert_eq!(negotiation.session.unwrap().nickname(), "alice2");
    assert_eq!(fx.transport.nicknames(), ["alice", "alice2"]);
}

#[test]
fn password_gate_blocks_before_any_call() {
    let discovery = StaticDiscovery::new().with_password_protected(room());
    let fx = Fixture::with_discovery(ScriptedTransport::accepting(), discovery);

    let outcome = fx.coordinator.negotiate(&request("alice"));
    assert_eq!(outcome, JoinOutcome::PasswordRequired);

    let outcome = fx.coordinator.negotiate(&request("alice").with_password(Some("")));
    assert_eq!(outcome, JoinOutcome::PasswordRequired);

    assert_eq!(fx.transport.call_count(), 0);
}

#[test]
fn supplied_password_reaches_the_transport() {
    let discovery = StaticDiscovery::new().with_password_protected(room());
    let fx = Fixture::with_discovery(ScriptedTransport::accepting(), discovery);

    let outcome = fx.coordinator.negotiate(&request("alice").with_password(Some("hunter2")));

    assert!(outcome.is_joined());
    assert_eq!(fx.transport.calls()[0].password.as_deref(), Some("hunter2"));
}

#[test]
fn discovery_failure_is_treated_as_open_room() {
    // The later 401 surfaces as a mismatch, not as "password required".
    let discovery = StaticDiscovery::new().with_failure(room(), DiscoveryError::NoResponse);
    let fx = Fixture::with_discovery(ScriptedTransport::new([Reply::Reject(401)]), discovery);

    let outcome = fx.coordinator.negotiate(&request("alice"));

    assert_eq!(outcome, JoinOutcome::Rejected(ReasonCategory::PasswordMismatch));
    assert_eq!(fx.transport.call_count(), 1);
    assert_eq!(fx.transport.calls()[0].password, None);
}

#[test]
fn unknown_code_is_terminal() {
    let fx = Fixture::new(ScriptedTransport::new([Reply::Reject(409), Reply::Reject(503)]));

    let outcome = fx.coordinator.negotiate(&request("alice"));

    assert_eq!(outcome, JoinOutcome::Rejected(ReasonCategory::UnknownRejection));
    assert_eq!(fx.transport.call_count(), 2);
}

#[test]
fn cancelled_before_start_issues_no_calls() {
    let fx = Fixture::new(ScriptedTransport::accepting());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let negotiation = fx.coordinator.negotiate_until(&request("alice"), &cancel);

    assert_eq!(negotiation.outcome, JoinOutcome::Cancelled);
    assert!(negotiation.session.is_none());
    assert_eq!(fx.transport.call_count(), 0);
}

#[test]
fn cancellation_stops_after_the_in_flight_attempt() {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let transport = ScriptedTransport::rejecting(409).with_observer(move |call| {
        if call.nickname == "alice3" {
            trigger.cancel();
        }
    });
    let fx = Fixture::new(transport);

    let outcome = fx.coordinator.negotiate_until(&request("alice"), &cancel).outcome;

    assert_eq!(outcome, JoinOutcome::Cancelled);
    assert_eq!(fx.transport.call_count(), 3);
}

#[test]
fn in_flight_success_is_kept_after_cancellation() {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let transport = ScriptedTransport::accepting().with_observer(move |_| trigger.cancel());
    let fx = Fixture::new(transport);

    let outcome = fx.coordinator.negotiate_until(&request("alice"), &cancel).outcome;

    assert_eq!(outcome.nickname(), Some("alice"));
    assert_eq!(fx.transport.call_count(), 1);
}

#[test]
fn coordinator_never_writes_the_registry() {
    let fx = Fixture::new(ScriptedTransport::accepting());

    let outcome = fx.coordinator.negotiate(&request("alice"));

    assert!(outcome.is_joined());
    assert!(fx.registry.is_empty());
    assert_eq!(fx.registry.lookups(), 1);
}

/// Rejection codes other than a nickname conflict.
fn terminal_code() -> impl Strategy<Value = u16> {
    any::<u16>().prop_filter("conflicts are retried", |code| *code != 409)
}

proptest! {
    #[test]
    fn prop_conflicts_then_accept_joins_with_matching_candidate(conflicts in 0usize..9) {
        let script = std::iter::repeat_n(Reply::Reject(409), conflicts).chain([Reply::Accept]);
        let fx = Fixture::new(ScriptedTransport::new(script));

        let outcome = fx.coordinator.negotiate(&request("dana"));

        let attempts = conflicts as u32 + 1;
        prop_assert_eq!(
            outcome,
            JoinOutcome::Joined {
                nickname: candidate("dana", attempts),
                origin: JoinOrigin::Negotiated { attempts },
            }
        );
        prop_assert_eq!(fx.transport.call_count(), conflicts + 1);
    }

    #[test]
    fn prop_terminal_code_stops_immediately(conflicts in 0usize..9, code in terminal_code()) {
        let script = std::iter::repeat_n(Reply::Reject(409), conflicts).chain([Reply::Reject(code)]);
        let fx = Fixture::new(ScriptedTransport::new(script));

        let outcome = fx.coordinator.negotiate(&request("erin"));

        prop_assert_eq!(outcome, JoinOutcome::Rejected(roomjoin_core::classify(code)));
        prop_assert_eq!(fx.transport.call_count(), conflicts + 1);
    }

    #[test]
    fn prop_transport_is_never_called_ten_times(script in prop::collection::vec(
        prop_oneof![Just(Reply::Reject(409)), Just(Reply::Accept), terminal_code().prop_map(Reply::Reject)],
        0..20,
    )) {
        let fx = Fixture::new(ScriptedTransport::new(script).with_fallback(Reply::Reject(409)));

        let _ = fx.coordinator.negotiate(&request("frank"));

        prop_assert!(fx.transport.call_count() <= 9);
    }
}
