//! Scripted session transport.

use std::{
    collections::VecDeque,
    fmt,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use roomjoin_core::{JoinFailure, RoomId, SessionTransport};

use crate::lock;

/// Scripted answer to one join call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// Accept the join.
    Accept,
    /// Reject with a protocol code.
    Reject(u16),
}

/// One join call as the transport saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinCall {
    /// Target room.
    pub room_id: RoomId,
    /// Candidate nickname.
    pub nickname: String,
    /// Password passed to the transport.
    pub password: Option<String>,
}

/// Session handle produced by [`ScriptedTransport`].
///
/// Clones share the joined flag, so [`SimSession::leave`] on any clone is
/// visible through the registry's copy.
#[derive(Debug, Clone)]
pub struct SimSession {
    room_id: RoomId,
    nickname: String,
    joined: Arc<AtomicBool>,
}

impl SimSession {
    /// Create a session that is currently joined.
    pub fn new(room_id: RoomId, nickname: impl Into<String>) -> Self {
        Self { room_id, nickname: nickname.into(), joined: Arc::new(AtomicBool::new(true)) }
    }

    /// Room the session belongs to.
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Nickname the session joined under.
    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    /// Whether the session still holds membership.
    pub fn is_joined(&self) -> bool {
        self.joined.load(Ordering::Acquire)
    }

    /// Simulate the membership ending (kicked, disconnected, left).
    pub fn leave(&self) {
        self.joined.store(false, Ordering::Release);
    }
}

type Observer = Box<dyn Fn(&JoinCall) + Send + Sync>;

/// Transport that answers join calls from a script.
///
/// Replies are consumed in order; once the script runs out every further
/// call gets the fallback reply ([`Reply::Accept`] unless changed).
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Reply>>,
    fallback: Reply,
    latency: Option<Duration>,
    observer: Option<Observer>,
    calls: Mutex<Vec<JoinCall>>,
    returned: AtomicUsize,
}

impl fmt::Debug for ScriptedTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedTransport")
            .field("fallback", &self.fallback)
            .field("latency", &self.latency)
            .field("calls", &self.call_count())
            .field("returned", &self.returned_count())
            .finish_non_exhaustive()
    }
}

impl ScriptedTransport {
    /// Transport answering with `replies`, then accepting.
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            script: Mutex::new(replies.into_iter().collect()),
            fallback: Reply::Accept,
            latency: None,
            observer: None,
            calls: Mutex::new(Vec::new()),
            returned: AtomicUsize::new(0),
        }
    }

    /// Transport that accepts every join.
    pub fn accepting() -> Self {
        Self::new([])
    }

    /// Transport that rejects every join with `code`.
    pub fn rejecting(code: u16) -> Self {
        Self::new([]).with_fallback(Reply::Reject(code))
    }

    /// Reply used once the script is exhausted.
    #[must_use]
    pub fn with_fallback(mut self, reply: Reply) -> Self {
        self.fallback = reply;
        self
    }

    /// Block every join call for `latency` before answering.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Run `observer` on every call, after recording it and before answering.
    #[must_use]
    pub fn with_observer(mut self, observer: impl Fn(&JoinCall) + Send + Sync + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<JoinCall> {
        lock(&self.calls).clone()
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Number of calls that have finished and handed back their reply.
    pub fn returned_count(&self) -> usize {
        self.returned.load(Ordering::SeqCst)
    }

    /// Nicknames tried so far, in order.
    pub fn nicknames(&self) -> Vec<String> {
        lock(&self.calls).iter().map(|call| call.nickname.clone()).collect()
    }

    fn next_reply(&self) -> Reply {
        lock(&self.script).pop_front().unwrap_or(self.fallback)
    }
}

impl SessionTransport for ScriptedTransport {
    type Session = SimSession;

    fn join_room(
        &self,
        room_id: &RoomId,
        nickname: &str,
        password: Option<&str>,
    ) -> Result<SimSession, JoinFailure> {
        let call = JoinCall {
            room_id: room_id.clone(),
            nickname: nickname.to_string(),
            password: password.map(str::to_string),
        };
        lock(&self.calls).push(call.clone());

        if let Some(observer) = &self.observer {
            observer(&call);
        }
        if let Some(latency) = self.latency {
            std::thread::sleep(latency);
        }

        let reply = match self.next_reply() {
            Reply::Accept => Ok(SimSession::new(call.room_id, call.nickname)),
            Reply::Reject(code) => Err(JoinFailure::new(code)),
        };
        self.returned.fetch_add(1, Ordering::SeqCst);
        reply
    }

    fn is_joined(&self, session: &SimSession) -> bool {
        session.is_joined()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn room() -> RoomId {
        RoomId::parse("dev@svc").unwrap()
    }

    #[test]
    fn replies_follow_the_script_then_fallback() {
        let transport = ScriptedTransport::new([Reply::Reject(409), Reply::Reject(403)])
            .with_fallback(Reply::Reject(500));

        assert_eq!(transport.join_room(&room(), "a", None).err(), Some(JoinFailure::new(409)));
        assert_eq!(transport.join_room(&room(), "a2", None).err(), Some(JoinFailure::new(403)));
        assert_eq!(transport.join_room(&room(), "a3", None).err(), Some(JoinFailure::new(500)));
        assert_eq!(transport.nicknames(), ["a", "a2", "a3"]);
        assert_eq!(transport.returned_count(), 3);
    }

    #[test]
    fn accepted_session_is_joined_until_left() {
        let transport = ScriptedTransport::accepting();
        let session = transport.join_room(&room(), "alice", Some("pw")).unwrap();

        assert!(transport.is_joined(&session));
        let copy = session.clone();
        copy.leave();
        assert!(!transport.is_joined(&session));
        assert_eq!(transport.calls()[0].password.as_deref(), Some("pw"));
    }

    #[test]
    fn observer_sees_each_call() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let transport = ScriptedTransport::rejecting(409)
            .with_observer(move |call| lock(&sink).push(call.nickname.clone()));

        let _ = transport.join_room(&room(), "bob", None);
        let _ = transport.join_room(&room(), "bob2", None);
        assert_eq!(*lock(&seen), ["bob", "bob2"]);
    }

    #[test]
    fn call_is_returned_only_after_latency() {
        let transport = ScriptedTransport::accepting().with_latency(Duration::from_millis(100));

        std::thread::scope(|scope| {
            let worker = scope.spawn(|| transport.join_room(&room(), "carol", None));
            while transport.call_count() == 0 {
                std::thread::yield_now();
            }
            assert_eq!(transport.returned_count(), 0);
            worker.join().unwrap().unwrap();
        });

        assert_eq!(transport.returned_count(), 1);
    }
}
