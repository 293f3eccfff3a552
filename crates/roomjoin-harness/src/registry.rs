//! In-memory room registry.

use std::{
    collections::HashMap,
    sync::{
        PoisonError, RwLock,
        atomic::{AtomicUsize, Ordering},
    },
};

use roomjoin_core::{RoomId, RoomMembership, RoomRegistry};

/// Room registry backed by a lock-protected map.
///
/// Tracks the foreground room and every activation so tests can check what
/// the caller did with an outcome.
#[derive(Debug)]
pub struct MemoryRegistry<S> {
    rooms: RwLock<HashMap<RoomId, RoomMembership<S>>>,
    activations: RwLock<Vec<RoomId>>,
    lookups: AtomicUsize,
}

impl<S> Default for MemoryRegistry<S> {
    fn default() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            activations: RwLock::new(Vec::new()),
            lookups: AtomicUsize::new(0),
        }
    }
}

impl<S: Clone> MemoryRegistry<S> {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered rooms.
    pub fn len(&self) -> usize {
        self.rooms.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether no room is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Most recently activated room.
    pub fn active_room(&self) -> Option<RoomId> {
        self.activations.read().unwrap_or_else(PoisonError::into_inner).last().cloned()
    }

    /// Every successful activation, in order.
    pub fn activations(&self) -> Vec<RoomId> {
        self.activations.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of lookups served.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }
}

impl<S> RoomRegistry for MemoryRegistry<S>
where
    S: Clone + Send + Sync,
{
    type Session = S;

    fn lookup(&self, room_id: &RoomId) -> Option<RoomMembership<S>> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.rooms.read().unwrap_or_else(PoisonError::into_inner).get(room_id).cloned()
    }

    fn register(&self, room_id: RoomId, membership: RoomMembership<S>) {
        tracing::debug!(room = %room_id, nickname = %membership.nickname, "registering room");
        self.rooms.write().unwrap_or_else(PoisonError::into_inner).insert(room_id, membership);
    }

    fn activate(&self, room_id: &RoomId) -> bool {
        let known =
            self.rooms.read().unwrap_or_else(PoisonError::into_inner).contains_key(room_id);
        if known {
            self.activations.write().unwrap_or_else(PoisonError::into_inner).push(room_id.clone());
        }
        known
    }
}
