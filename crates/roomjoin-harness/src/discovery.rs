//! Fixed room metadata.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};

use roomjoin_core::{DiscoveryError, FEATURE_PASSWORD_PROTECTED, RoomDiscovery, RoomId, RoomInfo};

/// Discovery answering from a fixed table.
///
/// Rooms not in the table are reported as open rooms with no metadata.
#[derive(Debug, Default)]
pub struct StaticDiscovery {
    rooms: HashMap<RoomId, Result<RoomInfo, DiscoveryError>>,
    queries: AtomicUsize,
}

impl StaticDiscovery {
    /// Discovery that knows no rooms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `info` for `room_id`.
    #[must_use]
    pub fn with_room(mut self, room_id: RoomId, info: RoomInfo) -> Self {
        self.rooms.insert(room_id, Ok(info));
        self
    }

    /// Report `room_id` as password-protected.
    #[must_use]
    pub fn with_password_protected(self, room_id: RoomId) -> Self {
        let info = RoomInfo {
            features: vec![FEATURE_PASSWORD_PROTECTED.to_string()],
            ..RoomInfo::default()
        };
        self.with_room(room_id, info)
    }

    /// Fail every query for `room_id` with `error`.
    #[must_use]
    pub fn with_failure(mut self, room_id: RoomId, error: DiscoveryError) -> Self {
        self.rooms.insert(room_id, Err(error));
        self
    }

    /// Number of metadata queries answered.
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }
}

impl RoomDiscovery for StaticDiscovery {
    fn room_info(&self, room_id: &RoomId) -> Result<RoomInfo, DiscoveryError> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        self.rooms.get(room_id).cloned().unwrap_or_else(|| Ok(RoomInfo::default()))
    }
}
