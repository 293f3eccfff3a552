//! Recording notification sink.

use std::sync::Mutex;

use roomjoin_core::{JoinOutcome, NotificationSink, RoomId};

use crate::lock;

/// Sink that keeps every notification and logs it.
#[derive(Debug, Default)]
pub struct RecordingSink {
    notifications: Mutex<Vec<(RoomId, JoinOutcome)>>,
}

impl RecordingSink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every notification received, in order.
    pub fn notifications(&self) -> Vec<(RoomId, JoinOutcome)> {
        lock(&self.notifications).clone()
    }

    /// Outcomes received, in order.
    pub fn outcomes(&self) -> Vec<JoinOutcome> {
        lock(&self.notifications).iter().map(|(_, outcome)| outcome.clone()).collect()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, room_id: &RoomId, outcome: &JoinOutcome) {
        match outcome.user_message() {
            Some(message) => tracing::info!(room = %room_id, %message, "join outcome"),
            None => tracing::info!(room = %room_id, nickname = ?outcome.nickname(), "joined"),
        }
        lock(&self.notifications).push((room_id.clone(), outcome.clone()));
    }
}
