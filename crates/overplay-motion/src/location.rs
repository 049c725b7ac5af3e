//! Location Restart
//!
//! Moving far enough (as decided by the location source's distance filter)
//! restarts the video from the beginning.

use crate::capability::PlayerControl;
use crate::types::{LocationEvent, Status};

/// Restarts playback on every delivered location fix
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationRestartHandler;

impl LocationRestartHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle<P: PlayerControl>(&self, event: &LocationEvent, player: &mut P) -> Status {
        tracing::info!(
            "Location changed ({:.5}, {:.5}), restarting playback",
            event.latitude,
            event.longitude
        );
        player.seek_to_start();
        Status::Restarted
    }
}
