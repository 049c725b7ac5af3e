//! Orientation Watcher
//!
//! Forwards screen orientation changes to the rotation tracker.

use crate::rotation::RotationTracker;
use crate::types::{Orientation, OrientationEvent};

/// Maps raw orientation events onto the tracker
#[derive(Debug, Clone, Copy, Default)]
pub struct OrientationWatcher;

impl OrientationWatcher {
    pub fn new() -> Self {
        Self
    }

    /// Apply an event and return the orientation it set. An event without
    /// a device reading leaves the tracker untouched.
    pub fn handle(
        &self,
        event: &OrientationEvent,
        tracker: &mut RotationTracker,
    ) -> Option<Orientation> {
        let Some(device) = event.orientation else {
            tracing::trace!("Ignoring orientation event without a device reading");
            return None;
        };
        let orientation = Orientation::from_device(device);
        tracker.set_orientation(orientation);
        Some(orientation)
    }
}
