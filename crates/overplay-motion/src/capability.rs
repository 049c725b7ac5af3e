//! External Capabilities
//!
//! The player, the system volume and the gravity sensor are owned by the
//! platform. The engine only talks to them through these traits.

use std::sync::Arc;
use std::time::Duration;

use smol::stream::Stream;

use crate::types::{Direction, GravitySample, PlaybackState};

/// Video transport controls
pub trait PlayerControl {
    fn play(&mut self);

    fn pause(&mut self);

    /// Transport state as reported by the player itself
    fn current_state(&self) -> PlaybackState;

    /// Elapsed time in seconds
    fn current_time(&self) -> f64;

    /// Total duration in seconds, `None` while unknown (live, unbuffered)
    fn duration(&self) -> Option<f64>;

    fn seek(&mut self, to: f64);

    fn seek_to_start(&mut self) {
        self.seek(0.0);
    }
}

/// System volume. Requests may be applied from another task.
pub trait VolumeControl: Send + Sync {
    fn increase(&self);

    fn decrease(&self);

    fn step(&self, direction: Direction) {
        match direction {
            Direction::Increase => self.increase(),
            Direction::Decrease => self.decrease(),
        }
    }
}

impl<T: VolumeControl + ?Sized> VolumeControl for Arc<T> {
    fn increase(&self) {
        (**self).increase();
    }

    fn decrease(&self) {
        (**self).decrease();
    }
}

/// Producer of periodic gravity samples
pub trait GravitySampleSource: Send + 'static {
    type Samples: Stream<Item = GravitySample> + Send + 'static;

    /// Whether the device has a motion sensor at all
    fn is_available(&self) -> bool;

    /// Start sampling. The returned stream is lazy, infinite and cannot be
    /// restarted.
    fn start(self, interval: Duration) -> Self::Samples;
}
