//! Device Sensors
//!
//! Gravity sensor backends for the host: recorded replays and an absent
//! sensor for devices without motion hardware.

use std::time::Duration;

use overplay_motion::{GravitySample, GravitySampleSource};
use smol::stream::{self, Boxed, StreamExt};

use crate::trace::timed;

/// Gravity sensor replaying recorded samples at their recorded offsets
#[derive(Debug, Clone, Default)]
pub struct ReplaySensor {
    samples: Vec<(Duration, GravitySample)>,
}

impl ReplaySensor {
    pub fn new(samples: Vec<(Duration, GravitySample)>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Average sampling frequency of the recording (Hz)
    pub fn frequency(&self) -> Option<f64> {
        let (first, _) = self.samples.first()?;
        let (last, _) = self.samples.last()?;
        let span = last.saturating_sub(*first).as_secs_f64();
        (span > 0.0).then(|| (self.samples.len() - 1) as f64 / span)
    }
}

impl GravitySampleSource for ReplaySensor {
    type Samples = Boxed<GravitySample>;

    /// A recording without gravity samples behaves like a device without
    /// the sensor.
    fn is_available(&self) -> bool {
        !self.samples.is_empty()
    }

    fn start(self, interval: Duration) -> Self::Samples {
        match self.frequency() {
            Some(hz) => tracing::debug!(
                "Replaying {} gravity samples at {:.1} Hz (configured {:.1} Hz)",
                self.samples.len(),
                hz,
                1.0 / interval.as_secs_f64()
            ),
            None => tracing::debug!("Replaying {} gravity samples", self.samples.len()),
        }
        timed(self.samples).boxed()
    }
}

/// Device without a motion sensor
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingSensor;

impl GravitySampleSource for MissingSensor {
    type Samples = Boxed<GravitySample>;

    fn is_available(&self) -> bool {
        false
    }

    fn start(self, _interval: Duration) -> Self::Samples {
        stream::empty().boxed()
    }
}
