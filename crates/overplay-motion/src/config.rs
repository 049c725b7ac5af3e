//! Controller Configuration

use std::time::Duration;

use crate::types::Orientation;

/// Motion control configuration options
#[derive(Debug, Clone)]
pub struct ControlConfig {
    /// Dead zone half-width (radians for rotation, g-units for tilt)
    pub variation: f64,

    /// Seek step in seconds
    pub seek_step: f64,

    /// Delay before a volume request is applied
    pub volume_debounce: Duration,

    /// Cancel a pending volume request when a newer one arrives
    pub coalesce_volume: bool,

    /// Gravity sampling period
    pub sample_interval: Duration,

    /// Start playback as soon as the controller is spawned
    pub autoplay: bool,

    /// Screen orientation at startup
    pub initial_orientation: Orientation,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            variation: 0.5,
            seek_step: 5.0,
            volume_debounce: Duration::from_millis(10),
            coalesce_volume: false,
            sample_interval: Duration::from_millis(250),
            autoplay: true,
            initial_orientation: Orientation::Portrait,
        }
    }
}
