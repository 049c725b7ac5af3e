//! Overplay Motion
//!
//! Motion interpretation and control-decision engine for gesture-driven
//! video playback.
//!
//! Features:
//! - Rotation angle from gravity samples, re-framed after orientation flips
//! - Orientation-aware hysteresis bands for seek backward / forward
//! - Tilt-driven volume steps with a debounced dispatcher
//! - Location restart and shake-to-toggle handlers
//! - A single-owner controller serializing every event source
//!
//! # Example
//! ```rust,ignore
//! use overplay_motion::{ControlConfig, MotionController};
//!
//! let config = ControlConfig::default();
//! let (mut controller, statuses) = MotionController::spawn(config, player, volume);
//! controller.attach_motion(sensor);
//! controller.attach_orientation(orientation_events);
//! controller.attach_location(location_events);
//! ```

mod config;
mod types;
pub mod threshold;
pub mod rotation;
pub mod capability;
pub mod control;
pub mod orientation;
pub mod location;
pub mod toggle;
pub mod volume;
pub mod controller;

pub use config::ControlConfig;
pub use types::{
    VOLUME_STEP, GravitySample, Orientation, DeviceOrientation, OrientationEvent,
    LocationEvent, Direction, PlaybackState, Status,
};
pub use threshold::{ThresholdBand, ThresholdPolicy, BandCase};
pub use rotation::{RotationState, RotationTracker, FrameShift};
pub use capability::{PlayerControl, VolumeControl, GravitySampleSource};
pub use control::{MotionControlLoop, MotionDecision, seek_destination};
pub use orientation::OrientationWatcher;
pub use location::LocationRestartHandler;
pub use toggle::{PlaybackToggle, TrackedPlayer};
pub use volume::VolumeDispatcher;
pub use controller::{MotionController, ControlEvent, ControlSnapshot, SourceKind};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Controller error
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("Controller has been shut down")]
    ShutDown,

    #[error("Controller event queue is full")]
    Busy,

    #[error("Controller worker disconnected: {0}")]
    Disconnected(String),
}
