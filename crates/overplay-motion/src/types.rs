//! Core Types
//!
//! Sensor samples, discrete events and the small enums the engine decides on.

use std::fmt;

/// Volume change carried by a single step
pub const VOLUME_STEP: f32 = 0.05;

/// Gravity vector in the device frame (g units)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GravitySample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl GravitySample {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Roll around the axis perpendicular to the screen.
    ///
    /// A degenerate vector (flat device or non-finite reading) has no defined
    /// axis and reads as 0.
    pub fn roll(&self) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        self.x.atan2(self.y)
    }

    /// No usable X-Y projection
    pub fn is_degenerate(&self) -> bool {
        !self.x.is_finite() || !self.y.is_finite() || (self.x == 0.0 && self.y == 0.0)
    }
}

/// Screen orientation as seen by the engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    /// Map a raw device reading. Only the two landscape readings are
    /// landscape; flat and unknown readings count as portrait.
    pub fn from_device(device: DeviceOrientation) -> Self {
        match device {
            DeviceOrientation::LandscapeLeft | DeviceOrientation::LandscapeRight => {
                Self::Landscape
            }
            _ => Self::Portrait,
        }
    }

    pub fn is_landscape(&self) -> bool {
        *self == Self::Landscape
    }
}

/// Raw device orientation reported by the platform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DeviceOrientation {
    #[default]
    Unknown,
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
    FaceUp,
    FaceDown,
}

/// Orientation change notification. The platform may post one without a
/// device reading attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrientationEvent {
    pub orientation: Option<DeviceOrientation>,
}

impl OrientationEvent {
    pub fn new(orientation: DeviceOrientation) -> Self {
        Self { orientation: Some(orientation) }
    }

    pub fn without_device() -> Self {
        Self { orientation: None }
    }
}

/// Location fix delivered after the upstream distance filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationEvent {
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationEvent {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Direction of a volume or seek action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Increase,
    Decrease,
}

impl Direction {
    /// +1.0 or -1.0
    pub fn sign(&self) -> f64 {
        match self {
            Self::Increase => 1.0,
            Self::Decrease => -1.0,
        }
    }

    /// Signed volume change for one step
    pub fn volume_variation(&self) -> f32 {
        match self {
            Self::Increase => VOLUME_STEP,
            Self::Decrease => -VOLUME_STEP,
        }
    }
}

/// Player transport state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PlaybackState {
    Playing,
    #[default]
    Paused,
    /// Transient transport state (buffering, waiting to play)
    Waiting,
}

impl PlaybackState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Waiting => "waiting",
        }
    }
}

/// Status text shown under the player
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Status {
    #[default]
    Started,
    Restarted,
    Seeked { direction: Direction, seconds: f64 },
    Playback(PlaybackState),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => write!(f, "STARTED"),
            Self::Restarted => write!(f, "RESTARTED"),
            Self::Seeked { direction, seconds } => {
                let sign = match direction {
                    Direction::Increase => '+',
                    Direction::Decrease => '-',
                };
                write!(f, "{}{} SECONDS", sign, seconds.trunc() as i64)
            }
            Self::Playback(state) => write!(f, "{}", state.name().to_uppercase()),
        }
    }
}
