//! Rotation Tracker
//!
//! Turns gravity samples into a rotation angle in the frame the user sees,
//! and keeps the orientation / last rotation bookkeeping that the threshold
//! bands depend on.

use std::f64::consts::FRAC_PI_2;

use crate::types::{GravitySample, Orientation};

/// Shared rotation bookkeeping
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotationState {
    /// Most recently recorded adjusted rotation (radians)
    pub last_rotation: f64,
    pub orientation: Orientation,
}

/// Correction applied to the raw roll after the screen turns 90°
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameShift {
    /// Portrait: raw roll is already in the user's frame
    Identity,
    /// Landscape, device last leaning positive
    QuarterForward,
    /// Landscape, device last leaning zero or negative
    QuarterBack,
}

impl FrameShift {
    pub fn select(orientation: Orientation, last_rotation: f64) -> Self {
        match orientation {
            Orientation::Portrait => Self::Identity,
            Orientation::Landscape if last_rotation > 0.0 => Self::QuarterForward,
            Orientation::Landscape => Self::QuarterBack,
        }
    }

    pub fn offset(&self) -> f64 {
        match self {
            Self::Identity => 0.0,
            Self::QuarterForward => FRAC_PI_2,
            Self::QuarterBack => -FRAC_PI_2,
        }
    }
}

/// Owner of the rotation state
#[derive(Debug, Clone, Default)]
pub struct RotationTracker {
    state: RotationState,
}

impl RotationTracker {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            state: RotationState { last_rotation: 0.0, orientation },
        }
    }

    /// Adjusted rotation for a sample.
    ///
    /// Reads the stored last rotation for the frame shift but does not
    /// overwrite it; call [`record`](Self::record) once the decision for this
    /// sample has been made.
    pub fn update(&self, sample: &GravitySample) -> f64 {
        sample.roll() + self.frame_shift().offset()
    }

    /// Store the rotation that becomes "previous" for the next sample
    pub fn record(&mut self, rotation: f64) {
        self.state.last_rotation = rotation;
    }

    /// Takes effect on the next [`update`](Self::update)
    pub fn set_orientation(&mut self, orientation: Orientation) {
        if self.state.orientation != orientation {
            tracing::debug!("Orientation {:?} -> {:?}", self.state.orientation, orientation);
        }
        self.state.orientation = orientation;
    }

    pub fn frame_shift(&self) -> FrameShift {
        FrameShift::select(self.state.orientation, self.state.last_rotation)
    }

    pub fn last_rotation(&self) -> f64 {
        self.state.last_rotation
    }

    pub fn orientation(&self) -> Orientation {
        self.state.orientation
    }

    pub fn state(&self) -> RotationState {
        self.state
    }
}
