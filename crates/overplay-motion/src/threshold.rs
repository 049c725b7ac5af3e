//! Threshold Policy
//!
//! Hysteresis bands deciding whether a rotation angle means "seek backward",
//! "seek forward" or nothing.
//!
//! There are four bands, one per (direction, wrapped) pair. A band is
//! *wrapped* when the screen is in landscape and the previous rotation sits on
//! the far side of the reference axis: the re-framed angle then crosses the
//! ±π branch cut, so the band moves past ±π and is widened by π/2 to keep
//! counting continued rotation in the same direction.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::types::{Direction, Orientation};

/// Closed interval of radians
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdBand {
    pub low: f64,
    pub high: f64,
}

impl ThresholdBand {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Inclusive on both ends
    pub fn contains(&self, angle: f64) -> bool {
        self.low <= angle && angle <= self.high
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    /// Intersection with another band, if any
    pub fn intersection(&self, other: &ThresholdBand) -> Option<ThresholdBand> {
        let low = self.low.max(other.low);
        let high = self.high.min(other.high);
        (low <= high).then(|| ThresholdBand::new(low, high))
    }
}

/// The four band variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BandCase {
    /// `[-π + v, 0]`
    Decrease,
    /// `[π + v, π + π/2]`
    DecreaseWrapped,
    /// `[0, π - v]`
    Increase,
    /// `[-π - π/2, -π - v]`
    IncreaseWrapped,
}

impl BandCase {
    pub const ALL: [BandCase; 4] = [
        BandCase::Decrease,
        BandCase::DecreaseWrapped,
        BandCase::Increase,
        BandCase::IncreaseWrapped,
    ];

    /// Pick the band variant for a direction given where the device was.
    pub fn select(direction: Direction, orientation: Orientation, last_rotation: f64) -> Self {
        let landscape = orientation.is_landscape();
        match direction {
            Direction::Decrease if landscape && last_rotation > 0.0 => Self::DecreaseWrapped,
            Direction::Decrease => Self::Decrease,
            Direction::Increase if landscape && last_rotation < 0.0 => Self::IncreaseWrapped,
            Direction::Increase => Self::Increase,
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Self::Decrease | Self::DecreaseWrapped => Direction::Decrease,
            Self::Increase | Self::IncreaseWrapped => Direction::Increase,
        }
    }

    pub fn is_wrapped(&self) -> bool {
        matches!(self, Self::DecreaseWrapped | Self::IncreaseWrapped)
    }
}

/// Computes hysteresis bands around the resting rotation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdPolicy {
    variation: f64,
}

impl ThresholdPolicy {
    /// Dead zone width used when none is configured
    pub const DEFAULT_VARIATION: f64 = 0.5;

    /// Create a policy. The variation is taken as a magnitude and capped at
    /// π/2 so every band keeps `low <= high`.
    pub fn new(variation: f64) -> Self {
        let variation = if variation.is_finite() {
            variation.abs().min(FRAC_PI_2)
        } else {
            Self::DEFAULT_VARIATION
        };
        Self { variation }
    }

    pub fn variation(&self) -> f64 {
        self.variation
    }

    /// Band for a direction given the current orientation and the previous
    /// rotation angle.
    pub fn band(
        &self,
        direction: Direction,
        orientation: Orientation,
        last_rotation: f64,
    ) -> ThresholdBand {
        self.band_for(BandCase::select(direction, orientation, last_rotation))
    }

    /// Bounds of a band variant
    pub fn band_for(&self, case: BandCase) -> ThresholdBand {
        let v = self.variation;
        match case {
            BandCase::Decrease => ThresholdBand::new(-PI + v, 0.0),
            BandCase::DecreaseWrapped => ThresholdBand::new(PI + v, PI + FRAC_PI_2),
            BandCase::Increase => ThresholdBand::new(0.0, PI - v),
            BandCase::IncreaseWrapped => ThresholdBand::new(-PI - FRAC_PI_2, -PI - v),
        }
    }

    /// Classify a rotation. Decrease is tested first and wins any overlap.
    pub fn classify(
        &self,
        rotation: f64,
        orientation: Orientation,
        last_rotation: f64,
    ) -> Option<Direction> {
        [Direction::Decrease, Direction::Increase].into_iter().find(|&direction| {
            self.band(direction, orientation, last_rotation).contains(rotation)
        })
    }
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_VARIATION)
    }
}
