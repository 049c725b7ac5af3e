//! Motion Control Loop
//!
//! Consumes one gravity sample at a time and turns it into volume and seek
//! requests.
//!
//! Order per sample:
//! 1. Tilt (Z axis) decides the volume step
//! 2. The tracker computes the adjusted rotation
//! 3. The Decrease band, built from the *previous* rotation, is tested
//! 4. Otherwise the Increase band is tested
//! 5. The new rotation is recorded

use crate::capability::PlayerControl;
use crate::config::ControlConfig;
use crate::rotation::RotationTracker;
use crate::threshold::ThresholdPolicy;
use crate::types::{Direction, GravitySample, Orientation, Status};
use crate::volume::VolumeDispatcher;

/// What a sample asks for, before any capability is touched
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionDecision {
    /// Adjusted rotation for this sample
    pub rotation: f64,
    pub volume: Option<Direction>,
    pub seek: Option<Direction>,
}

impl MotionDecision {
    pub fn is_idle(&self) -> bool {
        self.volume.is_none() && self.seek.is_none()
    }
}

/// Per-sample decision engine
#[derive(Debug, Clone)]
pub struct MotionControlLoop {
    tracker: RotationTracker,
    policy: ThresholdPolicy,
    variation: f64,
    seek_step: f64,
}

impl MotionControlLoop {
    pub fn new(config: &ControlConfig, orientation: Orientation) -> Self {
        Self {
            tracker: RotationTracker::new(orientation),
            policy: ThresholdPolicy::new(config.variation),
            variation: config.variation.abs(),
            seek_step: config.seek_step.abs(),
        }
    }

    /// Volume step implied by the tilt around the X axis. Strict on both
    /// sides: `z == ±variation` does nothing.
    pub fn volume_direction(&self, z: f64) -> Option<Direction> {
        if z < -self.variation {
            Some(Direction::Decrease)
        } else if z > self.variation {
            Some(Direction::Increase)
        } else {
            None
        }
    }

    /// Decide on a sample and record its rotation.
    pub fn decide(&mut self, sample: &GravitySample) -> MotionDecision {
        let volume = self.volume_direction(sample.z);

        let previous = self.tracker.last_rotation();
        let rotation = self.tracker.update(sample);

        // A flat device has no roll axis; its angle is recorded as 0 but it
        // never seeks.
        let seek = if sample.is_degenerate() {
            None
        } else {
            self.policy.classify(rotation, self.tracker.orientation(), previous)
        };

        self.tracker.record(rotation);

        MotionDecision { rotation, volume, seek }
    }

    /// Decide on a sample and forward the result to the capabilities.
    ///
    /// Returns the new status text when a seek was actually issued.
    pub fn process<P: PlayerControl>(
        &mut self,
        sample: &GravitySample,
        player: &mut P,
        volume: &mut VolumeDispatcher,
    ) -> Option<Status> {
        let decision = self.decide(sample);

        if let Some(direction) = decision.volume {
            volume.request(direction);
        }

        let direction = decision.seek?;
        self.seek(direction, player)
    }

    /// Request a relative seek, clamped to the start and dropped past the end.
    pub fn seek<P: PlayerControl>(&self, direction: Direction, player: &mut P) -> Option<Status> {
        let current = player.current_time();
        let duration = player.duration();
        match seek_destination(current, duration, direction, self.seek_step) {
            Some(to) => {
                tracing::debug!("Seek {:?}: {:.3}s -> {:.3}s", direction, current, to);
                player.seek(to);
                Some(Status::Seeked { direction, seconds: self.seek_step })
            }
            None => {
                tracing::debug!(
                    "Seek {:?} from {:.3}s dropped (duration {:?})",
                    direction,
                    current,
                    duration
                );
                None
            }
        }
    }

    pub fn tracker(&self) -> &RotationTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut RotationTracker {
        &mut self.tracker
    }

    pub fn policy(&self) -> &ThresholdPolicy {
        &self.policy
    }

    pub fn seek_step(&self) -> f64 {
        self.seek_step
    }
}

/// Destination of a relative seek.
///
/// Negative destinations clamp to 0. A destination at or past a known
/// duration is dropped, and with no known duration forward seeks are dropped.
pub fn seek_destination(
    current: f64,
    duration: Option<f64>,
    direction: Direction,
    step: f64,
) -> Option<f64> {
    let current = if current.is_finite() { current.max(0.0) } else { 0.0 };
    let destination = (current + direction.sign() * step).max(0.0);

    match duration.filter(|d| d.is_finite()) {
        Some(duration) if destination < duration => Some(destination),
        Some(_) => None,
        None if direction == Direction::Decrease => Some(destination),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn control(orientation: Orientation) -> MotionControlLoop {
        MotionControlLoop::new(&ControlConfig::default(), orientation)
    }

    /// Sample whose raw roll equals `angle`
    fn rolled(angle: f64, z: f64) -> GravitySample {
        GravitySample::new(angle.sin(), angle.cos(), z)
    }

    #[test]
    fn test_volume_boundary_is_strict() {
        let control = control(Orientation::Portrait);
        assert_eq!(control.volume_direction(0.5), None);
        assert_eq!(control.volume_direction(-0.5), None);
        assert_eq!(control.volume_direction(0.5 + 1e-9), Some(Direction::Increase));
        assert_eq!(control.volume_direction(-0.6), Some(Direction::Decrease));
    }

    #[test]
    fn test_portrait_small_roll_seeks_forward() {
        let mut control = control(Orientation::Portrait);
        let decision = control.decide(&rolled(0.2, 0.0));
        assert!((decision.rotation - 0.2).abs() < 1e-12);
        assert_eq!(decision.seek, Some(Direction::Increase));
        assert_eq!(decision.volume, None);
        assert!((control.tracker().last_rotation() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_landscape_widened_band_edge() {
        let mut control = control(Orientation::Landscape);
        control.tracker_mut().record(1.0);
        // raw roll + π/2 = 3.4
        let raw = 3.4 - std::f64::consts::FRAC_PI_2;
        let decision = control.decide(&rolled(raw, 0.0));
        assert!((decision.rotation - 3.4).abs() < 1e-9);
        assert_eq!(decision.seek, None);
    }

    #[test]
    fn test_band_uses_previous_rotation() {
        let mut control = control(Orientation::Landscape);
        control.tracker_mut().record(1.0);
        // 3.8 lies in the wrapped Decrease band chosen from last = 1.0
        let raw = 3.8 - std::f64::consts::FRAC_PI_2;
        let decision = control.decide(&rolled(raw, 0.0));
        assert_eq!(decision.seek, Some(Direction::Decrease));
    }

    #[test]
    fn test_same_sample_twice_same_decision() {
        let mut control = control(Orientation::Portrait);
        let sample = rolled(-1.2, 0.7);
        let first = control.decide(&sample);
        let second = control.decide(&sample);
        assert_eq!(first.seek, second.seek);
        assert_eq!(first.volume, second.volume);
        assert_eq!(first.seek, Some(Direction::Decrease));
    }

    #[test]
    fn test_degenerate_sample_is_idle() {
        let mut control = control(Orientation::Portrait);
        control.tracker_mut().record(0.4);
        let decision = control.decide(&GravitySample::new(0.0, 0.0, 0.0));
        assert!(decision.is_idle());
        assert_eq!(control.tracker().last_rotation(), 0.0);
    }

    #[test]
    fn test_seek_destination_clamps_start() {
        assert_eq!(seek_destination(3.0, Some(60.0), Direction::Decrease, 5.0), Some(0.0));
        assert_eq!(seek_destination(30.0, Some(60.0), Direction::Decrease, 5.0), Some(25.0));
    }

    #[test]
    fn test_seek_destination_drops_past_end() {
        assert_eq!(seek_destination(57.0, Some(60.0), Direction::Increase, 5.0), None);
        assert_eq!(seek_destination(55.0, Some(60.0), Direction::Increase, 5.0), None);
        assert_eq!(seek_destination(50.0, Some(60.0), Direction::Increase, 5.0), Some(55.0));
    }

    #[test]
    fn test_seek_destination_unknown_duration() {
        assert_eq!(seek_destination(10.0, None, Direction::Increase, 5.0), None);
        assert_eq!(seek_destination(10.0, Some(f64::NAN), Direction::Increase, 5.0), None);
        assert_eq!(seek_destination(10.0, None, Direction::Decrease, 5.0), Some(5.0));
    }
}
