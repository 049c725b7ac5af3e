//! Volume Slider
//!
//! System volume as a bounded slider moved one volume step at a time.

use std::sync::Mutex;

use overplay_motion::{Direction, VolumeControl};

/// Bounded volume slider
#[derive(Debug)]
pub struct VolumeSlider {
    value: Mutex<f32>,
    minimum: f32,
    maximum: f32,
}

impl VolumeSlider {
    /// Slider over `[0, 1]`
    pub fn new(value: f32) -> Self {
        Self::with_range(value, 0.0, 1.0)
    }

    pub fn with_range(value: f32, minimum: f32, maximum: f32) -> Self {
        let (minimum, maximum) = if minimum <= maximum {
            (minimum, maximum)
        } else {
            (maximum, minimum)
        };
        Self {
            value: Mutex::new(value.clamp(minimum, maximum)),
            minimum,
            maximum,
        }
    }

    pub fn value(&self) -> f32 {
        *self.value.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn minimum(&self) -> f32 {
        self.minimum
    }

    pub fn maximum(&self) -> f32 {
        self.maximum
    }

    /// Move one step. At the boundary in the requested direction nothing
    /// changes; returns whether the value moved.
    pub fn nudge(&self, direction: Direction) -> bool {
        let mut value = self.value.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let at_bound = match direction {
            Direction::Increase => *value >= self.maximum,
            Direction::Decrease => *value <= self.minimum,
        };
        if at_bound {
            return false;
        }

        *value = (*value + direction.volume_variation()).clamp(self.minimum, self.maximum);
        tracing::debug!("Volume {:.2}", *value);
        true
    }
}

impl Default for VolumeSlider {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl VolumeControl for VolumeSlider {
    fn increase(&self) {
        self.nudge(Direction::Increase);
    }

    fn decrease(&self) {
        self.nudge(Direction::Decrease);
    }
}
