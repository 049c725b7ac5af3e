//! Overplay Media
//!
//! Reference implementations of the capabilities the motion engine drives.
//!
//! Features:
//! - VideoElement with ready state, transport state and clamped seeking
//! - VideoHandle, a shareable handle implementing `PlayerControl`
//! - VolumeSlider with bounded steps implementing `VolumeControl`

pub mod player;
pub mod volume;

pub use player::{VideoElement, VideoHandle, ReadyState};
pub use volume::VolumeSlider;

/// Media error
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Invalid state: {0}")]
    InvalidState(String),
}
