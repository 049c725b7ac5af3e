//! Video Element
//!
//! In-memory video transport: source, ready state, clock and seeking.

use std::sync::{Arc, Mutex, MutexGuard};

use overplay_motion::{PlaybackState, PlayerControl};

use crate::MediaError;

/// Ready state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    #[default]
    HaveNothing = 0,
    HaveMetadata = 1,
    HaveCurrentData = 2,
    HaveFutureData = 3,
    HaveEnoughData = 4,
}

/// Video element
#[derive(Debug, Clone)]
pub struct VideoElement {
    // Source
    pub src: String,

    // State
    pub ready_state: ReadyState,

    // Playback
    pub current_time: f64,
    /// NaN while unknown
    pub duration: f64,
    pub paused: bool,
    pub ended: bool,
    pub looping: bool,
    pub playback_rate: f64,

    /// Seeks performed since load
    pub seeks: u64,
}

impl VideoElement {
    pub fn new() -> Self {
        Self {
            src: String::new(),
            ready_state: ReadyState::HaveNothing,
            current_time: 0.0,
            duration: f64::NAN,
            paused: true,
            ended: false,
            looping: false,
            playback_rate: 1.0,
            seeks: 0,
        }
    }

    /// Create with a source URL
    pub fn from_url(src: &str) -> Self {
        let mut video = Self::new();
        video.load(src);
        video
    }

    /// Load media. The URL is opaque and handed to the decoder as is.
    pub fn load(&mut self, src: &str) {
        tracing::info!("Loading video: {}", src);
        self.src = src.to_string();
        self.ready_state = ReadyState::HaveNothing;
        self.current_time = 0.0;
        self.duration = f64::NAN;
        self.paused = true;
        self.ended = false;
        self.seeks = 0;
    }

    /// Metadata arrived. Pass `None` for live or unbounded sources.
    pub fn set_metadata(&mut self, duration: Option<f64>) {
        self.duration = duration.filter(|d| d.is_finite() && *d >= 0.0).unwrap_or(f64::NAN);
        self.ready_state = self.ready_state.max(ReadyState::HaveMetadata);
    }

    /// Buffering progress
    pub fn set_ready_state(&mut self, ready_state: ReadyState) {
        self.ready_state = ready_state;
    }

    /// Play media
    pub fn play(&mut self) -> Result<(), MediaError> {
        if self.src.is_empty() {
            return Err(MediaError::InvalidState("No source loaded".into()));
        }
        if self.ended {
            self.current_time = 0.0;
        }
        self.paused = false;
        self.ended = false;
        Ok(())
    }

    /// Pause media
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Seek to time
    pub fn seek(&mut self, time: f64) {
        let time = if time.is_finite() { time.max(0.0) } else { 0.0 };
        self.current_time = match self.known_duration() {
            Some(duration) => time.min(duration),
            None => time,
        };
        self.ended = false;
        self.seeks += 1;
    }

    /// Advance the clock by `elapsed` seconds of wall time
    pub fn advance(&mut self, elapsed: f64) {
        if self.transport_state() != PlaybackState::Playing {
            return;
        }
        self.current_time += elapsed * self.playback_rate;

        if let Some(duration) = self.known_duration() {
            if self.current_time >= duration {
                if self.looping {
                    self.current_time %= duration.max(f64::EPSILON);
                } else {
                    self.current_time = duration;
                    self.ended = true;
                    self.paused = true;
                }
            }
        }
    }

    pub fn known_duration(&self) -> Option<f64> {
        self.duration.is_finite().then_some(self.duration)
    }

    /// What the transport is actually doing
    pub fn transport_state(&self) -> PlaybackState {
        if self.paused {
            PlaybackState::Paused
        } else if self.ready_state < ReadyState::HaveFutureData {
            PlaybackState::Waiting
        } else {
            PlaybackState::Playing
        }
    }
}

impl Default for VideoElement {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle to a video element.
///
/// The controller drives it through [`PlayerControl`] while the host keeps a
/// clone to advance the clock and render.
#[derive(Debug, Clone, Default)]
pub struct VideoHandle {
    inner: Arc<Mutex<VideoElement>>,
}

impl VideoHandle {
    pub fn new(video: VideoElement) -> Self {
        Self {
            inner: Arc::new(Mutex::new(video)),
        }
    }

    /// Lock the element. A poisoned lock is recovered since the element has
    /// no invariants spanning a panic.
    pub fn lock(&self) -> MutexGuard<'_, VideoElement> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PlayerControl for VideoHandle {
    fn play(&mut self) {
        if let Err(e) = self.lock().play() {
            tracing::warn!("Play failed: {}", e);
        }
    }

    fn pause(&mut self) {
        self.lock().pause();
    }

    fn current_state(&self) -> PlaybackState {
        self.lock().transport_state()
    }

    fn current_time(&self) -> f64 {
        self.lock().current_time
    }

    fn duration(&self) -> Option<f64> {
        self.lock().known_duration()
    }

    fn seek(&mut self, to: f64) {
        self.lock().seek(to);
    }
}
