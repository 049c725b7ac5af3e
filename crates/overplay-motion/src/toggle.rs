//! Playback Toggle
//!
//! Shake-to-pause. The player is wrapped in [`TrackedPlayer`], which remembers
//! the last play/pause request as an explicit state value.

use crate::capability::PlayerControl;
use crate::types::{PlaybackState, Status};

/// Player wrapper tracking the last transport request
#[derive(Debug)]
pub struct TrackedPlayer<P> {
    inner: P,
    state: PlaybackState,
}

impl<P: PlayerControl> TrackedPlayer<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            state: PlaybackState::Paused,
        }
    }

    /// Last requested state (`Playing` or `Paused`)
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut P {
        &mut self.inner
    }

    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: PlayerControl> PlayerControl for TrackedPlayer<P> {
    fn play(&mut self) {
        self.state = PlaybackState::Playing;
        self.inner.play();
    }

    fn pause(&mut self) {
        self.state = PlaybackState::Paused;
        self.inner.pause();
    }

    fn current_state(&self) -> PlaybackState {
        self.inner.current_state()
    }

    fn current_time(&self) -> f64 {
        self.inner.current_time()
    }

    fn duration(&self) -> Option<f64> {
        self.inner.duration()
    }

    fn seek(&mut self, to: f64) {
        self.inner.seek(to);
    }

    fn seek_to_start(&mut self) {
        self.inner.seek_to_start();
    }
}

/// Two-state play/pause toggle
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaybackToggle;

impl PlaybackToggle {
    pub fn new() -> Self {
        Self
    }

    /// Flip play/pause based on the player's own transport state.
    /// Transient states are left alone.
    pub fn toggle<P: PlayerControl>(&self, player: &mut TrackedPlayer<P>) -> Status {
        match player.current_state() {
            PlaybackState::Playing => player.pause(),
            PlaybackState::Paused => player.play(),
            PlaybackState::Waiting => {
                tracing::debug!("Toggle ignored while player is waiting");
            }
        }
        Status::Playback(player.state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Transport {
        state: PlaybackState,
        plays: u32,
        pauses: u32,
    }

    impl PlayerControl for Transport {
        fn play(&mut self) {
            self.plays += 1;
            self.state = PlaybackState::Playing;
        }

        fn pause(&mut self) {
            self.pauses += 1;
            self.state = PlaybackState::Paused;
        }

        fn current_state(&self) -> PlaybackState {
            self.state
        }

        fn current_time(&self) -> f64 {
            0.0
        }

        fn duration(&self) -> Option<f64> {
            None
        }

        fn seek(&mut self, _to: f64) {}
    }

    #[test]
    fn test_toggle_from_paused() {
        let mut player = TrackedPlayer::new(Transport::default());
        let status = PlaybackToggle::new().toggle(&mut player);
        assert_eq!(status.to_string(), "PLAYING");
        assert_eq!(player.inner().plays, 1);
    }

    #[test]
    fn test_toggle_from_playing() {
        let mut player = TrackedPlayer::new(Transport::default());
        player.play();
        let status = PlaybackToggle::new().toggle(&mut player);
        assert_eq!(status, Status::Playback(PlaybackState::Paused));
        assert_eq!(player.inner().pauses, 1);
    }

    #[test]
    fn test_toggle_while_waiting_is_noop() {
        let mut player = TrackedPlayer::new(Transport::default());
        player.play();
        player.inner_mut().state = PlaybackState::Waiting;

        let status = PlaybackToggle::new().toggle(&mut player);
        assert_eq!(status.to_string(), "PLAYING");
        assert_eq!(player.inner().pauses, 0);
        assert_eq!(player.inner().plays, 1);
    }
}
