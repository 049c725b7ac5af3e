//! Volume Dispatcher
//!
//! Volume requests are not applied inside the sensor callback. Each one is
//! deferred by a short debounce on its own task so it does not fight the
//! platform volume UI.

use std::sync::Arc;
use std::time::Duration;

use smol::{Task, Timer};

use crate::capability::VolumeControl;
use crate::types::Direction;

/// Deferred application of volume steps
pub struct VolumeDispatcher {
    volume: Arc<dyn VolumeControl>,
    debounce: Duration,
    /// Cancel the previous request if it is still pending
    coalesce: bool,
    pending: Option<Task<()>>,
    requested: u64,
}

impl VolumeDispatcher {
    pub fn new(volume: Arc<dyn VolumeControl>, debounce: Duration, coalesce: bool) -> Self {
        Self {
            volume,
            debounce,
            coalesce,
            pending: None,
            requested: 0,
        }
    }

    /// Schedule one volume step
    pub fn request(&mut self, direction: Direction) {
        let volume = Arc::clone(&self.volume);
        let debounce = self.debounce;
        let task = smol::spawn(async move {
            if !debounce.is_zero() {
                Timer::after(debounce).await;
            }
            volume.step(direction);
        });
        self.requested += 1;

        if let Some(previous) = self.pending.replace(task) {
            if self.coalesce {
                // Dropping a smol task cancels it if it has not run yet.
                drop(previous);
                tracing::trace!("Superseded pending volume request");
            } else {
                previous.detach();
            }
        }
    }

    /// Wait for the most recent request to be applied
    pub async fn flush(&mut self) {
        if let Some(task) = self.pending.take() {
            task.await;
        }
    }

    /// Number of requests scheduled so far
    pub fn requested(&self) -> u64 {
        self.requested
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }
}

impl Drop for VolumeDispatcher {
    fn drop(&mut self) {
        if let Some(task) = self.pending.take() {
            task.detach();
        }
    }
}

impl std::fmt::Debug for VolumeDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VolumeDispatcher")
            .field("debounce", &self.debounce)
            .field("coalesce", &self.coalesce)
            .field("pending", &self.pending.is_some())
            .field("requested", &self.requested)
            .finish()
    }
}
