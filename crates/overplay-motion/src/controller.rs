//! Motion Controller
//!
//! Single owner of all mutable engine state. Every source (motion samples,
//! orientation changes, location fixes, shakes) is forwarded by its own task
//! into one serial channel, and one worker task applies events in order, so
//! the read-modify-write of the rotation state is never interleaved.
//!
//! Each subscription can be cancelled on its own. Events a cancelled source
//! already queued are discarded by the worker, so nothing from it is applied
//! after `unsubscribe` returns. Shutting down cancels all of them and closes
//! the channel; anything arriving later is dropped.
//!
//! Both queues are bounded. A fast source waits for the worker instead of
//! growing the event queue, and a status reader that falls behind loses the
//! oldest statuses.

use std::collections::HashMap;
use std::pin::pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use smol::channel::{self, Receiver, Sender, TrySendError};
use smol::stream::{Stream, StreamExt};
use smol::Task;

use crate::capability::{GravitySampleSource, PlayerControl, VolumeControl};
use crate::config::ControlConfig;
use crate::control::MotionControlLoop;
use crate::location::LocationRestartHandler;
use crate::orientation::OrientationWatcher;
use crate::rotation::RotationState;
use crate::toggle::{PlaybackToggle, TrackedPlayer};
use crate::types::{GravitySample, LocationEvent, OrientationEvent, PlaybackState, Status};
use crate::volume::VolumeDispatcher;
use crate::ControllerError;

/// Message processed by the controller worker
#[derive(Debug)]
pub enum ControlEvent {
    Gravity(GravitySample),
    Orientation(OrientationEvent),
    Location(LocationEvent),
    Shake,
    Play,
    Pause,
    Snapshot(Sender<ControlSnapshot>),
}

/// Events waiting for the worker
pub const EVENT_QUEUE: usize = 256;

/// Statuses kept for a slow reader
pub const STATUS_QUEUE: usize = 64;

/// Kind of event source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Motion,
    Orientation,
    Location,
    Shake,
}

/// Point-in-time view of the controller state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlSnapshot {
    pub rotation: RotationState,
    pub status: Status,
    /// Last requested play/pause state
    pub playback: PlaybackState,
    pub current_time: f64,
    /// Gravity samples processed so far
    pub samples: u64,
}

/// Queued event, tagged with the liveness flag of the subscription that
/// forwarded it
struct Envelope {
    event: ControlEvent,
    live: Option<Arc<AtomicBool>>,
}

impl Envelope {
    fn direct(event: ControlEvent) -> Self {
        Self { event, live: None }
    }

    fn is_retired(&self) -> bool {
        self.live.as_ref().is_some_and(|live| !live.load(Ordering::Acquire))
    }
}

/// Forwarding task of one source
struct Subscription {
    task: Task<()>,
    live: Arc<AtomicBool>,
}

impl Subscription {
    /// Stop the worker from applying anything this source already queued.
    fn retire(&self) {
        self.live.store(false, Ordering::Release);
    }
}

/// State owned by the worker task
struct ControlState<P> {
    motion: MotionControlLoop,
    player: TrackedPlayer<P>,
    volume: VolumeDispatcher,
    orientation: OrientationWatcher,
    location: LocationRestartHandler,
    toggle: PlaybackToggle,
    status: Status,
    statuses: Sender<Status>,
    /// Lets the worker evict the oldest status when the reader lags
    backlog: Receiver<Status>,
    samples: u64,
}

impl<P: PlayerControl> ControlState<P> {
    fn handle(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::Gravity(sample) => {
                self.samples += 1;
                let status = self.motion.process(&sample, &mut self.player, &mut self.volume);
                if let Some(status) = status {
                    self.set_status(status);
                }
            }
            ControlEvent::Orientation(event) => {
                self.orientation.handle(&event, self.motion.tracker_mut());
            }
            ControlEvent::Location(event) => {
                let status = self.location.handle(&event, &mut self.player);
                self.set_status(status);
            }
            ControlEvent::Shake => {
                let status = self.toggle.toggle(&mut self.player);
                self.set_status(status);
            }
            ControlEvent::Play => self.player.play(),
            ControlEvent::Pause => self.player.pause(),
            ControlEvent::Snapshot(reply) => {
                let _ = reply.try_send(self.snapshot());
            }
        }
    }

    fn set_status(&mut self, status: Status) {
        self.status = status;
        tracing::info!("Status: {}", status);
        match self.statuses.try_send(status) {
            Ok(()) => {}
            Err(TrySendError::Full(status)) => {
                if let Ok(stale) = self.backlog.try_recv() {
                    tracing::trace!("Status reader behind, dropping {}", stale);
                }
                let _ = self.statuses.try_send(status);
            }
            Err(TrySendError::Closed(_)) => tracing::trace!("Status sink closed"),
        }
    }

    fn snapshot(&self) -> ControlSnapshot {
        ControlSnapshot {
            rotation: self.motion.tracker().state(),
            status: self.status,
            playback: self.player.state(),
            current_time: self.player.current_time(),
            samples: self.samples,
        }
    }
}

/// Handle to the running controller
pub struct MotionController {
    events: Sender<Envelope>,
    worker: Option<Task<()>>,
    subscriptions: HashMap<SourceKind, Subscription>,
    sample_interval: Duration,
}

impl MotionController {
    /// Spawn the worker. Returns the handle and the status text stream; the
    /// first status is always `STARTED`.
    pub fn spawn<P>(
        config: ControlConfig,
        player: P,
        volume: Arc<dyn VolumeControl>,
    ) -> (Self, Receiver<Status>)
    where
        P: PlayerControl + Send + 'static,
    {
        let (events, inbox) = channel::bounded(EVENT_QUEUE);
        let (statuses, status_rx) = channel::bounded(STATUS_QUEUE);

        let mut state = ControlState {
            motion: MotionControlLoop::new(&config, config.initial_orientation),
            player: TrackedPlayer::new(player),
            volume: VolumeDispatcher::new(volume, config.volume_debounce, config.coalesce_volume),
            orientation: OrientationWatcher::new(),
            location: LocationRestartHandler::new(),
            toggle: PlaybackToggle::new(),
            status: Status::Started,
            statuses,
            backlog: status_rx.clone(),
            samples: 0,
        };

        if config.autoplay {
            state.player.play();
        }
        state.set_status(Status::Started);

        let worker = smol::spawn(run_worker(state, inbox));
        tracing::info!("Overplay motion controller {} started", crate::VERSION);

        let controller = Self {
            events,
            worker: Some(worker),
            subscriptions: HashMap::new(),
            sample_interval: config.sample_interval,
        };
        (controller, status_rx)
    }

    /// Start the gravity sensor and subscribe to it. Returns `false` (and
    /// leaves motion controls inactive) when the device has no sensor.
    pub fn attach_motion<S: GravitySampleSource>(&mut self, source: S) -> bool {
        if !source.is_available() {
            tracing::warn!("Device motion unavailable, motion controls disabled");
            return false;
        }
        let samples = source.start(self.sample_interval);
        self.subscribe(SourceKind::Motion, samples.map(ControlEvent::Gravity));
        true
    }

    pub fn attach_orientation<S>(&mut self, events: S)
    where
        S: Stream<Item = OrientationEvent> + Send + 'static,
    {
        self.subscribe(SourceKind::Orientation, events.map(ControlEvent::Orientation));
    }

    pub fn attach_location<S>(&mut self, events: S)
    where
        S: Stream<Item = LocationEvent> + Send + 'static,
    {
        self.subscribe(SourceKind::Location, events.map(ControlEvent::Location));
    }

    pub fn attach_shake<S>(&mut self, shakes: S)
    where
        S: Stream<Item = ()> + Send + 'static,
    {
        self.subscribe(SourceKind::Shake, shakes.map(|_| ControlEvent::Shake));
    }

    /// Forward a stream into the worker. Replacing an existing subscription of
    /// the same kind cancels the old one.
    fn subscribe<S>(&mut self, kind: SourceKind, stream: S)
    where
        S: Stream<Item = ControlEvent> + Send + 'static,
    {
        let events = self.events.clone();
        let live = Arc::new(AtomicBool::new(true));
        let tag = live.clone();
        let task = smol::spawn(async move {
            let mut stream = pin!(stream);
            while let Some(event) = stream.next().await {
                let envelope = Envelope { event, live: Some(tag.clone()) };
                if events.send(envelope).await.is_err() {
                    break;
                }
            }
            tracing::debug!("{:?} source ended", kind);
        });

        if let Some(old) = self.subscriptions.insert(kind, Subscription { task, live }) {
            old.retire();
            tracing::debug!("Replaced {:?} subscription", kind);
        }
    }

    /// Cancel one subscription. Once this returns no event from that source
    /// is applied, including events it queued before being cancelled.
    pub async fn unsubscribe(&mut self, kind: SourceKind) -> bool {
        let Some(subscription) = self.subscriptions.remove(&kind) else {
            return false;
        };
        subscription.retire();
        subscription.task.cancel().await;

        // The worker may be applying an event it accepted before the flag
        // flipped; a round trip waits that out.
        if self.snapshot().await.is_err() {
            tracing::trace!("Worker already stopped while unsubscribing {:?}", kind);
        }
        tracing::debug!("Unsubscribed {:?}", kind);
        true
    }

    /// Wait until a finite source has forwarded everything it produced.
    pub async fn finish(&mut self, kind: SourceKind) -> bool {
        match self.subscriptions.remove(&kind) {
            Some(subscription) => {
                subscription.task.await;
                true
            }
            None => false,
        }
    }

    pub fn is_subscribed(&self, kind: SourceKind) -> bool {
        self.subscriptions.contains_key(&kind)
    }

    /// Queue an event directly
    pub fn send(&self, event: ControlEvent) -> Result<(), ControllerError> {
        self.events.try_send(Envelope::direct(event)).map_err(|e| match e {
            TrySendError::Full(_) => ControllerError::Busy,
            TrySendError::Closed(_) => ControllerError::ShutDown,
        })
    }

    pub fn shake(&self) -> Result<(), ControllerError> {
        self.send(ControlEvent::Shake)
    }

    pub fn play(&self) -> Result<(), ControllerError> {
        self.send(ControlEvent::Play)
    }

    pub fn pause(&self) -> Result<(), ControllerError> {
        self.send(ControlEvent::Pause)
    }

    /// State after every event queued so far has been applied
    pub async fn snapshot(&self) -> Result<ControlSnapshot, ControllerError> {
        let (reply, response) = channel::bounded(1);
        self.events
            .send(Envelope::direct(ControlEvent::Snapshot(reply)))
            .await
            .map_err(|_| ControllerError::ShutDown)?;
        response
            .recv()
            .await
            .map_err(|e| ControllerError::Disconnected(e.to_string()))
    }

    pub fn is_shut_down(&self) -> bool {
        self.events.is_closed()
    }

    /// Cancel every subscription, stop the worker and wait for it.
    pub async fn shutdown(&mut self) {
        for (kind, subscription) in self.subscriptions.drain() {
            subscription.retire();
            subscription.task.cancel().await;
            tracing::debug!("Unsubscribed {:?}", kind);
        }
        self.events.close();
        if let Some(worker) = self.worker.take() {
            worker.await;
        }
        tracing::info!("Motion controller shut down");
    }
}

impl Drop for MotionController {
    fn drop(&mut self) {
        // Remaining tasks are cancelled when their handles drop.
        self.events.close();
    }
}

async fn run_worker<P: PlayerControl>(mut state: ControlState<P>, inbox: Receiver<Envelope>) {
    while let Ok(envelope) = inbox.recv().await {
        if inbox.is_closed() {
            tracing::trace!("Dropping {:?} after shutdown", envelope.event);
            break;
        }
        if envelope.is_retired() {
            tracing::trace!("Dropping {:?} from a cancelled source", envelope.event);
            continue;
        }
        state.handle(envelope.event);
    }
    state.volume.flush().await;
    tracing::debug!("Controller worker stopped after {} samples", state.samples);
}
