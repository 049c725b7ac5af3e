//! Integration tests - Controller driven end to end
//!
//! Sources → controller worker → player / volume capabilities → status text

use std::f64::consts::FRAC_PI_2;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use overplay_motion::controller::STATUS_QUEUE;
use overplay_motion::{
    ControlConfig, ControllerError, DeviceOrientation, GravitySample, GravitySampleSource,
    LocationEvent, MotionController, Orientation, OrientationEvent, PlaybackState, PlayerControl,
    SourceKind, Status, VolumeControl,
};
use smol::channel::Receiver;
use smol::Timer;

// ============================================================================
// TEST DOUBLES
// ============================================================================

#[derive(Debug)]
struct PlayerLog {
    state: PlaybackState,
    time: f64,
    duration: Option<f64>,
    seeks: Vec<f64>,
    restarts: u32,
}

#[derive(Debug, Clone)]
struct MockPlayer(Arc<Mutex<PlayerLog>>);

impl MockPlayer {
    fn new(time: f64, duration: Option<f64>) -> Self {
        Self(Arc::new(Mutex::new(PlayerLog {
            state: PlaybackState::Paused,
            time,
            duration,
            seeks: Vec::new(),
            restarts: 0,
        })))
    }

    fn log(&self) -> std::sync::MutexGuard<'_, PlayerLog> {
        self.0.lock().unwrap()
    }
}

impl PlayerControl for MockPlayer {
    fn play(&mut self) {
        self.log().state = PlaybackState::Playing;
    }

    fn pause(&mut self) {
        self.log().state = PlaybackState::Paused;
    }

    fn current_state(&self) -> PlaybackState {
        self.log().state
    }

    fn current_time(&self) -> f64 {
        self.log().time
    }

    fn duration(&self) -> Option<f64> {
        self.log().duration
    }

    fn seek(&mut self, to: f64) {
        let mut log = self.log();
        log.seeks.push(to);
        log.time = to;
    }

    fn seek_to_start(&mut self) {
        let mut log = self.log();
        log.restarts += 1;
        log.time = 0.0;
    }
}

#[derive(Debug, Default)]
struct MockVolume {
    increases: AtomicU32,
    decreases: AtomicU32,
}

impl VolumeControl for MockVolume {
    fn increase(&self) {
        self.increases.fetch_add(1, Ordering::SeqCst);
    }

    fn decrease(&self) {
        self.decreases.fetch_add(1, Ordering::SeqCst);
    }
}

struct ScriptedSensor {
    samples: Vec<GravitySample>,
    available: bool,
}

impl ScriptedSensor {
    fn new(samples: Vec<GravitySample>) -> Self {
        Self { samples, available: true }
    }
}

impl GravitySampleSource for ScriptedSensor {
    type Samples = smol::stream::Iter<std::vec::IntoIter<GravitySample>>;

    fn is_available(&self) -> bool {
        self.available
    }

    fn start(self, _interval: Duration) -> Self::Samples {
        smol::stream::iter(self.samples)
    }
}

/// Sensor that never stops producing the same sample
struct EndlessSensor(GravitySample);

impl GravitySampleSource for EndlessSensor {
    type Samples = smol::stream::Repeat<GravitySample>;

    fn is_available(&self) -> bool {
        true
    }

    fn start(self, _interval: Duration) -> Self::Samples {
        smol::stream::repeat(self.0)
    }
}

/// Sample whose raw roll equals `angle`
fn rolled(angle: f64, z: f64) -> GravitySample {
    GravitySample::new(angle.sin(), angle.cos(), z)
}

fn spawn_default(player: MockPlayer) -> (MotionController, Receiver<Status>) {
    MotionController::spawn(ControlConfig::default(), player, Arc::new(MockVolume::default()))
}

fn drain(statuses: &Receiver<Status>) -> Vec<String> {
    std::iter::from_fn(|| statuses.try_recv().ok()).map(|s| s.to_string()).collect()
}

async fn wait_for<F>(controller: &MotionController, predicate: F)
where
    F: Fn(&overplay_motion::ControlSnapshot) -> bool,
{
    for _ in 0..200 {
        let snapshot = controller.snapshot().await.unwrap();
        if predicate(&snapshot) {
            return;
        }
        Timer::after(Duration::from_millis(5)).await;
    }
    panic!("condition not reached");
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_portrait_roll_seeks_forward() {
    smol::block_on(async {
        let player = MockPlayer::new(10.0, Some(120.0));
        let volume = Arc::new(MockVolume::default());
        let (mut controller, statuses) =
            MotionController::spawn(ControlConfig::default(), player.clone(), volume.clone());

        assert!(controller.attach_motion(ScriptedSensor::new(vec![rolled(0.2, 0.0)])));
        controller.finish(SourceKind::Motion).await;
        let snapshot = controller.snapshot().await.unwrap();

        assert_eq!(snapshot.samples, 1);
        assert!((snapshot.rotation.last_rotation - 0.2).abs() < 1e-9);
        assert_eq!(player.log().seeks, vec![15.0]);
        assert_eq!(drain(&statuses), vec!["STARTED", "+5 SECONDS"]);

        controller.shutdown().await;
    });
}

#[test]
fn test_landscape_widened_band_does_not_seek() {
    smol::block_on(async {
        let player = MockPlayer::new(30.0, Some(120.0));
        let config = ControlConfig {
            initial_orientation: Orientation::Landscape,
            ..ControlConfig::default()
        };
        let (mut controller, statuses) =
            MotionController::spawn(config, player.clone(), Arc::new(MockVolume::default()));

        // First sample lands on 1.0 (shifted by -π/2 from a resting last rotation),
        // the second lands on 3.4 (shifted by +π/2 from 1.0).
        let samples = vec![rolled(1.0 + FRAC_PI_2, 0.0), rolled(3.4 - FRAC_PI_2, 0.0)];
        controller.attach_motion(ScriptedSensor::new(samples));
        controller.finish(SourceKind::Motion).await;
        let snapshot = controller.snapshot().await.unwrap();

        assert!((snapshot.rotation.last_rotation - 3.4).abs() < 1e-9);
        assert_eq!(player.log().seeks.len(), 1, "only the first sample seeks");
        assert_eq!(drain(&statuses), vec!["STARTED", "+5 SECONDS"]);

        controller.shutdown().await;
    });
}

#[test]
fn test_tilt_decreases_volume_once() {
    smol::block_on(async {
        let player = MockPlayer::new(0.0, Some(60.0));
        let volume = Arc::new(MockVolume::default());
        let (mut controller, statuses) =
            MotionController::spawn(ControlConfig::default(), player.clone(), volume.clone());

        // Roll of π sits in the dead zone, so only the tilt acts.
        controller.attach_motion(ScriptedSensor::new(vec![GravitySample::new(0.0, -1.0, -0.6)]));
        controller.finish(SourceKind::Motion).await;
        controller.shutdown().await;

        assert_eq!(volume.decreases.load(Ordering::SeqCst), 1);
        assert_eq!(volume.increases.load(Ordering::SeqCst), 0);
        assert!(player.log().seeks.is_empty());
        assert_eq!(drain(&statuses), vec!["STARTED"]);
    });
}

#[test]
fn test_location_restarts_playback() {
    smol::block_on(async {
        let player = MockPlayer::new(40.0, Some(120.0));
        let (mut controller, statuses) = spawn_default(player.clone());

        controller.attach_motion(ScriptedSensor::new(vec![rolled(-1.0, 0.0)]));
        controller.finish(SourceKind::Motion).await;
        controller.attach_location(smol::stream::iter(vec![LocationEvent::new(-12.04, -77.03)]));
        controller.finish(SourceKind::Location).await;
        let snapshot = controller.snapshot().await.unwrap();

        assert_eq!(player.log().restarts, 1);
        assert_eq!(snapshot.current_time, 0.0);
        assert_eq!(snapshot.status, Status::Restarted);
        assert_eq!(drain(&statuses), vec!["STARTED", "-5 SECONDS", "RESTARTED"]);

        controller.shutdown().await;
    });
}

#[test]
fn test_shake_while_paused_plays() {
    smol::block_on(async {
        let player = MockPlayer::new(0.0, None);
        let config = ControlConfig { autoplay: false, ..ControlConfig::default() };
        let (mut controller, statuses) =
            MotionController::spawn(config, player.clone(), Arc::new(MockVolume::default()));

        controller.shake().unwrap();
        let snapshot = controller.snapshot().await.unwrap();

        assert_eq!(snapshot.playback, PlaybackState::Playing);
        assert_eq!(player.log().state, PlaybackState::Playing);
        assert_eq!(drain(&statuses), vec!["STARTED", "PLAYING"]);

        controller.shake().unwrap();
        let snapshot = controller.snapshot().await.unwrap();
        assert_eq!(snapshot.status.to_string(), "PAUSED");

        controller.shutdown().await;
    });
}

#[test]
fn test_autoplay_starts_playing() {
    smol::block_on(async {
        let player = MockPlayer::new(0.0, None);
        let (mut controller, _statuses) = spawn_default(player.clone());

        assert_eq!(player.log().state, PlaybackState::Playing);
        assert_eq!(controller.snapshot().await.unwrap().playback, PlaybackState::Playing);

        controller.shutdown().await;
    });
}

// ============================================================================
// CLAMPING
// ============================================================================

#[test]
fn test_forward_seek_past_end_is_silent() {
    smol::block_on(async {
        let player = MockPlayer::new(58.0, Some(60.0));
        let (mut controller, statuses) = spawn_default(player.clone());

        controller.attach_motion(ScriptedSensor::new(vec![rolled(0.8, 0.0)]));
        controller.finish(SourceKind::Motion).await;
        let snapshot = controller.snapshot().await.unwrap();

        assert!(player.log().seeks.is_empty());
        assert_eq!(snapshot.status, Status::Started);
        assert_eq!(drain(&statuses), vec!["STARTED"]);

        controller.shutdown().await;
    });
}

#[test]
fn test_backward_seek_clamps_to_start() {
    smol::block_on(async {
        let player = MockPlayer::new(2.0, None);
        let (mut controller, _statuses) = spawn_default(player.clone());

        controller.attach_motion(ScriptedSensor::new(vec![rolled(-0.8, 0.0), rolled(0.8, 0.0)]));
        controller.finish(SourceKind::Motion).await;
        controller.snapshot().await.unwrap();

        // Forward seeks never go out while the duration is unknown.
        assert_eq!(player.log().seeks, vec![0.0]);

        controller.shutdown().await;
    });
}

// ============================================================================
// LIFECYCLE
// ============================================================================

#[test]
fn test_missing_sensor_disables_motion() {
    smol::block_on(async {
        let player = MockPlayer::new(0.0, Some(60.0));
        let (mut controller, statuses) = spawn_default(player.clone());

        let sensor = ScriptedSensor { samples: vec![rolled(0.3, 0.9)], available: false };
        assert!(!controller.attach_motion(sensor));
        assert!(!controller.is_subscribed(SourceKind::Motion));

        let snapshot = controller.snapshot().await.unwrap();
        assert_eq!(snapshot.samples, 0);
        assert_eq!(drain(&statuses), vec!["STARTED"]);

        controller.shutdown().await;
    });
}

#[test]
fn test_orientation_unsubscribe_stops_delivery() {
    smol::block_on(async {
        let player = MockPlayer::new(0.0, Some(60.0));
        let (mut controller, _statuses) = spawn_default(player);

        let (tx, rx) = smol::channel::unbounded();
        controller.attach_orientation(rx);
        tx.send(OrientationEvent::new(DeviceOrientation::LandscapeLeft)).await.unwrap();
        wait_for(&controller, |s| s.rotation.orientation == Orientation::Landscape).await;

        assert!(controller.unsubscribe(SourceKind::Orientation).await);
        assert!(!controller.is_subscribed(SourceKind::Orientation));
        assert!(tx.try_send(OrientationEvent::new(DeviceOrientation::Portrait)).is_err());

        let snapshot = controller.snapshot().await.unwrap();
        assert_eq!(snapshot.rotation.orientation, Orientation::Landscape);
        assert!(!controller.unsubscribe(SourceKind::Orientation).await);

        controller.shutdown().await;
    });
}

#[test]
fn test_flat_orientation_maps_to_portrait() {
    smol::block_on(async {
        let (mut controller, _statuses) = spawn_default(MockPlayer::new(0.0, Some(60.0)));

        controller.attach_orientation(smol::stream::iter(vec![
            OrientationEvent::new(DeviceOrientation::LandscapeRight),
            OrientationEvent::without_device(),
        ]));
        controller.finish(SourceKind::Orientation).await;
        let snapshot = controller.snapshot().await.unwrap();
        assert_eq!(snapshot.rotation.orientation, Orientation::Landscape);

        controller.attach_orientation(smol::stream::iter(vec![OrientationEvent::new(
            DeviceOrientation::FaceUp,
        )]));
        controller.finish(SourceKind::Orientation).await;
        let snapshot = controller.snapshot().await.unwrap();
        assert_eq!(snapshot.rotation.orientation, Orientation::Portrait);

        controller.shutdown().await;
    });
}

#[test]
fn test_motion_unsubscribe_discards_queued_samples() {
    smol::block_on(async {
        let player = MockPlayer::new(0.0, Some(1e12));
        let (mut controller, _statuses) = spawn_default(player.clone());

        assert!(controller.attach_motion(EndlessSensor(rolled(0.3, 0.0))));
        wait_for(&controller, |s| s.samples > 10).await;

        assert!(controller.unsubscribe(SourceKind::Motion).await);
        let seeks = player.log().seeks.len();
        let samples = controller.snapshot().await.unwrap().samples;
        assert!(seeks > 0);

        Timer::after(Duration::from_millis(30)).await;
        let snapshot = controller.snapshot().await.unwrap();
        assert_eq!(snapshot.samples, samples);
        assert_eq!(player.log().seeks.len(), seeks);

        controller.shutdown().await;
    });
}

#[test]
fn test_unread_statuses_keep_the_newest() {
    smol::block_on(async {
        let (mut controller, statuses) = spawn_default(MockPlayer::new(0.0, None));

        for _ in 0..100 {
            controller.shake().unwrap();
        }
        controller.snapshot().await.unwrap();

        let texts = drain(&statuses);
        assert_eq!(texts.len(), STATUS_QUEUE);
        // autoplay, then an even number of toggles
        assert_eq!(texts.last().map(String::as_str), Some("PLAYING"));
        assert!(!texts.contains(&"STARTED".to_string()));

        controller.shutdown().await;
    });
}

#[test]
fn test_requests_after_shutdown_are_rejected() {
    smol::block_on(async {
        let player = MockPlayer::new(0.0, Some(60.0));
        let (mut controller, _statuses) = spawn_default(player.clone());

        let (tx, rx) = smol::channel::unbounded::<LocationEvent>();
        controller.attach_location(rx);
        controller.shutdown().await;

        assert!(controller.is_shut_down());
        assert!(matches!(controller.shake(), Err(ControllerError::ShutDown)));
        assert!(controller.snapshot().await.is_err());
        assert!(tx.try_send(LocationEvent::new(0.0, 0.0)).is_err());
        assert_eq!(player.log().restarts, 0);
    });
}
