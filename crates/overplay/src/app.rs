//! Host Application
//!
//! Loads the video, spawns the controller, attaches every source and prints
//! status text until the recording has been fully delivered.

use std::sync::Arc;
use std::time::{Duration, Instant};

use overplay_media::{ReadyState, VideoElement, VideoHandle, VolumeSlider};
use overplay_motion::{ControlSnapshot, MotionController, SourceKind};
use smol::stream::StreamExt;
use smol::Timer;

use crate::config::HostConfig;
use crate::geolocation::watch_position;
use crate::sensors::{MissingSensor, ReplaySensor};
use crate::trace::{timed, Trace};

/// Summary printed when a run finishes
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    pub snapshot: ControlSnapshot,
    pub volume: f32,
    pub statuses: usize,
}

/// Run the host until the trace (or demo) is exhausted
pub async fn run(config: HostConfig) -> anyhow::Result<()> {
    let trace = match &config.trace {
        Some(path) => Trace::load(path)?,
        None => {
            tracing::info!("No trace given, running the built-in demo");
            Trace::demo(config.sample_interval)
        }
    };

    let summary = replay(&config, &trace).await?;
    println!(
        "Finished: status {} | t={:.1}s | volume {:.2} | {} samples | {:?}",
        summary.snapshot.status,
        summary.snapshot.current_time,
        summary.volume,
        summary.snapshot.samples,
        summary.snapshot.rotation.orientation,
    );
    Ok(())
}

/// Drive one controller through a trace
pub async fn replay(config: &HostConfig, trace: &Trace) -> anyhow::Result<RunSummary> {
    let video = load_video(config);
    let slider = Arc::new(VolumeSlider::default());

    let (mut controller, statuses) =
        MotionController::spawn(config.control_config(), video.clone(), slider.clone());

    let printer = smol::spawn(async move {
        let mut printed = 0;
        while let Ok(status) = statuses.recv().await {
            println!("{}", status);
            printed += 1;
        }
        printed
    });
    let clock = smol::spawn(run_clock(video.clone(), config.clock_tick));

    if config.disable_motion {
        controller.attach_motion(MissingSensor);
    } else {
        controller.attach_motion(ReplaySensor::new(trace.gravity()));
    }
    controller.attach_orientation(timed(trace.orientations()));
    controller.attach_location(watch_position(timed(trace.locations()), config.distance_filter));
    controller.attach_shake(timed(trace.shakes()));

    let started = Instant::now();
    let sources = [
        SourceKind::Motion,
        SourceKind::Orientation,
        SourceKind::Location,
        SourceKind::Shake,
    ];
    for kind in sources {
        controller.finish(kind).await;
    }
    tracing::debug!(
        "Trace delivered in {:?} (recorded span {:?})",
        started.elapsed(),
        trace.span()
    );

    // Let the last debounced volume step land before reading the slider.
    Timer::after(config.volume_debounce * 2).await;
    let snapshot = controller.snapshot().await?;
    controller.shutdown().await;
    clock.cancel().await;

    // The status channel closes once the worker is gone.
    let statuses = printer.await;

    Ok(RunSummary {
        snapshot,
        volume: slider.value(),
        statuses,
    })
}

fn load_video(config: &HostConfig) -> VideoHandle {
    let mut video = VideoElement::from_url(&config.url);
    video.set_metadata(config.duration);
    video.set_ready_state(ReadyState::HaveEnoughData);
    VideoHandle::new(video)
}

/// Advance the player clock in real time
async fn run_clock(video: VideoHandle, tick: Duration) {
    let mut ticks = Timer::interval(tick);
    let mut last = Instant::now();
    while let Some(now) = ticks.next().await {
        video.lock().advance(now.duration_since(last).as_secs_f64());
        last = now;
    }
}
