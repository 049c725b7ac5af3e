//! Sensor Traces
//!
//! JSON recordings of sensor activity, replayed at their recorded offsets.
//!
//! ```json
//! [
//!   { "at_ms": 0,    "event": { "gravity": { "x": 0.0, "y": -1.0, "z": 0.0 } } },
//!   { "at_ms": 250,  "event": { "orientation": "landscape_left" } },
//!   { "at_ms": 600,  "event": { "orientation": null } },
//!   { "at_ms": 900,  "event": { "location": { "latitude": -12.04, "longitude": -77.03 } } },
//!   { "at_ms": 1200, "event": "shake" }
//! ]
//! ```

use std::path::Path;
use std::time::{Duration, Instant};

use overplay_motion::{DeviceOrientation, GravitySample, LocationEvent, OrientationEvent};
use serde::{Deserialize, Serialize};
use smol::stream::Stream;
use smol::Timer;

/// Trace loading error
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("Failed to read trace: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed trace: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Raw orientation names used in trace files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceOrientation {
    Unknown,
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
    FaceUp,
    FaceDown,
}

impl From<TraceOrientation> for DeviceOrientation {
    fn from(value: TraceOrientation) -> Self {
        match value {
            TraceOrientation::Unknown => DeviceOrientation::Unknown,
            TraceOrientation::Portrait => DeviceOrientation::Portrait,
            TraceOrientation::PortraitUpsideDown => DeviceOrientation::PortraitUpsideDown,
            TraceOrientation::LandscapeLeft => DeviceOrientation::LandscapeLeft,
            TraceOrientation::LandscapeRight => DeviceOrientation::LandscapeRight,
            TraceOrientation::FaceUp => DeviceOrientation::FaceUp,
            TraceOrientation::FaceDown => DeviceOrientation::FaceDown,
        }
    }
}

/// Recorded event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceEvent {
    Gravity { x: f64, y: f64, z: f64 },
    /// `null` when the notification carried no device reading
    Orientation(Option<TraceOrientation>),
    Location { latitude: f64, longitude: f64 },
    Shake,
}

/// Event with its offset from the start of the recording
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub at_ms: u64,
    pub event: TraceEvent,
}

impl TraceEntry {
    pub fn at(&self) -> Duration {
        Duration::from_millis(self.at_ms)
    }
}

/// Ordered sensor recording
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trace {
    entries: Vec<TraceEntry>,
}

impl Trace {
    pub fn new(mut entries: Vec<TraceEntry>) -> Self {
        entries.sort_by_key(|e| e.at_ms);
        Self { entries }
    }

    pub fn from_json(json: &str) -> Result<Self, TraceError> {
        let entries: Vec<TraceEntry> = serde_json::from_str(json)?;
        Ok(Self::new(entries))
    }

    pub fn load(path: &Path) -> Result<Self, TraceError> {
        let json = std::fs::read_to_string(path)?;
        let trace = Self::from_json(&json)?;
        tracing::info!("Loaded {} trace entries from {}", trace.len(), path.display());
        Ok(trace)
    }

    pub fn to_json(&self) -> Result<String, TraceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Offset of the last entry
    pub fn span(&self) -> Duration {
        self.entries.last().map(TraceEntry::at).unwrap_or_default()
    }

    pub fn gravity(&self) -> Vec<(Duration, GravitySample)> {
        self.select(|event| match event {
            TraceEvent::Gravity { x, y, z } => Some(GravitySample::new(x, y, z)),
            _ => None,
        })
    }

    pub fn orientations(&self) -> Vec<(Duration, OrientationEvent)> {
        self.select(|event| match event {
            TraceEvent::Orientation(Some(raw)) => Some(OrientationEvent::new(raw.into())),
            TraceEvent::Orientation(None) => Some(OrientationEvent::without_device()),
            _ => None,
        })
    }

    pub fn locations(&self) -> Vec<(Duration, LocationEvent)> {
        self.select(|event| match event {
            TraceEvent::Location { latitude, longitude } => {
                Some(LocationEvent::new(latitude, longitude))
            }
            _ => None,
        })
    }

    pub fn shakes(&self) -> Vec<(Duration, ())> {
        self.select(|event| matches!(event, TraceEvent::Shake).then_some(()))
    }

    fn select<T>(&self, pick: impl Fn(TraceEvent) -> Option<T>) -> Vec<(Duration, T)> {
        self.entries
            .iter()
            .filter_map(|entry| pick(entry.event).map(|item| (entry.at(), item)))
            .collect()
    }

    /// Built-in gesture script used when no trace is given
    pub fn demo(interval: Duration) -> Self {
        let step = interval.as_millis() as u64;
        let gravity = |x: f64, y: f64, z: f64| TraceEvent::Gravity { x, y, z };

        // Upright portrait rests at a roll of π, inside the dead zone.
        let rest = gravity(0.0, -1.0, 0.0);
        let roll = |angle: f64| gravity(angle.sin(), angle.cos(), 0.0);
        // Landscape rest re-frames to π as well.
        let landscape_rest = gravity(1.0, 0.0, 0.0);
        let landscape_tilt = |z: f64| gravity((1.0 - z * z).sqrt(), 0.0, z);

        let portrait = [
            rest, rest, rest, rest,
            // forward band
            roll(2.3), roll(2.3),
            rest, rest,
            // backward band
            roll(-2.3),
            rest, rest,
        ];
        let landscape = [
            landscape_rest, landscape_rest,
            // volume up
            landscape_tilt(0.7), landscape_tilt(0.7), landscape_tilt(0.7),
            landscape_rest, landscape_rest,
            // volume down
            landscape_tilt(-0.7), landscape_tilt(-0.7),
            landscape_rest, landscape_rest, landscape_rest,
        ];

        let mut entries: Vec<TraceEntry> = portrait
            .iter()
            .chain(landscape.iter())
            .enumerate()
            .map(|(i, event)| TraceEntry { at_ms: i as u64 * step, event: *event })
            .collect();

        let flip = portrait.len() as u64 * step - step / 2;
        let end = (portrait.len() + landscape.len()) as u64 * step;
        let at = |at_ms: u64, event: TraceEvent| TraceEntry { at_ms, event };
        let fix = |latitude: f64, longitude: f64| TraceEvent::Location { latitude, longitude };
        entries.extend([
            at(0, fix(-12.0464, -77.0428)),
            // a couple of meters: dropped by the distance filter
            at(end / 3, fix(-12.04642, -77.04281)),
            at(flip, TraceEvent::Orientation(Some(TraceOrientation::LandscapeLeft))),
            // notification without a reading leaves landscape in place
            at(flip + 2 * step, TraceEvent::Orientation(None)),
            // ~110 m north
            at(end * 2 / 3, fix(-12.0454, -77.0428)),
            at(end * 3 / 4, TraceEvent::Shake),
            at(end, TraceEvent::Shake),
        ]);

        Self::new(entries)
    }
}

/// Stream yielding each item once its offset (from the moment the stream is
/// created) has passed.
pub fn timed<T>(items: Vec<(Duration, T)>) -> impl Stream<Item = T> + Send + 'static
where
    T: Send + 'static,
{
    let start = Instant::now();
    smol::stream::unfold(items.into_iter(), move |mut rest| async move {
        let (at, item) = rest.next()?;
        Timer::at(start + at).await;
        Some((item, rest))
    })
}
