//! Overplay
//!
//! Host for the motion engine: wires recorded or simulated sensor sources,
//! the reference video element and the volume slider into a
//! `MotionController`, and prints the status text it produces.

pub mod app;
pub mod config;
pub mod geolocation;
pub mod sensors;
pub mod trace;

pub use config::HostConfig;
pub use trace::{Trace, TraceEntry, TraceEvent, TraceError};
