//! Host Configuration

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use overplay_motion::ControlConfig;

/// Video played when no URL is given
pub const DEFAULT_VIDEO_URL: &str =
    "http://commondatastorage.googleapis.com/gtv-videos-bucket/sample/WeAreGoingOnBullrun.mp4";

/// Host configuration options
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Opaque video URL handed to the player
    pub url: String,

    /// Known duration in seconds, `None` for live sources
    pub duration: Option<f64>,

    /// Recorded sensor trace to replay instead of the demo
    pub trace: Option<PathBuf>,

    /// Gravity sampling period
    pub sample_interval: Duration,

    /// Volume debounce delay
    pub volume_debounce: Duration,

    /// Minimum displacement between location fixes (meters)
    pub distance_filter: f64,

    /// Cancel stale volume requests
    pub coalesce_volume: bool,

    /// Pretend the device has no motion sensor
    pub disable_motion: bool,

    /// Player clock resolution
    pub clock_tick: Duration,

    pub show_help: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_VIDEO_URL.to_string(),
            duration: Some(47.0),
            trace: None,
            sample_interval: Duration::from_millis(250),
            volume_debounce: Duration::from_millis(10),
            distance_filter: 10.0,
            coalesce_volume: false,
            disable_motion: false,
            clock_tick: Duration::from_millis(100),
            show_help: false,
        }
    }
}

impl HostConfig {
    /// Parse command line arguments (program name already skipped)
    pub fn from_args<I>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--trace" => config.trace = Some(PathBuf::from(value(&mut args, &arg)?)),
                "--url" => config.url = value(&mut args, &arg)?,
                "--duration" => {
                    let raw = value(&mut args, &arg)?;
                    config.duration = match raw.as_str() {
                        "live" | "unknown" => None,
                        _ => Some(parse_number(&raw, &arg)?),
                    };
                }
                "--interval-ms" => {
                    let ms = parse_number::<u64>(&value(&mut args, &arg)?, &arg)?;
                    if ms == 0 {
                        bail!("--interval-ms must be positive");
                    }
                    config.sample_interval = Duration::from_millis(ms);
                }
                "--debounce-ms" => {
                    let millis = parse_number(&value(&mut args, &arg)?, &arg)?;
                    config.volume_debounce = Duration::from_millis(millis);
                }
                "--distance-filter" => {
                    let meters: f64 = parse_number(&value(&mut args, &arg)?, &arg)?;
                    if !meters.is_finite() || meters < 0.0 {
                        bail!("--distance-filter must be a non-negative number of meters");
                    }
                    config.distance_filter = meters;
                }
                "--coalesce" => config.coalesce_volume = true,
                "--no-motion" => config.disable_motion = true,
                "-h" | "--help" => config.show_help = true,
                other => bail!("Unknown argument: {}\n\n{}", other, Self::usage()),
            }
        }

        Ok(config)
    }

    /// Engine configuration derived from the host options
    pub fn control_config(&self) -> ControlConfig {
        ControlConfig {
            sample_interval: self.sample_interval,
            volume_debounce: self.volume_debounce,
            coalesce_volume: self.coalesce_volume,
            ..ControlConfig::default()
        }
    }

    pub fn usage() -> &'static str {
        "Usage: overplay [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --trace PATH            Replay a recorded JSON sensor trace\n\
         \x20 --url URL               Video URL\n\
         \x20 --duration SECS|live    Known video duration\n\
         \x20 --interval-ms N         Gravity sampling period (default 250)\n\
         \x20 --debounce-ms N         Volume debounce (default 10)\n\
         \x20 --distance-filter M     Location distance filter (default 10)\n\
         \x20 --coalesce              Drop stale volume requests\n\
         \x20 --no-motion             Run without a motion sensor\n\
         \x20 -h, --help              Show this help"
    }
}

fn value<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> anyhow::Result<String> {
    args.next().with_context(|| format!("{} expects a value", flag))
}

fn parse_number<T>(raw: &str, flag: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse().with_context(|| format!("Invalid value for {}: {}", flag, raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<HostConfig> {
        HostConfig::from_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.url, DEFAULT_VIDEO_URL);
        assert_eq!(config.distance_filter, 10.0);
        assert_eq!(config.control_config().sample_interval, Duration::from_millis(250));
    }

    #[test]
    fn test_flags() {
        let config = parse(&[
            "--trace", "ride.json",
            "--duration", "live",
            "--interval-ms", "100",
            "--coalesce",
            "--distance-filter", "25.5",
        ])
        .unwrap();

        assert_eq!(config.trace, Some(PathBuf::from("ride.json")));
        assert_eq!(config.duration, None);
        assert_eq!(config.sample_interval, Duration::from_millis(100));
        assert!(config.control_config().coalesce_volume);
        assert_eq!(config.distance_filter, 25.5);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(parse(&["--interval-ms", "0"]).is_err());
        assert!(parse(&["--duration", "soon"]).is_err());
        assert!(parse(&["--trace"]).is_err());
        assert!(parse(&["--bogus"]).is_err());
    }
}
