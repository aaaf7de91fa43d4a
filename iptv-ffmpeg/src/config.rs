use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;

use ffmpeg_decode::VideoDecoderConfig;
use ffmpeg_session::{FfmpegOpener, Pacing, PollConfig};
use ffmpeg_transform::VideoTransformConfig;
use ffmpeg_types::PixelFormat;

pub const DEFAULT_URL: &str =
    "https://bloomberg-bloombergtv-1-it.samsung.wurl.tv/manifest/playlist.m3u8";

/// Pixel format frames are delivered in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Whatever the decoder produces
    Native,
    #[default]
    Bgra,
    Rgba,
    Rgb24,
}

impl OutputFormat {
    fn pixel_format(self) -> Option<PixelFormat> {
        match self {
            Self::Native => None,
            Self::Bgra => Some(PixelFormat::Bgra),
            Self::Rgba => Some(PixelFormat::Rgba),
            Self::Rgb24 => Some(PixelFormat::Rgb24),
        }
    }
}

/// Player settings, loadable from a JSON file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerConfig {
    pub url: String,
    /// Iterations to poll; 0 polls until the stream ends.
    pub frames: u64,
    pub interval_us: u64,
    pub paced: bool,
    pub hw_accel: bool,
    pub output_format: OutputFormat,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            frames: 100,
            interval_us: 16_667,
            paced: false,
            hw_accel: false,
            output_format: OutputFormat::default(),
        }
    }
}

/// Values given on the command line. Unset values keep the config's.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub url: Option<String>,
    pub frames: Option<u64>,
    pub interval_us: Option<u64>,
    pub paced: bool,
    pub hw_accel: bool,
    pub output_format: Option<OutputFormat>,
}

impl PlayerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn merge(mut self, overrides: Overrides) -> Self {
        if let Some(url) = overrides.url {
            self.url = url;
        }
        if let Some(frames) = overrides.frames {
            self.frames = frames;
        }
        if let Some(interval_us) = overrides.interval_us {
            self.interval_us = interval_us;
        }
        self.paced |= overrides.paced;
        self.hw_accel |= overrides.hw_accel;
        if let Some(format) = overrides.output_format {
            self.output_format = format;
        }
        self
    }

    pub fn poll_config(&self) -> PollConfig {
        let interval = Duration::from_micros(self.interval_us);
        let pacing = if interval.is_zero() {
            Pacing::None
        } else if self.paced {
            Pacing::Clock { interval }
        } else {
            Pacing::FixedDelay(interval)
        };
        let max_iterations = (self.frames > 0).then_some(self.frames);
        PollConfig::new(max_iterations, pacing)
    }

    pub fn ffmpeg_opener(&self) -> FfmpegOpener {
        let decoder = if self.hw_accel {
            VideoDecoderConfig::with_hw_accel()
        } else {
            VideoDecoderConfig::new()
        };
        let output = self
            .output_format
            .pixel_format()
            .map(VideoTransformConfig::format_only);
        FfmpegOpener::new(decoder, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_demo() {
        let config = PlayerConfig::default();
        assert_eq!(config.url, DEFAULT_URL);
        assert_eq!(
            config.poll_config(),
            PollConfig::new(
                Some(100),
                Pacing::FixedDelay(Duration::from_micros(16_667))
            )
        );
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = PlayerConfig::from_json(r#"{ "frames": 5, "output_format": "rgb24" }"#)
            .unwrap();
        assert_eq!(config.frames, 5);
        assert_eq!(config.output_format, OutputFormat::Rgb24);
        assert_eq!(config.url, DEFAULT_URL);
        assert_eq!(config.interval_us, 16_667);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(PlayerConfig::from_json(r#"{ "frame": 5 }"#).is_err());
    }

    #[test]
    fn command_line_wins() {
        let config = PlayerConfig::from_json(r#"{ "url": "synthetic://", "frames": 5 }"#)
            .unwrap()
            .merge(Overrides {
                frames: Some(7),
                paced: true,
                ..Overrides::default()
            });
        assert_eq!(config.url, "synthetic://");
        assert_eq!(config.frames, 7);
        assert!(config.paced);
    }

    #[test]
    fn zero_frames_is_unbounded() {
        let config = PlayerConfig {
            frames: 0,
            interval_us: 0,
            ..PlayerConfig::default()
        };
        let poll = config.poll_config();
        assert_eq!(poll.max_iterations, None);
        assert_eq!(poll.pacing, Pacing::None);
    }

    #[test]
    fn paced_uses_clock() {
        let config = PlayerConfig {
            paced: true,
            interval_us: 40_000,
            ..PlayerConfig::default()
        };
        assert_eq!(
            config.poll_config().pacing,
            Pacing::Clock {
                interval: Duration::from_millis(40)
            }
        );
    }

    #[test]
    fn native_output_skips_conversion() {
        let config = PlayerConfig {
            output_format: OutputFormat::Native,
            ..PlayerConfig::default()
        };
        assert!(config.ffmpeg_opener().output.is_none());
        assert_eq!(
            PlayerConfig::default().ffmpeg_opener().output,
            Some(VideoTransformConfig::format_only(PixelFormat::Bgra))
        );
    }
}
