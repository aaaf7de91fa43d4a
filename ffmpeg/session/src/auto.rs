/*!
    Opener that picks a backend from the URL scheme.
*/

use ffmpeg_types::{Result, StreamUrl, VideoFrame, VideoStreamInfo};

use crate::pipeline::{FfmpegOpener, FfmpegPipeline};
use crate::source::{FrameSource, SourceOpener};
use crate::synthetic::{SYNTHETIC_SCHEME, SyntheticOpener, SyntheticSource};

/**
    Opens `synthetic://` URLs with the synthetic generator and everything
    else through FFmpeg.
*/
#[derive(Clone, Debug, Default)]
pub struct AutoOpener {
    pub ffmpeg: FfmpegOpener,
}

impl AutoOpener {
    pub fn new(ffmpeg: FfmpegOpener) -> Self {
        Self { ffmpeg }
    }
}

impl SourceOpener for AutoOpener {
    type Source = AutoSource;

    fn open(&self, url: &StreamUrl) -> Result<AutoSource> {
        if url.scheme() == SYNTHETIC_SCHEME {
            SyntheticOpener.open(url).map(AutoSource::Synthetic)
        } else {
            self.ffmpeg.open(url).map(AutoSource::Ffmpeg)
        }
    }
}

/**
    A source opened by [`AutoOpener`].
*/
#[derive(Debug)]
pub enum AutoSource {
    Ffmpeg(FfmpegPipeline),
    Synthetic(SyntheticSource),
}

impl FrameSource for AutoSource {
    fn stream_info(&self) -> &VideoStreamInfo {
        match self {
            Self::Ffmpeg(source) => source.stream_info(),
            Self::Synthetic(source) => source.stream_info(),
        }
    }

    fn next_frame(&mut self) -> Result<VideoFrame> {
        match self {
            Self::Ffmpeg(source) => source.next_frame(),
            Self::Synthetic(source) => source.next_frame(),
        }
    }
}
