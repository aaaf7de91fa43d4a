/*!
    FFmpeg-backed frame source.
*/

use std::collections::VecDeque;

use ffmpeg_decode::{VideoDecoder, VideoDecoderConfig};
use ffmpeg_source::Source;
use ffmpeg_transform::{VideoTransform, VideoTransformConfig};
use ffmpeg_types::{Error, Result, StreamUrl, VideoFrame, VideoStreamInfo};

use crate::source::{FrameSource, SourceOpener};

/**
    Opens media through FFmpeg.

    `output` selects the format frames are delivered in; None delivers
    frames in the stream's native format.
*/
#[derive(Clone, Debug, Default)]
pub struct FfmpegOpener {
    pub decoder: VideoDecoderConfig,
    pub output: Option<VideoTransformConfig>,
}

impl FfmpegOpener {
    pub fn new(decoder: VideoDecoderConfig, output: Option<VideoTransformConfig>) -> Self {
        Self { decoder, output }
    }
}

impl SourceOpener for FfmpegOpener {
    type Source = FfmpegPipeline;

    fn open(&self, url: &StreamUrl) -> Result<FfmpegPipeline> {
        let mut source = ffmpeg_source::open(url)?;

        let codec_config = source
            .take_codec_config()
            .ok_or_else(|| Error::open(url.as_str(), "codec configuration unavailable"))?;

        let decoder = VideoDecoder::new(codec_config, source.time_base(), self.decoder.clone())
            .map_err(|e| Error::open(url.as_str(), e.to_string()))?;

        let info = VideoStreamInfo {
            width: decoder.width(),
            height: decoder.height(),
            pixel_format: decoder.pixel_format(),
            codec: source.codec_id(),
            time_base: source.time_base(),
            frame_rate: source.frame_rate(),
        };

        Ok(FfmpegPipeline {
            transform: self.output.clone().map(VideoTransform::new),
            decoder,
            source,
            info,
            pending: VecDeque::new(),
            drained: false,
            packets_skipped: 0,
        })
    }
}

/**
    Source, decoder and optional transform chained into one frame source.
*/
pub struct FfmpegPipeline {
    transform: Option<VideoTransform>,
    decoder: VideoDecoder,
    source: Source,
    info: VideoStreamInfo,
    /// Frames decoded from one packet beyond the one already returned.
    pending: VecDeque<VideoFrame>,
    /// The input is exhausted and the decoder has been flushed.
    drained: bool,
    /// Packets the decoder rejected.
    packets_skipped: u64,
}

impl FfmpegPipeline {
    fn deliver(&mut self, frame: VideoFrame) -> Result<VideoFrame> {
        let frame = match self.transform.as_mut() {
            Some(transform) => transform.transform(&frame)?,
            None => frame,
        };

        log::info!(
            "decoded frame: {}x{}, pts={}",
            frame.width,
            frame.height,
            frame.pts.map_or_else(|| "none".to_string(), |pts| pts.0.to_string())
        );

        Ok(frame)
    }
}

impl FrameSource for FfmpegPipeline {
    fn stream_info(&self) -> &VideoStreamInfo {
        &self.info
    }

    fn next_frame(&mut self) -> Result<VideoFrame> {
        loop {
            if let Some(frame) = self.pending.pop_front() {
                return self.deliver(frame);
            }

            if self.drained {
                return Err(Error::Eof);
            }

            match self.source.read_packet() {
                Ok(packet) => match self.decoder.decode(&packet) {
                    Ok(frames) => self.pending.extend(frames),
                    Err(Error::Codec { message }) => {
                        self.packets_skipped += 1;
                        log::warn!("skipping packet the decoder rejected: {message}");
                    }
                    Err(e) => return Err(e),
                },
                Err(Error::Eof) => {
                    self.drained = true;
                    let frames = self.decoder.flush()?;
                    self.pending.extend(frames);
                    log::info!(
                        "end of input: {} packets read, {} skipped, {} frames decoded",
                        self.source.packets_read(),
                        self.packets_skipped,
                        self.decoder.frames_decoded()
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl std::fmt::Debug for FfmpegPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FfmpegPipeline")
            .field("source", &self.source)
            .field("decoder", &self.decoder)
            .field("transform", &self.transform)
            .field("pending", &self.pending.len())
            .field("drained", &self.drained)
            .field("packets_skipped", &self.packets_skipped)
            .finish()
    }
}
