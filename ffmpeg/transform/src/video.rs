/*!
    Video scaling and pixel format conversion.
*/

use ffmpeg_next::{
    format::Pixel,
    software::scaling::{Context as ScalingContext, Flags},
    util::frame::video::Video as VideoFrameFFmpeg,
};

use ffmpeg_types::{Error, PixelFormat, Pts, Rational, Result, VideoFrame};

use crate::packing::{pack_frame, pixel_format_to_ffmpeg, unpack_frame};

/**
    Scaling algorithm used when the output size differs from the input.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScalingAlgorithm {
    /// Fastest, lowest quality.
    FastBilinear,
    /// Good default for video.
    #[default]
    Bilinear,
    /// Sharper than bilinear, slower.
    Bicubic,
    /// Highest quality, slowest.
    Lanczos,
    /// Nearest neighbour.
    Point,
}

impl ScalingAlgorithm {
    fn flags(self) -> Flags {
        match self {
            Self::FastBilinear => Flags::FAST_BILINEAR,
            Self::Bilinear => Flags::BILINEAR,
            Self::Bicubic => Flags::BICUBIC,
            Self::Lanczos => Flags::LANCZOS,
            Self::Point => Flags::POINT,
        }
    }
}

/**
    Configuration for a video transform.

    A missing width or height is derived from the input, keeping its
    aspect ratio when the other dimension is given.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoTransformConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub format: PixelFormat,
    pub algorithm: ScalingAlgorithm,
}

impl VideoTransformConfig {
    /**
        Scale to the given size and convert to the given format.
    */
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            format,
            algorithm: ScalingAlgorithm::default(),
        }
    }

    /**
        Scale to the given size as BGRA, the usual format for display surfaces.
    */
    pub fn to_bgra(width: u32, height: u32) -> Self {
        Self::new(width, height, PixelFormat::Bgra)
    }

    /**
        Convert the pixel format only, keeping the input size.
    */
    pub fn format_only(format: PixelFormat) -> Self {
        Self {
            width: None,
            height: None,
            format,
            algorithm: ScalingAlgorithm::default(),
        }
    }

    pub fn with_algorithm(mut self, algorithm: ScalingAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /**
        Output size for an input of the given size.
    */
    pub fn target_size(&self, width: u32, height: u32) -> (u32, u32) {
        let scale = |value: u32, num: u32, den: u32| -> u32 {
            if den == 0 {
                return value.max(1);
            }
            ((value as u64 * num as u64 + den as u64 / 2) / den as u64).max(1) as u32
        };

        match (self.width, self.height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, scale(height, w, width)),
            (None, Some(h)) => (scale(width, h, height), h),
            (None, None) => (width, height),
        }
    }
}

/**
    Scaler and the input geometry it was built for.
*/
struct Scaler {
    context: ScalingContext,
    input: (Pixel, u32, u32),
    output: (u32, u32),
}

/**
    Video frame transformer.

    Converts frames to the configured size and pixel format using FFmpeg's
    software scaler. Each frame transforms independently.
*/
pub struct VideoTransform {
    config: VideoTransformConfig,
    scaler: Option<Scaler>,
}

impl VideoTransform {
    /**
        Create a new transform. The scaler is built on the first frame.
    */
    pub fn new(config: VideoTransformConfig) -> Self {
        Self {
            config,
            scaler: None,
        }
    }

    /**
        Returns true if `frame` would be converted rather than passed through.
    */
    pub fn needs_conversion(&self, frame: &VideoFrame) -> bool {
        frame.format != self.config.format
            || self.config.target_size(frame.width, frame.height) != (frame.width, frame.height)
    }

    /**
        Transform a frame.

        Frames already in the target format and size are returned as a
        retained reference to the same pixel buffer.
    */
    pub fn transform(&mut self, frame: &VideoFrame) -> Result<VideoFrame> {
        if !self.needs_conversion(frame) {
            return Ok(frame.clone());
        }

        let input = unpack_frame(frame)?;
        self.run(&input, frame.pts, frame.time_base)
    }

    /**
        Transform a frame straight out of a decoder.

        Used for decoder output whose pixel format has no [`PixelFormat`] name.
    */
    pub fn transform_raw(
        &mut self,
        frame: &VideoFrameFFmpeg,
        pts: Option<Pts>,
        time_base: Rational,
    ) -> Result<VideoFrame> {
        self.run(frame, pts, time_base)
    }

    fn run(
        &mut self,
        input: &VideoFrameFFmpeg,
        pts: Option<Pts>,
        time_base: Rational,
    ) -> Result<VideoFrame> {
        let format = self.config.format;
        let (width, height) = self.config.target_size(input.width(), input.height());
        let scaler = self.scaler_for(input.format(), input.width(), input.height())?;

        let mut output = VideoFrameFFmpeg::empty();
        scaler
            .run(input, &mut output)
            .map_err(|e| Error::codec(format!("scale frame: {e}")))?;

        Ok(VideoFrame::new(
            pack_frame(&output, format)?,
            width,
            height,
            format,
            pts,
            time_base,
        ))
    }

    /**
        Get the scaler for the given input geometry, rebuilding it if the
        geometry changed since the last frame.
    */
    fn scaler_for(
        &mut self,
        format: Pixel,
        width: u32,
        height: u32,
    ) -> Result<&mut ScalingContext> {
        let input = (format, width, height);
        let output = self.config.target_size(width, height);

        let stale = self
            .scaler
            .as_ref()
            .is_none_or(|s| s.input != input || s.output != output);

        if stale {
            let target = pixel_format_to_ffmpeg(self.config.format).ok_or_else(|| {
                Error::unsupported_format(format!(
                    "no ffmpeg pixel format for {:?}",
                    self.config.format
                ))
            })?;

            if self.scaler.is_some() {
                log::debug!(
                    "input changed to {format:?} {width}x{height}, rebuilding scaler"
                );
            }

            let context = ScalingContext::get(
                format,
                width,
                height,
                target,
                output.0,
                output.1,
                self.config.algorithm.flags(),
            )
            .map_err(|e| Error::unsupported_format(format!("create scaler: {e}")))?;

            self.scaler = Some(Scaler {
                context,
                input,
                output,
            });
        }

        match self.scaler.as_mut() {
            Some(scaler) => Ok(&mut scaler.context),
            None => Err(Error::codec("scaler was not initialized")),
        }
    }
}

impl std::fmt::Debug for VideoTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoTransform")
            .field("config", &self.config)
            .field("initialized", &self.scaler.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TB: Rational = Rational { num: 1, den: 90000 };

    fn solid_yuv(width: u32, height: u32) -> VideoFrame {
        let size = PixelFormat::Yuv420p.buffer_size(width, height);
        let luma = (width * height) as usize;
        let mut data = vec![128u8; size];
        data[..luma].fill(200);
        VideoFrame::new(data, width, height, PixelFormat::Yuv420p, Some(Pts(9000)), TB)
    }

    #[test]
    fn target_size_keeps_aspect_ratio() {
        let config = VideoTransformConfig {
            width: Some(640),
            height: None,
            format: PixelFormat::Bgra,
            algorithm: ScalingAlgorithm::Bilinear,
        };
        assert_eq!(config.target_size(1920, 1080), (640, 360));

        let config = VideoTransformConfig {
            width: None,
            height: Some(540),
            ..config
        };
        assert_eq!(config.target_size(1920, 1080), (960, 540));
    }

    #[test]
    fn target_size_defaults_to_input() {
        let config = VideoTransformConfig::format_only(PixelFormat::Rgba);
        assert_eq!(config.target_size(1280, 720), (1280, 720));
        assert_eq!(
            VideoTransformConfig::to_bgra(320, 240).target_size(1280, 720),
            (320, 240)
        );
    }

    #[test]
    fn matching_frames_pass_through() {
        let frame = solid_yuv(16, 8);
        let mut transform =
            VideoTransform::new(VideoTransformConfig::format_only(PixelFormat::Yuv420p));

        assert!(!transform.needs_conversion(&frame));
        let out = transform.transform(&frame).unwrap();
        assert!(out.shares_buffer_with(&frame));
    }

    #[test]
    fn converts_to_bgra() {
        let frame = solid_yuv(16, 8);
        let mut transform = VideoTransform::new(VideoTransformConfig::format_only(PixelFormat::Bgra));

        let out = transform.transform(&frame).unwrap();
        assert_eq!(out.format, PixelFormat::Bgra);
        assert_eq!((out.width, out.height), (16, 8));
        assert_eq!(out.data.len(), 16 * 8 * 4);
        assert_eq!(out.pts, Some(Pts(9000)));
        assert!(!out.shares_buffer_with(&frame));
    }

    #[test]
    fn rebuilds_scaler_when_input_changes() {
        let mut transform = VideoTransform::new(VideoTransformConfig::to_bgra(8, 8));

        let small = transform.transform(&solid_yuv(16, 16)).unwrap();
        let large = transform.transform(&solid_yuv(32, 18)).unwrap();

        assert_eq!((small.width, small.height), (8, 8));
        assert_eq!((large.width, large.height), (8, 8));
        assert_eq!(large.data.len(), 8 * 8 * 4);
    }
}
