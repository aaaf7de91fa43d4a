/*!
    Stream metadata.
*/

use std::time::Duration;

use crate::{CodecId, PixelFormat, Rational};

/**
    Metadata of the video stream a source decodes.

    `pixel_format` is None when the decoder reports a format this crate
    ecosystem has no name for; frames are then only usable after a transform.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoStreamInfo {
    pub width: u32,
    pub height: u32,
    pub pixel_format: Option<PixelFormat>,
    pub codec: CodecId,
    pub time_base: Rational,
    /// Average frame rate, None if the container does not advertise one (common for live HLS).
    pub frame_rate: Option<Rational>,
}

impl VideoStreamInfo {
    /**
        Nominal time between frames, if the frame rate is known.
    */
    pub fn frame_interval(&self) -> Option<Duration> {
        self.frame_rate.and_then(Rational::frame_interval)
    }

    /**
        Returns a `WxH` string for logging.
    */
    pub fn resolution(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(frame_rate: Option<Rational>) -> VideoStreamInfo {
        VideoStreamInfo {
            width: 1280,
            height: 720,
            pixel_format: Some(PixelFormat::Yuv420p),
            codec: CodecId::H264,
            time_base: Rational::new(1, 90000),
            frame_rate,
        }
    }

    #[test]
    fn resolution_string() {
        assert_eq!(info(None).resolution(), "1280x720");
    }

    #[test]
    fn frame_interval_from_rate() {
        assert_eq!(
            info(Some(Rational::new(50, 1))).frame_interval(),
            Some(Duration::from_millis(20))
        );
        assert_eq!(info(None).frame_interval(), None);
    }
}
