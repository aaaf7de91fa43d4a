/*!
    Synthetic frame source for `synthetic://` URLs.

    Produces generated BGRA frames without touching FFmpeg or the network.
    Useful for exercising sessions and pollers offline.

    ```text
    synthetic://?frames=10&width=64&height=36&fps=25
    ```

    All parameters are optional. Without `frames` the source never ends,
    like a live stream; `frames=0` is an empty source.
*/

use ffmpeg_types::{
    CodecId, Error, PixelFormat, Pts, Rational, Result, StreamUrl, VideoFrame, VideoStreamInfo,
};

use crate::source::{FrameSource, SourceOpener};

pub const SYNTHETIC_SCHEME: &str = "synthetic";

const DEFAULT_WIDTH: u32 = 320;
const DEFAULT_HEIGHT: u32 = 180;
const DEFAULT_FPS: i32 = 30;
const MAX_DIMENSION: u32 = 8192;

/**
    Opens [`SyntheticSource`]s.
*/
#[derive(Clone, Copy, Debug, Default)]
pub struct SyntheticOpener;

impl SourceOpener for SyntheticOpener {
    type Source = SyntheticSource;

    fn open(&self, url: &StreamUrl) -> Result<SyntheticSource> {
        if url.scheme() != SYNTHETIC_SCHEME {
            return Err(Error::open(
                url.as_str(),
                format!("expected a {SYNTHETIC_SCHEME}:// url"),
            ));
        }

        let frames = param::<u64>(url, "frames")?;
        let width = param::<u32>(url, "width")?.unwrap_or(DEFAULT_WIDTH);
        let height = param::<u32>(url, "height")?.unwrap_or(DEFAULT_HEIGHT);
        let fps = param::<i32>(url, "fps")?.unwrap_or(DEFAULT_FPS);

        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(Error::open(
                url.as_str(),
                format!("unsupported frame size {width}x{height}"),
            ));
        }
        if fps <= 0 {
            return Err(Error::open(url.as_str(), "fps must be positive"));
        }

        log::debug!("synthetic source: {width}x{height} @ {fps} fps, frames={frames:?}");

        Ok(SyntheticSource {
            info: VideoStreamInfo {
                width,
                height,
                pixel_format: Some(PixelFormat::Bgra),
                codec: CodecId::Other,
                time_base: Rational::new(1, fps),
                frame_rate: Some(Rational::new(fps, 1)),
            },
            total: frames,
            produced: 0,
        })
    }
}

fn param<T: std::str::FromStr>(url: &StreamUrl, key: &str) -> Result<Option<T>> {
    match url.query_param(key) {
        None => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|_| {
            Error::open(url.as_str(), format!("invalid {key} parameter '{value}'"))
        }),
    }
}

/**
    Generated frames: a horizontal gradient that scrolls one pixel per frame.

    Frame `n` has PTS `n` in a `1/fps` time base.
*/
#[derive(Debug)]
pub struct SyntheticSource {
    info: VideoStreamInfo,
    total: Option<u64>,
    produced: u64,
}

impl SyntheticSource {
    /**
        Number of frames produced so far.
    */
    pub fn produced(&self) -> u64 {
        self.produced
    }

    fn render(&self, index: u64) -> Vec<u8> {
        let width = self.info.width as usize;
        let height = self.info.height as usize;
        let mut data = vec![0u8; width * height * 4];

        for (y, row) in data.chunks_exact_mut(width * 4).enumerate() {
            for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
                let shade = ((x as u64 + index) % 256) as u8;
                pixel.copy_from_slice(&[shade, (y % 256) as u8, 255 - shade, 255]);
            }
        }

        data
    }
}

impl FrameSource for SyntheticSource {
    fn stream_info(&self) -> &VideoStreamInfo {
        &self.info
    }

    fn next_frame(&mut self) -> Result<VideoFrame> {
        if self.total.is_some_and(|total| self.produced >= total) {
            return Err(Error::Eof);
        }

        let index = self.produced;
        self.produced += 1;

        Ok(VideoFrame::new(
            self.render(index),
            self.info.width,
            self.info.height,
            PixelFormat::Bgra,
            Some(Pts(index as i64)),
            self.info.time_base,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(url: &str) -> Result<SyntheticSource> {
        SyntheticOpener.open(&StreamUrl::parse(url).unwrap())
    }

    #[test]
    fn defaults() {
        let source = open("synthetic://").unwrap();
        let info = source.stream_info();
        assert_eq!((info.width, info.height), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
        assert_eq!(info.frame_rate, Some(Rational::new(DEFAULT_FPS, 1)));
        assert_eq!(info.pixel_format, Some(PixelFormat::Bgra));
    }

    #[test]
    fn produces_exactly_the_requested_frames() {
        let mut source = open("synthetic://?frames=3&width=4&height=2").unwrap();

        for expected_pts in 0..3 {
            let frame = source.next_frame().unwrap();
            assert_eq!(frame.pts, Some(Pts(expected_pts)));
            assert_eq!(frame.data.len(), 4 * 2 * 4);
        }

        assert!(source.next_frame().unwrap_err().is_eof());
        assert!(source.next_frame().unwrap_err().is_eof());
        assert_eq!(source.produced(), 3);
    }

    #[test]
    fn empty_source_ends_immediately() {
        let mut source = open("synthetic://?frames=0").unwrap();
        assert!(source.next_frame().unwrap_err().is_eof());
    }

    #[test]
    fn frames_differ_between_calls() {
        let mut source = open("synthetic://?width=8&height=1").unwrap();
        let first = source.next_frame().unwrap();
        let second = source.next_frame().unwrap();
        assert_ne!(first.data, second.data);
    }

    #[test]
    fn timing_follows_fps() {
        let mut source = open("synthetic://?fps=25&width=2&height=2").unwrap();
        source.next_frame().unwrap();
        let frame = source.next_frame().unwrap();
        assert_eq!(
            frame.pts.map(|pts| pts.to_duration(frame.time_base)),
            Some(std::time::Duration::from_millis(40))
        );
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(matches!(
            open("synthetic://?frames=ten").unwrap_err(),
            Error::Open { .. }
        ));
        assert!(open("synthetic://?width=0").is_err());
        assert!(open("synthetic://?fps=-1").is_err());
    }

    #[test]
    fn rejects_other_schemes() {
        let err = SyntheticOpener
            .open(&StreamUrl::parse("https://example.com/live.m3u8").unwrap())
            .unwrap_err();
        assert!(err.is_open_failure());
    }
}
