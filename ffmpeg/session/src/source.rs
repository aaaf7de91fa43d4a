/*!
    The boundary between a session and whatever produces its frames.
*/

use ffmpeg_types::{Result, StreamUrl, VideoFrame, VideoStreamInfo};

/**
    An open producer of decoded frames.

    Dropping a source releases everything it holds.
*/
pub trait FrameSource {
    /// Metadata of the video stream being decoded.
    fn stream_info(&self) -> &VideoStreamInfo;

    /**
        Produce the next displayable frame.

        May consume any number of packets internally. Returns
        [`Error::Eof`](ffmpeg_types::Error::Eof) once the stream is exhausted.
    */
    fn next_frame(&mut self) -> Result<VideoFrame>;
}

/**
    Opens sources for a session.
*/
pub trait SourceOpener {
    type Source: FrameSource;

    /**
        Open the media at `url`.

        A failed open must not leave anything allocated behind.
    */
    fn open(&self, url: &StreamUrl) -> Result<Self::Source>;
}
