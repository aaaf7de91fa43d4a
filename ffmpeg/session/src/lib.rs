/*!
    Stream sessions and frame polling for the ffmpeg crate ecosystem.

    A [`StreamSession`] owns one open media source from `open` to `close`
    and always holds the most recently decoded frame. A [`FramePoller`]
    drives a session at a fixed cadence until an iteration limit, the end of
    the stream, or a failure.

    # Example

    ```ignore
    use ffmpeg_session::{AutoOpener, FramePoller, PollConfig, StreamSession};

    let mut session = StreamSession::new(AutoOpener::default());
    session.open("https://example.com/live/playlist.m3u8")?;

    let report = FramePoller::new(PollConfig::default()).run(&mut session, |frame| {
        // Render, encode, …
    });

    session.close();
    ```

    # Sources

    Sessions are generic over a [`SourceOpener`], the boundary to whatever
    actually produces frames:

    - [`FfmpegOpener`] - FFmpeg demuxing and decoding, optional conversion
      to a display format
    - [`SyntheticOpener`] - generated frames for `synthetic://` URLs
    - [`AutoOpener`] - picks one of the above by URL scheme

    # Lifecycle

    A session moves through **Unopened → Open → Closed**. Closed is
    terminal, including after a failed `open`; retrying means creating a
    new session. All source resources are released on `close`, or on drop
    if the session is never closed.
*/

pub use ffmpeg_types::{Error, Result, StreamUrl, VideoFrame, VideoStreamInfo};

mod auto;
mod pipeline;
mod poller;
mod session;
mod source;
mod synthetic;

pub use auto::{AutoOpener, AutoSource};
pub use pipeline::{FfmpegOpener, FfmpegPipeline};
pub use poller::{
    DEFAULT_FRAME_INTERVAL, DEFAULT_ITERATIONS, FramePoller, Pacing, PollConfig, PollReport,
    StopReason,
};
pub use session::{SessionState, StreamSession};
pub use source::{FrameSource, SourceOpener};
pub use synthetic::{SYNTHETIC_SCHEME, SyntheticOpener, SyntheticSource};
