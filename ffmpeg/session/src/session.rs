/*!
    Stream session lifecycle.
*/

use ffmpeg_types::{Error, Result, StreamUrl, VideoFrame, VideoStreamInfo};

use crate::source::{FrameSource, SourceOpener};

/**
    Lifecycle state of a [`StreamSession`].
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Created, `open` not yet called.
    Unopened,
    /// Holding an open source.
    Open,
    /// Closed explicitly or after a failed open. Terminal.
    Closed,
}

/// How the first failed read ended; replayed on later reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ReadFailure {
    EndOfStream,
    Fault,
}

impl ReadFailure {
    fn to_error(self) -> Error {
        match self {
            Self::EndOfStream => Error::Eof,
            Self::Fault => Error::Terminated,
        }
    }
}

/**
    One open media stream and its most recently decoded frame.

    The session exclusively owns its source. Frames handed out by
    [`latest_frame`](Self::latest_frame) share their pixel buffer with the
    session and stay valid after it is closed or dropped.
*/
pub struct StreamSession<O: SourceOpener> {
    opener: O,
    state: SessionState,
    url: Option<StreamUrl>,
    source: Option<O::Source>,
    latest: Option<VideoFrame>,
    failure: Option<ReadFailure>,
    frames_read: u64,
}

impl<O: SourceOpener> StreamSession<O> {
    /**
        Create an unopened session that opens sources through `opener`.
    */
    pub fn new(opener: O) -> Self {
        Self {
            opener,
            state: SessionState::Unopened,
            url: None,
            source: None,
            latest: None,
            failure: None,
            frames_read: 0,
        }
    }

    /**
        Parse `url` and open it.

        See [`open_url`](Self::open_url).
    */
    pub fn open(&mut self, url: &str) -> Result<()> {
        self.ensure_unopened()?;
        match StreamUrl::parse(url) {
            Ok(url) => self.open_url(&url),
            Err(e) => {
                self.state = SessionState::Closed;
                Err(e)
            }
        }
    }

    /**
        Open the media at `url`.

        # Errors

        - [`Error::AlreadyOpen`] if the session is open
        - [`Error::Closed`] if the session is closed
        - Whatever the opener reports; the session is then closed and
          holds nothing
    */
    pub fn open_url(&mut self, url: &StreamUrl) -> Result<()> {
        self.ensure_unopened()?;

        match self.opener.open(url) {
            Ok(source) => {
                let info = source.stream_info();
                let cadence = info.frame_interval().map_or_else(
                    || "unknown frame rate".to_string(),
                    |interval| format!("{interval:?} per frame"),
                );
                log::info!(
                    "stream opened: resolution {} ({}, {cadence}, {url})",
                    info.resolution(),
                    info.codec,
                );
                self.url = Some(url.clone());
                self.source = Some(source);
                self.state = SessionState::Open;
                Ok(())
            }
            Err(e) => {
                log::warn!("failed to open {url}: {e}");
                self.state = SessionState::Closed;
                Err(e)
            }
        }
    }

    fn ensure_unopened(&self) -> Result<()> {
        match self.state {
            SessionState::Unopened => Ok(()),
            SessionState::Open => Err(Error::AlreadyOpen),
            SessionState::Closed => Err(Error::Closed),
        }
    }

    /**
        Decode the next frame and keep it as the latest.

        Once a read has failed the session stops reading: later calls
        return [`Error::Eof`] again after an end of stream, or
        [`Error::Terminated`] after any other failure.
    */
    pub fn read_frame(&mut self) -> Result<()> {
        match self.state {
            SessionState::Unopened => return Err(Error::NotOpen),
            SessionState::Closed => return Err(Error::Closed),
            SessionState::Open => {}
        }

        if let Some(failure) = self.failure {
            return Err(failure.to_error());
        }

        let Some(source) = self.source.as_mut() else {
            return Err(Error::NotOpen);
        };

        match source.next_frame() {
            Ok(frame) => {
                self.latest = Some(frame);
                self.frames_read += 1;
                Ok(())
            }
            Err(e) => {
                let failure = if e.is_eof() {
                    log::info!("end of stream after {} frames", self.frames_read);
                    ReadFailure::EndOfStream
                } else {
                    log::warn!("read failed after {} frames: {e}", self.frames_read);
                    ReadFailure::Fault
                };
                self.failure = Some(failure);
                Err(e)
            }
        }
    }

    /**
        The most recently decoded frame.

        Returns a new reference to the same buffer on every call until the
        next successful read. None before the first read and whenever the
        session is not open.
    */
    pub fn latest_frame(&self) -> Option<VideoFrame> {
        match self.state {
            SessionState::Open => self.latest.clone(),
            _ => None,
        }
    }

    /**
        Release the source and the latest frame.

        Closing a closed session does nothing.
    */
    pub fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }

        self.latest = None;
        if let Some(source) = self.source.take() {
            drop(source);
            log::info!("stream closed after {} frames", self.frames_read);
        }
        self.state = SessionState::Closed;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn url(&self) -> Option<&StreamUrl> {
        self.url.as_ref()
    }

    /**
        Metadata of the open stream, None unless the session is open.
    */
    pub fn stream_info(&self) -> Option<&VideoStreamInfo> {
        self.source.as_ref().map(FrameSource::stream_info)
    }

    /**
        Number of successful reads so far.
    */
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }
}

impl<O: SourceOpener> Drop for StreamSession<O> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<O: SourceOpener> std::fmt::Debug for StreamSession<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamSession")
            .field("state", &self.state)
            .field("url", &self.url)
            .field("frames_read", &self.frames_read)
            .field("failure", &self.failure)
            .finish()
    }
}
