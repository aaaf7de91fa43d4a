use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use ffmpeg_session::{
    Error, FramePoller, FrameSource, Pacing, PollConfig, SessionState, SourceOpener, StopReason,
    StreamSession, StreamUrl, SyntheticOpener, SyntheticSource, VideoFrame, VideoStreamInfo,
};

/// Synthetic opener that counts sources still alive.
#[derive(Clone, Default)]
struct CountingOpener {
    live: Arc<AtomicUsize>,
}

impl CountingOpener {
    fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

struct CountedSource {
    inner: SyntheticSource,
    live: Arc<AtomicUsize>,
}

impl Drop for CountedSource {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

impl FrameSource for CountedSource {
    fn stream_info(&self) -> &VideoStreamInfo {
        self.inner.stream_info()
    }

    fn next_frame(&mut self) -> ffmpeg_session::Result<VideoFrame> {
        self.inner.next_frame()
    }
}

impl SourceOpener for CountingOpener {
    type Source = CountedSource;

    fn open(&self, url: &StreamUrl) -> ffmpeg_session::Result<CountedSource> {
        let inner = SyntheticOpener.open(url)?;
        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(CountedSource {
            inner,
            live: Arc::clone(&self.live),
        })
    }
}

fn no_pacing(iterations: u64) -> FramePoller {
    FramePoller::new(PollConfig::new(Some(iterations), Pacing::None))
}

#[test]
fn reads_after_close_fail() {
    let opener = CountingOpener::default();
    let mut session = StreamSession::new(opener.clone());
    session.open("synthetic://?frames=5&width=8&height=8").unwrap();
    session.read_frame().unwrap();
    assert_eq!(opener.live(), 1);

    session.close();

    assert_eq!(opener.live(), 0);
    assert!(matches!(session.read_frame(), Err(Error::Closed)));
    assert!(session.latest_frame().is_none());
}

#[test]
fn failed_open_leaves_nothing_behind() {
    let opener = CountingOpener::default();
    let mut session = StreamSession::new(opener.clone());

    let err = session.open("synthetic://?width=-4").unwrap_err();

    assert!(err.is_open_failure());
    assert_eq!(session.state(), SessionState::Closed);
    assert_eq!(opener.live(), 0);
}

#[cfg(unix)]
#[test]
fn unreachable_ffmpeg_input_fails_to_open() {
    let mut session = StreamSession::new(ffmpeg_session::AutoOpener::default());
    let err = session.open("/nonexistent/iptv/stream.ts").unwrap_err();
    assert!(err.is_open_failure(), "{err:?}");
    assert_eq!(session.state(), SessionState::Closed);
}

#[test]
fn ten_frames_polled_fifteen_times() {
    let opener = CountingOpener::default();
    let mut session = StreamSession::new(opener.clone());
    session.open("synthetic://?frames=10&width=8&height=8").unwrap();

    let mut seen = Vec::new();
    let report = no_pacing(15).run(&mut session, |frame| seen.push(frame.clone()));

    assert_eq!(report.frames_read, 10);
    assert_eq!(report.iterations, 11);
    assert!(matches!(report.stop, StopReason::EndOfStream));
    assert_eq!(seen.len(), 10);
    for (index, frame) in seen.iter().enumerate() {
        assert_eq!(frame.pts.map(|pts| pts.0), Some(index as i64));
    }

    session.close();
    assert_eq!(opener.live(), 0);
    // Frames outlive the session that produced them.
    assert_eq!(seen[9].data.len(), 8 * 8 * 4);
}

#[test]
fn empty_source_reads_nothing() {
    let mut session = StreamSession::new(SyntheticOpener);
    session.open("synthetic://?frames=0").unwrap();

    let mut calls = 0;
    let report = no_pacing(5).run(&mut session, |_| calls += 1);

    assert_eq!(calls, 0);
    assert_eq!(report.frames_read, 0);
    assert!(matches!(report.stop, StopReason::EndOfStream));
}

#[test]
fn short_source_ends_on_eof() {
    let mut session = StreamSession::new(SyntheticOpener);
    session.open("synthetic://?frames=3&width=4&height=4").unwrap();

    let mut successes = 0;
    for _ in 0..8 {
        match session.read_frame() {
            Ok(()) => {
                successes += 1;
                assert!(session.latest_frame().is_some());
            }
            Err(e) => assert!(e.is_eof(), "{e:?}"),
        }
    }

    assert_eq!(successes, 3);
    assert_eq!(session.frames_read(), 3);
}

#[test]
fn latest_frame_twice_shares_buffer() {
    let mut session = StreamSession::new(SyntheticOpener);
    session.open("synthetic://?frames=2&width=4&height=4").unwrap();
    session.read_frame().unwrap();

    let first = session.latest_frame().unwrap();
    let second = session.latest_frame().unwrap();

    assert!(first.shares_buffer_with(&second));
    assert!(first.data.ref_count() >= 3);
}

#[test]
fn dropping_open_session_releases_source() {
    let opener = CountingOpener::default();
    {
        let mut session = StreamSession::new(opener.clone());
        session.open("synthetic://?frames=1").unwrap();
        assert_eq!(opener.live(), 1);
    }
    assert_eq!(opener.live(), 0);
}
