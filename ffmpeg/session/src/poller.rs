/*!
    Fixed-cadence frame polling.
*/

use std::sync::Arc;
use std::time::Duration;

use ffmpeg_types::{Clock, Error, VideoFrame, WallClock};

use crate::session::StreamSession;
use crate::source::SourceOpener;

/// Iterations polled when no limit is configured explicitly.
pub const DEFAULT_ITERATIONS: u64 = 100;

/// One frame at 60 Hz.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

/**
    How the poller waits between iterations.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pacing {
    /// Poll back to back.
    None,
    /// Sleep a fixed time after each iteration, regardless of how long
    /// decoding took. Drifts when decoding is slow.
    FixedDelay(Duration),
    /// Wait for deadlines spaced `interval` apart on the poller's clock.
    Clock { interval: Duration },
}

impl Default for Pacing {
    fn default() -> Self {
        Self::FixedDelay(DEFAULT_FRAME_INTERVAL)
    }
}

/**
    Poller configuration.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollConfig {
    /// None polls until the session stops producing frames.
    pub max_iterations: Option<u64>,
    pub pacing: Pacing,
}

impl PollConfig {
    pub fn new(max_iterations: Option<u64>, pacing: Pacing) -> Self {
        Self {
            max_iterations,
            pacing,
        }
    }

    /**
        Poll until the end of the stream.
    */
    pub fn unbounded(pacing: Pacing) -> Self {
        Self::new(None, pacing)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::new(Some(DEFAULT_ITERATIONS), Pacing::default())
    }
}

/**
    Why a poll run ended.
*/
#[derive(Debug)]
pub enum StopReason {
    /// All configured iterations ran.
    IterationLimit,
    /// The stream ended.
    EndOfStream,
    /// A read failed for any other reason.
    Failed(Error),
}

/**
    Outcome of [`FramePoller::run`].
*/
#[derive(Debug)]
pub struct PollReport {
    /// Iterations started, including the one that stopped the run.
    pub iterations: u64,
    /// Frames read and handed to the callback.
    pub frames_read: u64,
    pub stop: StopReason,
}

impl PollReport {
    /**
        True unless the run stopped on a failure other than end of stream.
    */
    pub fn is_success(&self) -> bool {
        !matches!(self.stop, StopReason::Failed(_))
    }
}

/**
    Deadline schedule for clock-driven pacing.

    Deadlines are `anchor + n * interval`. Falling behind by more than one
    interval moves the anchor to now instead of firing a burst of late
    iterations.
*/
#[derive(Clone, Copy, Debug)]
struct Schedule {
    interval: Duration,
    anchor: Duration,
    ticks: u32,
}

impl Schedule {
    fn new(interval: Duration, now: Duration) -> Self {
        Self {
            interval,
            anchor: now,
            ticks: 0,
        }
    }

    /**
        Advance to the next deadline and return how long to wait for it.
    */
    fn next_wait(&mut self, now: Duration) -> Duration {
        self.ticks = self.ticks.saturating_add(1);
        let deadline = self.anchor + self.interval * self.ticks;

        if now > deadline + self.interval {
            log::debug!(
                "poller behind by {:?}, re-anchoring",
                now.saturating_sub(deadline)
            );
            self.anchor = now;
            self.ticks = 0;
            return Duration::ZERO;
        }

        deadline.saturating_sub(now)
    }
}

/**
    Drives a [`StreamSession`] at a configured cadence.

    Single threaded and blocking: `run` returns once the iteration limit is
    reached or a read fails.
*/
pub struct FramePoller {
    config: PollConfig,
    clock: Arc<dyn Clock>,
}

impl FramePoller {
    /**
        Create a poller timed by the wall clock.
    */
    pub fn new(config: PollConfig) -> Self {
        Self::with_clock(config, Arc::new(WallClock::new()))
    }

    /**
        Create a poller timed by `clock`. Only [`Pacing::Clock`] consults it.
    */
    pub fn with_clock(config: PollConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    /**
        Poll `session`, handing every frame read to `on_frame`.

        The session is left open; closing it is up to the caller.
    */
    pub fn run<O, F>(&self, session: &mut StreamSession<O>, mut on_frame: F) -> PollReport
    where
        O: SourceOpener,
        F: FnMut(&VideoFrame),
    {
        let mut schedule = match self.config.pacing {
            Pacing::Clock { interval } => Some(Schedule::new(interval, self.clock.position())),
            _ => None,
        };

        let mut iterations = 0;
        let mut frames_read = 0;

        let stop = loop {
            if self
                .config
                .max_iterations
                .is_some_and(|limit| iterations >= limit)
            {
                break StopReason::IterationLimit;
            }

            if iterations > 0 {
                self.wait(schedule.as_mut());
            }
            iterations += 1;

            match session.read_frame() {
                Ok(()) => {
                    if let Some(frame) = session.latest_frame() {
                        frames_read += 1;
                        on_frame(&frame);
                    }
                }
                Err(Error::Eof) => break StopReason::EndOfStream,
                Err(e) => break StopReason::Failed(e),
            }
        };

        log::info!("polling stopped after {iterations} iterations, {frames_read} frames: {stop:?}");

        PollReport {
            iterations,
            frames_read,
            stop,
        }
    }

    fn wait(&self, schedule: Option<&mut Schedule>) {
        let delay = match (self.config.pacing, schedule) {
            (Pacing::FixedDelay(delay), _) => delay,
            (Pacing::Clock { .. }, Some(schedule)) => schedule.next_wait(self.clock.position()),
            _ => Duration::ZERO,
        };

        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

impl std::fmt::Debug for FramePoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FramePoller")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
