/*!
    Clock types.
*/

use std::time::{Duration, Instant};

/**
    Trait for monotonic position sources.

    A clock provides the current position since it was started. Frame
    pacing queries the clock to decide how long to wait before the next
    frame is due.
*/
pub trait Clock: Send + Sync {
    /// Get the current position.
    fn position(&self) -> Duration;
}

/**
    Wall-time clock.

    Position advances with real time from the moment of creation.
*/
#[derive(Clone, Copy, Debug)]
pub struct WallClock {
    start: Instant,
}

impl WallClock {
    /**
        Create a new wall clock starting at position zero.
    */
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for WallClock {
    fn position(&self) -> Duration {
        self.start.elapsed()
    }
}

static_assertions::assert_impl_all!(WallClock: Send, Sync, Clock);
