/*!
    Stream timestamps.
*/

use std::time::Duration;

use crate::Rational;

/**
    Presentation timestamp, in ticks of the stream's time base.

    Live HLS streams rarely start at zero, so compare timestamps against the
    first frame seen rather than reading them as absolute positions.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pts(pub i64);

impl Pts {
    /**
        Position as wall time. Negative timestamps map to zero.
    */
    #[inline]
    pub fn to_duration(self, time_base: Rational) -> Duration {
        if self.0 <= 0 {
            return Duration::ZERO;
        }
        // Saturates on timestamps beyond what Duration holds
        Duration::try_from_secs_f64(self.0 as f64 * time_base.to_f64()).unwrap_or(Duration::MAX)
    }

    /**
        Media time from `earlier` to this timestamp, zero if `earlier` is later.
    */
    pub fn since(self, earlier: Pts, time_base: Rational) -> Duration {
        Pts(self.0.saturating_sub(earlier.0)).to_duration(time_base)
    }
}

/**
    A length of media time, in ticks of the stream's time base.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MediaDuration(pub i64);
