/*!
    Rational number type for time bases and frame rates.
*/

use std::fmt;
use std::time::Duration;

/**
    A rational number represented as a numerator and denominator.

    Used for time bases (e.g., 1/90000 for MPEG-TS segments in HLS) and
    frame rates (e.g., 30000/1001 for 29.97 fps broadcast streams).
*/
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    pub num: i32,
    pub den: i32,
}

impl Rational {
    /**
        Create a new rational number.

        # Panics

        Panics if `den` is zero.
    */
    #[inline]
    pub const fn new(num: i32, den: i32) -> Self {
        assert!(den != 0, "denominator cannot be zero");
        Self { num, den }
    }

    /**
        Create a rational number from values reported by a demuxer.

        FFmpeg reports unknown rates as `0/0` or `0/1`; those yield None.
    */
    #[inline]
    pub const fn try_new(num: i32, den: i32) -> Option<Self> {
        if num <= 0 || den <= 0 {
            None
        } else {
            Some(Self { num, den })
        }
    }

    /**
        Convert to f64.
    */
    #[inline]
    pub fn to_f64(self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /**
        Interpret this rational as a frame rate and return the time between
        two frames, or None for a non-positive rate.
    */
    pub fn frame_interval(self) -> Option<Duration> {
        if self.num <= 0 || self.den <= 0 {
            return None;
        }
        Some(Duration::from_secs_f64(self.den as f64 / self.num as f64))
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "denominator cannot be zero")]
    fn zero_denominator_panics() {
        Rational::new(1, 0);
    }

    #[test]
    fn demuxer_unknowns_are_none() {
        assert_eq!(Rational::try_new(0, 0), None);
        assert_eq!(Rational::try_new(0, 1), None);
        assert_eq!(Rational::try_new(25, 0), None);
        assert_eq!(Rational::try_new(-1, 25), None);
        assert_eq!(
            Rational::try_new(30000, 1001),
            Some(Rational::new(30000, 1001))
        );
    }

    #[test]
    fn ntsc_rate_as_float() {
        assert!((Rational::new(30000, 1001).to_f64() - 29.97).abs() < 0.001);
    }

    #[test]
    fn frame_interval_of_common_rates() {
        assert_eq!(
            Rational::new(25, 1).frame_interval(),
            Some(Duration::from_millis(40))
        );
        let ntsc = Rational::new(30000, 1001).frame_interval().unwrap();
        assert_eq!(ntsc.as_micros(), 33_366);
        assert_eq!(Rational::new(0, 1).frame_interval(), None);
    }

    #[test]
    fn formats_as_fraction() {
        let tb = Rational::new(1, 90000);
        assert_eq!(tb.to_string(), "1/90000");
        assert_eq!(format!("{tb:?}"), "1/90000");
    }
}
