/*!
    Compressed video packets.
*/

use crate::{MediaDuration, Pts, Rational};

/**
    One compressed access unit of the selected video stream, as read by the
    source and fed to the decoder.

    Timestamps are in `time_base` units. Live HLS inputs frequently leave
    them unset.
*/
#[derive(Clone, Debug)]
pub struct Packet {
    pub data: Vec<u8>,
    pub pts: Option<Pts>,
    /// Differs from `pts` when the codec reorders frames.
    pub dts: Option<Pts>,
    pub duration: MediaDuration,
    pub time_base: Rational,
    pub is_keyframe: bool,
}

impl Packet {
    pub fn new(
        data: Vec<u8>,
        pts: Option<Pts>,
        dts: Option<Pts>,
        duration: MediaDuration,
        time_base: Rational,
        is_keyframe: bool,
    ) -> Self {
        Self {
            data,
            pts,
            dts,
            duration,
            time_base,
            is_keyframe,
        }
    }

    /**
        True for packets without payload. Decoders have nothing to do for them.
    */
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

static_assertions::assert_impl_all!(Packet: Send, Sync);
