/*!
    Decoded frame types.
*/

use std::ops::Deref;
use std::sync::Arc;

use crate::{PixelFormat, Pts, Rational};

/**
    Shared-ownership pixel storage for a decoded frame.

    The bytes are a copy taken out of the decoder, owned by Rust rather than
    by FFmpeg. Cloning retains another reference to the same bytes and
    dropping the last reference frees them, so a frame stays valid after the
    session that produced it has been closed.
*/
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer(Arc<[u8]>);

impl FrameBuffer {
    /**
        Returns true if both buffers reference the same allocation.
    */
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /**
        Number of live references to this allocation.
    */
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

impl Deref for FrameBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for FrameBuffer {
    fn from(data: Vec<u8>) -> Self {
        Self(data.into())
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("len", &self.0.len())
            .field("refs", &self.ref_count())
            .finish()
    }
}

/**
    A decoded video frame.

    Contains tightly packed pixel data in the format specified by `format`.
    Packed formats have all data in a single row-major buffer, planar formats
    store their planes back to back as described by
    [`PixelFormat::plane_sizes`].

    Cloning a frame is cheap: the clone shares the pixel buffer.
*/
#[derive(Clone, Debug)]
pub struct VideoFrame {
    /// Pixel data.
    pub data: FrameBuffer,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    /// None when the decoder reported no timestamp.
    pub pts: Option<Pts>,
    pub time_base: Rational,
}

impl VideoFrame {
    /**
        Wrap pixel data laid out as described on [`VideoFrame`].
    */
    pub fn new(
        data: impl Into<FrameBuffer>,
        width: u32,
        height: u32,
        format: PixelFormat,
        pts: Option<Pts>,
        time_base: Rational,
    ) -> Self {
        Self {
            data: data.into(),
            width,
            height,
            format,
            pts,
            time_base,
        }
    }

    /**
        Returns true if this frame and `other` share the same pixel buffer.
    */
    pub fn shares_buffer_with(&self, other: &Self) -> bool {
        self.data.ptr_eq(&other.data)
    }

    /**
        Returns the bytes of plane `index`, or None if the format has fewer
        planes or the buffer is too short.
    */
    pub fn plane(&self, index: usize) -> Option<&[u8]> {
        let planes = self.format.plane_sizes(self.width, self.height);
        let start: usize = planes
            .iter()
            .take(index)
            .map(|(row_bytes, rows)| row_bytes * rows)
            .sum();
        let (row_bytes, rows) = planes.get(index)?;
        self.data.get(start..start + row_bytes * rows)
    }
}

// Frames are handed to consumers on other threads
static_assertions::assert_impl_all!(FrameBuffer: Send, Sync);
static_assertions::assert_impl_all!(VideoFrame: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const TB_1_1000: Rational = Rational { num: 1, den: 1000 };

    #[test]
    fn bgra_frame_timing() {
        let frame = VideoFrame::new(
            vec![0u8; 64 * 36 * 4],
            64,
            36,
            PixelFormat::Bgra,
            Some(Pts(1500)),
            TB_1_1000,
        );

        assert_eq!(frame.data.len(), PixelFormat::Bgra.buffer_size(64, 36));
        assert_eq!(frame.plane(0).map(<[u8]>::len), Some(64 * 36 * 4));
        let shown_at = frame.pts.map(|pts| pts.to_duration(frame.time_base));
        assert_eq!(shown_at, Some(Duration::from_millis(1500)));
    }

    #[test]
    fn clone_retains_the_same_buffer() {
        let frame = VideoFrame::new(vec![7u8; 16], 2, 2, PixelFormat::Rgba, None, TB_1_1000);
        assert_eq!(frame.data.ref_count(), 1);

        let retained = frame.clone();
        assert!(retained.shares_buffer_with(&frame));
        assert_eq!(frame.data.ref_count(), 2);

        drop(retained);
        assert_eq!(frame.data.ref_count(), 1);
    }

    #[test]
    fn equal_content_is_not_shared() {
        let a = VideoFrame::new(vec![1u8; 4], 1, 1, PixelFormat::Bgra, None, TB_1_1000);
        let b = VideoFrame::new(vec![1u8; 4], 1, 1, PixelFormat::Bgra, None, TB_1_1000);
        assert_eq!(a.data, b.data);
        assert!(!a.shares_buffer_with(&b));
    }

    #[test]
    fn planes_are_sliced_in_order() {
        // 2x2 yuv420p: 4 luma bytes, 1 byte each for U and V
        let frame = VideoFrame::new(
            vec![1, 1, 1, 1, 2, 3],
            2,
            2,
            PixelFormat::Yuv420p,
            None,
            TB_1_1000,
        );

        assert_eq!(frame.plane(0), Some(&[1u8, 1, 1, 1][..]));
        assert_eq!(frame.plane(1), Some(&[2u8][..]));
        assert_eq!(frame.plane(2), Some(&[3u8][..]));
        assert_eq!(frame.plane(3), None);
    }

    #[test]
    fn short_buffer_has_no_plane() {
        let frame = VideoFrame::new(vec![0u8; 3], 2, 2, PixelFormat::Bgra, None, TB_1_1000);
        assert_eq!(frame.plane(0), None);
    }
}
