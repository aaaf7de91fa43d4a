/*!
    Pixel format types.
*/

/**
    Video pixel formats.

    The formats decoders commonly produce for network streams, plus the
    packed RGB layouts used for display. Frames in anything else are
    converted to [`PixelFormat::Yuv420p`] by the decoder.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PixelFormat {
    /// 8-bit 4:2:0, three planes. What H.264 broadcast streams decode to.
    Yuv420p,
    /// 8-bit 4:2:0 with interleaved chroma. Typical hardware decoder output.
    Nv12,
    /// 8-bit packed, blue first
    Bgra,
    /// 8-bit packed, red first
    Rgba,
    /// Packed RGB, 24bpp
    Rgb24,
    /// Packed BGR, 24bpp
    Bgr24,
    /// 8-bit 4:2:2, three planes
    Yuv422p,
    /// 8-bit 4:4:4, three planes
    Yuv444p,
    /// Planar YUV 4:2:0, 10-bit little-endian in 16-bit words (HDR content)
    Yuv420p10,
}

impl PixelFormat {
    /**
        Returns the `(row_bytes, rows)` of every plane of a tightly packed
        image with the given dimensions, in FFmpeg plane order.

        Chroma dimensions of subsampled formats round up, matching FFmpeg.
    */
    pub fn plane_sizes(self, width: u32, height: u32) -> Vec<(usize, usize)> {
        let w = width as usize;
        let h = height as usize;
        let cw = w.div_ceil(2);
        let ch = h.div_ceil(2);

        match self {
            Self::Yuv420p => vec![(w, h), (cw, ch), (cw, ch)],
            Self::Yuv420p10 => vec![(w * 2, h), (cw * 2, ch), (cw * 2, ch)],
            Self::Nv12 => vec![(w, h), (cw * 2, ch)],
            Self::Yuv422p => vec![(w, h), (cw, h), (cw, h)],
            Self::Yuv444p => vec![(w, h), (w, h), (w, h)],
            Self::Bgra | Self::Rgba => vec![(w * 4, h)],
            Self::Rgb24 | Self::Bgr24 => vec![(w * 3, h)],
        }
    }

    /**
        Returns the number of bytes a tightly packed image of this format occupies.
    */
    pub fn buffer_size(self, width: u32, height: u32) -> usize {
        self.plane_sizes(width, height)
            .iter()
            .map(|(row_bytes, rows)| row_bytes * rows)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yuv420p_planes_round_up_odd_dimensions() {
        let planes = PixelFormat::Yuv420p.plane_sizes(5, 3);
        assert_eq!(planes, vec![(5, 3), (3, 2), (3, 2)]);
        assert_eq!(PixelFormat::Yuv420p.buffer_size(5, 3), 15 + 6 + 6);
    }

    #[test]
    fn nv12_has_interleaved_chroma_plane() {
        let planes = PixelFormat::Nv12.plane_sizes(1920, 1080);
        assert_eq!(planes, vec![(1920, 1080), (1920, 540)]);
    }

    #[test]
    fn packed_formats_have_one_plane() {
        assert_eq!(PixelFormat::Bgra.plane_sizes(100, 50), vec![(400, 50)]);
        assert_eq!(PixelFormat::Rgb24.buffer_size(100, 50), 300 * 50);
    }

    #[test]
    fn buffer_sizes_of_a_720p_frame() {
        let cases = [
            (PixelFormat::Yuv420p, 1280 * 720 * 3 / 2),
            (PixelFormat::Nv12, 1280 * 720 * 3 / 2),
            (PixelFormat::Yuv422p, 1280 * 720 * 2),
            (PixelFormat::Yuv444p, 1280 * 720 * 3),
            (PixelFormat::Yuv420p10, 1280 * 720 * 3),
            (PixelFormat::Bgra, 1280 * 720 * 4),
            (PixelFormat::Bgr24, 1280 * 720 * 3),
        ];
        for (format, expected) in cases {
            assert_eq!(format.buffer_size(1280, 720), expected, "{format:?}");
        }
    }
}
