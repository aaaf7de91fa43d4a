/*!
    Conversions from FFmpeg's vocabulary to ours.
*/

use ffmpeg_next::{codec::Id, format::Pixel};

use ffmpeg_types::{CodecId, PixelFormat, Rational};

/**
    Convert an FFmpeg pixel format to our PixelFormat.

    Hardware surface formats and anything else we have no name for yield None.
*/
pub fn pixel_format_from_ffmpeg(format: Pixel) -> Option<PixelFormat> {
    match format {
        Pixel::YUV420P | Pixel::YUVJ420P => Some(PixelFormat::Yuv420p),
        Pixel::NV12 => Some(PixelFormat::Nv12),
        Pixel::BGRA => Some(PixelFormat::Bgra),
        Pixel::RGBA => Some(PixelFormat::Rgba),
        Pixel::RGB24 => Some(PixelFormat::Rgb24),
        Pixel::BGR24 => Some(PixelFormat::Bgr24),
        Pixel::YUV422P | Pixel::YUVJ422P => Some(PixelFormat::Yuv422p),
        Pixel::YUV444P | Pixel::YUVJ444P => Some(PixelFormat::Yuv444p),
        Pixel::YUV420P10LE => Some(PixelFormat::Yuv420p10),
        _ => None,
    }
}

/**
    Convert an FFmpeg codec id to our CodecId.
*/
pub fn codec_id_from_ffmpeg(id: Id) -> CodecId {
    match id {
        Id::H264 => CodecId::H264,
        Id::HEVC => CodecId::H265,
        Id::VP8 => CodecId::Vp8,
        Id::VP9 => CodecId::Vp9,
        Id::AV1 => CodecId::Av1,
        Id::MPEG4 => CodecId::Mpeg4,
        Id::MPEG2VIDEO => CodecId::Mpeg2Video,
        _ => CodecId::Other,
    }
}

/**
    Convert an FFmpeg rational, None if it is unset (zero or negative).
*/
pub fn rational_from_ffmpeg(value: ffmpeg_next::Rational) -> Option<Rational> {
    Rational::try_new(value.numerator(), value.denominator())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_pixel_formats() {
        assert_eq!(
            pixel_format_from_ffmpeg(Pixel::YUV420P),
            Some(PixelFormat::Yuv420p)
        );
        assert_eq!(
            pixel_format_from_ffmpeg(Pixel::YUVJ420P),
            Some(PixelFormat::Yuv420p)
        );
        assert_eq!(pixel_format_from_ffmpeg(Pixel::NV12), Some(PixelFormat::Nv12));
        assert_eq!(pixel_format_from_ffmpeg(Pixel::BGRA), Some(PixelFormat::Bgra));
    }

    #[test]
    fn unknown_formats_are_unnamed() {
        assert_eq!(pixel_format_from_ffmpeg(Pixel::None), None);
        assert_eq!(pixel_format_from_ffmpeg(Pixel::PAL8), None);
    }

    #[test]
    fn codec_ids() {
        assert_eq!(codec_id_from_ffmpeg(Id::H264), CodecId::H264);
        assert_eq!(codec_id_from_ffmpeg(Id::HEVC), CodecId::H265);
        assert_eq!(codec_id_from_ffmpeg(Id::AAC), CodecId::Other);
    }

    #[test]
    fn unset_rationals() {
        assert_eq!(rational_from_ffmpeg(ffmpeg_next::Rational::new(0, 0)), None);
        assert_eq!(
            rational_from_ffmpeg(ffmpeg_next::Rational::new(1, 90000)),
            Some(Rational::new(1, 90000))
        );
    }
}
