/*!
    Moving pixel data between FFmpeg frames and packed buffers.

    FFmpeg frames pad every row to an aligned stride; our frames store rows
    back to back. These helpers copy between the two layouts plane by plane.
*/

use ffmpeg_next::{format::Pixel, util::frame::video::Video as VideoFrameFFmpeg};

use ffmpeg_types::{Error, PixelFormat, Result, VideoFrame};

/**
    Convert our PixelFormat to the FFmpeg pixel format.
*/
pub fn pixel_format_to_ffmpeg(format: PixelFormat) -> Option<Pixel> {
    match format {
        PixelFormat::Yuv420p => Some(Pixel::YUV420P),
        PixelFormat::Nv12 => Some(Pixel::NV12),
        PixelFormat::Bgra => Some(Pixel::BGRA),
        PixelFormat::Rgba => Some(Pixel::RGBA),
        PixelFormat::Rgb24 => Some(Pixel::RGB24),
        PixelFormat::Bgr24 => Some(Pixel::BGR24),
        PixelFormat::Yuv422p => Some(Pixel::YUV422P),
        PixelFormat::Yuv444p => Some(Pixel::YUV444P),
        PixelFormat::Yuv420p10 => Some(Pixel::YUV420P10LE),
        _ => None,
    }
}

/**
    Copy the planes of an FFmpeg frame into a tightly packed buffer.

    `format` must describe the frame's actual pixel layout.
*/
pub fn pack_frame(frame: &VideoFrameFFmpeg, format: PixelFormat) -> Result<Vec<u8>> {
    let planes = format.plane_sizes(frame.width(), frame.height());
    if frame.planes() < planes.len() {
        return Err(Error::invalid_data(format!(
            "{format:?} frame has {} planes, expected {}",
            frame.planes(),
            planes.len()
        )));
    }

    let mut packed = vec![0u8; format.buffer_size(frame.width(), frame.height())];
    let mut offset = 0;

    for (index, &(row_bytes, rows)) in planes.iter().enumerate() {
        let size = row_bytes * rows;
        copy_rows(
            frame.data(index),
            frame.stride(index),
            &mut packed[offset..offset + size],
            row_bytes,
            row_bytes,
            rows,
        )?;
        offset += size;
    }

    Ok(packed)
}

/**
    Copy a packed frame into a freshly allocated FFmpeg frame.
*/
pub fn unpack_frame(frame: &VideoFrame) -> Result<VideoFrameFFmpeg> {
    let pixel = pixel_format_to_ffmpeg(frame.format).ok_or_else(|| {
        Error::unsupported_format(format!("no ffmpeg pixel format for {:?}", frame.format))
    })?;

    let expected = frame.format.buffer_size(frame.width, frame.height);
    if frame.data.len() < expected {
        return Err(Error::invalid_data(format!(
            "frame buffer holds {} bytes, {:?} {}x{} needs {expected}",
            frame.data.len(),
            frame.format,
            frame.width,
            frame.height
        )));
    }

    let mut output = VideoFrameFFmpeg::new(pixel, frame.width, frame.height);

    for (index, (row_bytes, rows)) in frame
        .format
        .plane_sizes(frame.width, frame.height)
        .into_iter()
        .enumerate()
    {
        let plane = frame
            .plane(index)
            .ok_or_else(|| Error::invalid_data(format!("frame has no plane {index}")))?;
        let stride = output.stride(index);
        copy_rows(plane, row_bytes, output.data_mut(index), stride, row_bytes, rows)?;
    }

    output.set_pts(frame.pts.map(|pts| pts.0));
    Ok(output)
}

/**
    Copy `rows` rows of `row_bytes` bytes between buffers with different strides.
*/
pub(crate) fn copy_rows(
    src: &[u8],
    src_stride: usize,
    dst: &mut [u8],
    dst_stride: usize,
    row_bytes: usize,
    rows: usize,
) -> Result<()> {
    for row in 0..rows {
        let src_start = row * src_stride;
        let dst_start = row * dst_stride;
        let src_row = src
            .get(src_start..src_start + row_bytes)
            .ok_or_else(|| Error::invalid_data("source plane row is out of bounds"))?;
        let dst_row = dst
            .get_mut(dst_start..dst_start + row_bytes)
            .ok_or_else(|| Error::invalid_data("destination plane row is out of bounds"))?;
        dst_row.copy_from_slice(src_row);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ffmpeg_types::{Pts, Rational};

    #[test]
    fn copy_rows_strips_padding() {
        // 2 rows of 3 bytes, padded to a stride of 4
        let src = [1, 2, 3, 0, 4, 5, 6, 0];
        let mut dst = [0u8; 6];
        copy_rows(&src, 4, &mut dst, 3, 3, 2).unwrap();
        assert_eq!(dst, [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn copy_rows_adds_padding() {
        let src = [1, 2, 3, 4, 5, 6];
        let mut dst = [9u8; 8];
        copy_rows(&src, 3, &mut dst, 4, 3, 2).unwrap();
        assert_eq!(dst, [1, 2, 3, 9, 4, 5, 6, 9]);
    }

    #[test]
    fn copy_rows_rejects_short_source() {
        let src = [1, 2, 3, 0, 4];
        let mut dst = [0u8; 6];
        let err = copy_rows(&src, 4, &mut dst, 3, 3, 2).unwrap_err();
        assert!(matches!(err, Error::InvalidData { .. }));
    }

    #[test]
    fn every_named_format_maps_to_ffmpeg() {
        for format in [
            PixelFormat::Yuv420p,
            PixelFormat::Nv12,
            PixelFormat::Bgra,
            PixelFormat::Rgba,
            PixelFormat::Rgb24,
            PixelFormat::Bgr24,
            PixelFormat::Yuv422p,
            PixelFormat::Yuv444p,
            PixelFormat::Yuv420p10,
        ] {
            assert!(pixel_format_to_ffmpeg(format).is_some(), "{format:?}");
        }
    }

    #[test]
    fn unpack_then_pack_preserves_pixels() {
        let width = 6;
        let height = 4;
        let data: Vec<u8> = (0..PixelFormat::Yuv420p.buffer_size(width, height))
            .map(|i| i as u8)
            .collect();
        let frame = VideoFrame::new(
            data.clone(),
            width,
            height,
            PixelFormat::Yuv420p,
            Some(Pts(42)),
            Rational::new(1, 90000),
        );

        let ffmpeg_frame = unpack_frame(&frame).unwrap();
        assert_eq!(ffmpeg_frame.pts(), Some(42));

        let packed = pack_frame(&ffmpeg_frame, PixelFormat::Yuv420p).unwrap();
        assert_eq!(packed, data);
    }

    #[test]
    fn unpack_rejects_short_buffer() {
        let frame = VideoFrame::new(
            vec![0u8; 10],
            4,
            4,
            PixelFormat::Bgra,
            None,
            Rational::new(1, 1000),
        );
        let err = unpack_frame(&frame).unwrap_err();
        assert!(matches!(err, Error::InvalidData { .. }));
    }
}
