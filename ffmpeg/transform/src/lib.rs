/*!
    Video frame transformation for the ffmpeg crate ecosystem.

    This crate converts decoded frames between pixel formats and sizes
    (YUV → BGRA for display, downscaling, …). The conversion itself is
    FFmpeg's software scaler; this crate only manages its lifetime and
    moves pixel data in and out of FFmpeg frames.

    # Video Transformation

    ```ignore
    use ffmpeg_transform::{VideoTransform, VideoTransformConfig};

    // Convert any video frame to 1280x720 BGRA for display
    let config = VideoTransformConfig::to_bgra(1280, 720);
    let mut transform = VideoTransform::new(config);

    // Transform frames (scaler lazily initialized on first call)
    for frame in decoded_frames {
        let bgra_frame = transform.transform(&frame)?;
        // Display bgra_frame
    }
    ```

    # Lazy Initialization

    The scaler is created on first use, so a transform can be built before
    the input format is known. If the input format or size changes
    mid-stream (common when an HLS stream switches variants), the scaler
    is rebuilt automatically.

    Frames that already have the target format and size are passed through
    without copying; the output shares the input's pixel buffer.
*/

pub use ffmpeg_types::{Error, PixelFormat, Result, VideoFrame};

mod packing;
mod video;

pub use packing::{pack_frame, pixel_format_to_ffmpeg, unpack_frame};
pub use video::{ScalingAlgorithm, VideoTransform, VideoTransformConfig};
