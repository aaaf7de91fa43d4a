/*!
    Video decoding for the ffmpeg crate ecosystem.

    This crate transforms encoded video packets into decoded frames. The
    codec work itself happens in FFmpeg, optionally on a hardware decoder.

    # Features

    - `videotoolbox`: Auto-detect VideoToolbox hardware acceleration (always on for macOS)
    - `vaapi`: Auto-detect VAAPI hardware acceleration (Linux)
    - `cuda`: Auto-detect CUDA/NVDEC hardware acceleration (NVIDIA)

    # Example

    ```ignore
    use ffmpeg_source::open;
    use ffmpeg_decode::{VideoDecoder, VideoDecoderConfig};

    let mut source = open(&url)?;

    let codec_config = source.take_codec_config().unwrap();
    let mut decoder = VideoDecoder::new(
        codec_config,
        source.time_base(),
        VideoDecoderConfig::with_hw_accel(),
    )?;

    loop {
        match source.read_packet() {
            Ok(packet) => {
                for frame in decoder.decode(&packet)? {
                    // Process frame
                }
            }
            Err(e) if e.is_eof() => break,
            Err(e) => return Err(e),
        }
    }

    // Flush remaining frames
    let remaining = decoder.flush()?;
    ```

    # Hardware Acceleration

    Hardware acceleration is opt-in and falls back to software decoding
    if hardware is unavailable. Hardware surfaces are copied back to
    system memory, so decoded frames are always plain pixel buffers.

    ```ignore
    // Prefer hardware, auto-detect device
    let config = VideoDecoderConfig::with_hw_accel();

    // Specific hardware device
    let config = VideoDecoderConfig::with_hw_device(HwDevice::Vaapi);

    // Software only
    let config = VideoDecoderConfig::new();
    ```
*/

pub use ffmpeg_source::CodecConfig;
pub use ffmpeg_types::{Error, Packet, Result, VideoFrame};

mod config;
mod hw;
mod video;

pub use config::{HwDevice, VideoDecoderConfig};
pub use video::VideoDecoder;
