/*!
    Media input and demuxing for the ffmpeg crate ecosystem.

    This crate opens a media location (an HLS playlist, an RTSP camera, a
    local file), selects its video stream and hands out encoded packets.
    Protocol handling, manifest parsing and container parsing all happen
    inside FFmpeg; this crate only drives it.

    # Example

    ```ignore
    use ffmpeg_source::open;
    use ffmpeg_types::StreamUrl;

    let url = StreamUrl::parse("https://example.com/live/playlist.m3u8")?;
    let mut source = open(&url)?;

    let codec_config = source.take_codec_config().unwrap();
    let time_base = source.time_base();

    loop {
        match source.read_packet() {
            Ok(packet) => { /* decode */ }
            Err(e) if e.is_eof() => break,
            Err(e) => return Err(e),
        }
    }
    ```

    # Resources

    Everything FFmpeg allocates for a source (format context, network
    layer) is released when the [`Source`] is dropped, on every path,
    including when [`open`] fails halfway.
*/

pub use ffmpeg_types::{CodecId, Error, Packet, PixelFormat, Rational, Result, StreamUrl};

mod codec_config;
mod convert;
mod network;
mod source;

pub use codec_config::CodecConfig;
pub use convert::{codec_id_from_ffmpeg, pixel_format_from_ffmpeg, rational_from_ffmpeg};
pub use source::{Source, open, version};
