/*!
    Shared types for the ffmpeg crate ecosystem.

    This crate defines the vocabulary that crosses crate boundaries between
    the source, decoder, transform and session layers. It has no dependency
    on FFmpeg, so consumers of decoded frames can depend on it without
    pulling in FFmpeg bindings.

    # Core Types

    - [`Rational`] - Rational numbers for time bases and frame rates
    - [`Pts`] and [`MediaDuration`] - Timestamps in time_base units
    - [`VideoFrame`] and [`FrameBuffer`] - Decoded frames and their shared pixel storage
    - [`Packet`] - Encoded video packet data

    # Format Types

    - [`PixelFormat`] - Video pixel formats
    - [`CodecId`] - Video codec identifiers

    # Stream Information

    - [`StreamUrl`] - A validated media source location
    - [`VideoStreamInfo`] - Metadata of the selected video stream

    # Timing

    - [`Clock`] - Trait for monotonic position sources
    - [`WallClock`] - Wall-time clock, used for paced polling

    # Error Handling

    - [`Error`] and [`Result`] - Common error types
*/

mod clock;
mod codec;
mod error;
mod format;
mod frame;
mod packet;
mod rational;
mod stream;
mod timestamp;
mod url;

pub use clock::{Clock, WallClock};
pub use codec::CodecId;
pub use error::{Error, Result};
pub use format::PixelFormat;
pub use frame::{FrameBuffer, VideoFrame};
pub use packet::Packet;
pub use rational::Rational;
pub use stream::VideoStreamInfo;
pub use timestamp::{MediaDuration, Pts};
pub use url::StreamUrl;
