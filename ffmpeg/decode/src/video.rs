/*!
    Video decoder implementation.
*/

use ffmpeg_next::{
    codec::{self, decoder::Video as VideoDecoderFFmpeg},
    ffi,
    packet::Mut as PacketMut,
    util::frame::video::Video as VideoFrameFFmpeg,
};

use ffmpeg_source::{CodecConfig, pixel_format_from_ffmpeg};
use ffmpeg_transform::{VideoTransform, VideoTransformConfig, pack_frame};
use ffmpeg_types::{Error, Packet, PixelFormat, Pts, Rational, Result, VideoFrame};

use crate::config::{HwDevice, VideoDecoderConfig};
use crate::hw::{HwDeviceRef, download_frame, is_hw_frame};

/**
    Video decoder.

    Decodes video packets into frames with tightly packed pixel data. Frames
    in a pixel format the ecosystem has no name for (10-bit big-endian,
    grayscale, palette, …) are converted to [`PixelFormat::Yuv420p`].
*/
pub struct VideoDecoder {
    decoder: VideoDecoderFFmpeg,
    time_base: Rational,
    hw_device: Option<HwDeviceRef>,
    fallback: Option<VideoTransform>,
    frames_decoded: u64,
}

impl VideoDecoder {
    /**
        Create a new video decoder from codec configuration.

        # Arguments

        * `codec_config` - Codec configuration from the source
        * `time_base` - Time base for the video stream
        * `config` - Decoder configuration (hardware acceleration)
    */
    pub fn new(
        codec_config: CodecConfig,
        time_base: Rational,
        config: VideoDecoderConfig,
    ) -> Result<Self> {
        ffmpeg_next::init().map_err(|e| Error::codec(e.to_string()))?;

        let codec_id = codec_config.codec_id();
        let parameters = codec_config.into_parameters();

        let mut decoder_ctx = codec::context::Context::from_parameters(parameters)
            .map_err(|e| Error::codec(e.to_string()))?;

        let hw_device = config
            .requested_device()
            .and_then(|device| attach_hw_device(&mut decoder_ctx, device));

        let decoder = decoder_ctx.decoder().video().map_err(|e| {
            Error::unsupported_format(format!("cannot open {codec_id} decoder: {e}"))
        })?;

        Ok(Self {
            decoder,
            time_base,
            hw_device,
            fallback: None,
            frames_decoded: 0,
        })
    }

    /**
        Coded width of the stream.
    */
    pub fn width(&self) -> u32 {
        self.decoder.width()
    }

    /**
        Coded height of the stream.
    */
    pub fn height(&self) -> u32 {
        self.decoder.height()
    }

    /**
        Native pixel format of the stream, if the ecosystem names it.
    */
    pub fn pixel_format(&self) -> Option<PixelFormat> {
        pixel_format_from_ffmpeg(self.decoder.format())
    }

    /**
        The hardware device in use, None when decoding in software.
    */
    pub fn hw_device(&self) -> Option<HwDevice> {
        self.hw_device.as_ref().map(HwDeviceRef::device)
    }

    /**
        Number of frames produced so far.
    */
    pub fn frames_decoded(&self) -> u64 {
        self.frames_decoded
    }

    /**
        Decode a packet, returning decoded frames.

        May return zero, one, or multiple frames depending on codec. A packet
        without data carries nothing to decode and yields no frames; draining
        the decoder is left to [`flush`](Self::flush).
    */
    pub fn decode(&mut self, packet: &Packet) -> Result<Vec<VideoFrame>> {
        if packet.is_empty() {
            return Ok(Vec::new());
        }

        let mut ffmpeg_pkt = ffmpeg_next::Packet::copy(&packet.data);

        // Set timing info
        unsafe {
            let pkt_ptr = ffmpeg_pkt.as_mut_ptr();
            (*pkt_ptr).pts = packet.pts.map_or(ffi::AV_NOPTS_VALUE, |pts| pts.0);
            (*pkt_ptr).dts = packet.dts.map_or(ffi::AV_NOPTS_VALUE, |dts| dts.0);
            (*pkt_ptr).duration = packet.duration.0;
        }
        if packet.is_keyframe {
            ffmpeg_pkt.set_flags(ffmpeg_next::packet::Flags::KEY);
        }

        self.decoder
            .send_packet(&ffmpeg_pkt)
            .map_err(|e| Error::codec(e.to_string()))?;

        self.receive_frames()
    }

    /**
        Flush the decoder to get any remaining buffered frames.

        Call this at end of stream to retrieve any buffered frames.
    */
    pub fn flush(&mut self) -> Result<Vec<VideoFrame>> {
        self.decoder
            .send_eof()
            .map_err(|e| Error::codec(e.to_string()))?;

        self.receive_frames()
    }

    /**
        Receive all available frames from the decoder.
    */
    fn receive_frames(&mut self) -> Result<Vec<VideoFrame>> {
        let mut decoded_frame = VideoFrameFFmpeg::empty();

        collect_frames(|| match self.decoder.receive_frame(&mut decoded_frame) {
            Ok(()) => {
                self.frames_decoded += 1;
                self.convert_frame(&decoded_frame).map(Some)
            }
            Err(ffmpeg_next::Error::Other { errno }) if errno == ffi::EAGAIN => Ok(None),
            Err(ffmpeg_next::Error::Eof) => Ok(None),
            Err(e) => Err(Error::codec(e.to_string())),
        })
    }

    /**
        Convert an FFmpeg video frame to our VideoFrame type.
    */
    fn convert_frame(&mut self, frame: &VideoFrameFFmpeg) -> Result<VideoFrame> {
        if frame.width() == 0 || frame.height() == 0 {
            return Err(Error::invalid_data("video frame has zero dimensions"));
        }

        let transferred;
        let frame = if is_hw_frame(frame) {
            transferred = download_frame(frame)
                .map_err(|e| Error::codec(format!("hardware frame transfer failed: {e}")))?;
            &transferred
        } else {
            frame
        };

        let pts = frame.pts().or_else(|| frame.timestamp()).map(Pts);

        match pixel_format_from_ffmpeg(frame.format()) {
            Some(format) => Ok(VideoFrame::new(
                pack_frame(frame, format)?,
                frame.width(),
                frame.height(),
                format,
                pts,
                self.time_base,
            )),
            None => {
                let fallback = self.fallback.get_or_insert_with(|| {
                    log::debug!(
                        "converting unnamed pixel format {:?} to yuv420p",
                        frame.format()
                    );
                    VideoTransform::new(VideoTransformConfig::format_only(PixelFormat::Yuv420p))
                });
                fallback.transform_raw(frame, pts, self.time_base)
            }
        }
    }
}

/**
    Attach a hardware device to a decoder context before it is opened.

    Returns None, leaving the context on software decoding, if the device
    cannot be opened.
*/
fn attach_hw_device(
    context: &mut codec::context::Context,
    device: HwDevice,
) -> Option<HwDeviceRef> {
    let hw = match HwDeviceRef::open(device) {
        Ok(hw) => hw,
        Err(e) => {
            log::warn!("{device:?} hardware decoding unavailable ({e}), falling back to software");
            return None;
        }
    };

    // SAFETY: the context is not opened yet and takes ownership of the new reference
    unsafe {
        (*context.as_mut_ptr()).hw_device_ctx = hw.share();
    }
    log::info!("{device:?} hardware decoding enabled");
    Some(hw)
}

impl std::fmt::Debug for VideoDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoDecoder")
            .field("time_base", &self.time_base)
            .field("width", &self.decoder.width())
            .field("height", &self.decoder.height())
            .field("hw_device", &self.hw_device())
            .field("frames_decoded", &self.frames_decoded)
            .finish_non_exhaustive()
    }
}

/**
    Pull decoder output until `next` reports that none is left.

    An error after some frames were already received is logged and the
    received frames are returned, since they are valid output.
*/
fn collect_frames<T>(mut next: impl FnMut() -> Result<Option<T>>) -> Result<Vec<T>> {
    let mut frames = Vec::new();
    loop {
        match next() {
            Ok(Some(frame)) => frames.push(frame),
            Ok(None) => return Ok(frames),
            Err(e) if frames.is_empty() => return Err(e),
            Err(e) => {
                log::warn!("decoder failed after {} frames: {e}", frames.len());
                return Ok(frames);
            }
        }
    }
}
