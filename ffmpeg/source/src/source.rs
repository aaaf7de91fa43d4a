/*!
    Opening media locations and reading video packets.
*/

use std::ffi::CStr;

use ffmpeg_next::{ffi, format, media};

use ffmpeg_types::{
    CodecId, Error, MediaDuration, Packet, Pts, Rational, Result, StreamUrl,
};

use crate::codec_config::CodecConfig;
use crate::convert::{codec_id_from_ffmpeg, rational_from_ffmpeg};
use crate::network::NetworkGuard;

/**
    Returns the version string of the linked FFmpeg libraries.
*/
pub fn version() -> String {
    // SAFETY: av_version_info returns a pointer to a static NUL-terminated string
    unsafe { CStr::from_ptr(ffi::av_version_info()) }
        .to_string_lossy()
        .into_owned()
}

/**
    Open a media location and select its best video stream.

    Fails with [`Error::Open`] if FFmpeg cannot reach or parse the input,
    or if the input has no video stream.
*/
pub fn open(url: &StreamUrl) -> Result<Source> {
    Source::open(url)
}

/**
    An open media input.

    Only packets of the selected video stream are returned; other streams
    (audio, subtitles, data) are read and discarded.
*/
pub struct Source {
    url: StreamUrl,
    // Declared before `_network` so the format context closes first
    input: format::context::Input,
    stream_index: usize,
    time_base: Rational,
    frame_rate: Option<Rational>,
    codec_id: CodecId,
    codec_config: Option<CodecConfig>,
    packets_read: u64,
    _network: NetworkGuard,
}

impl Source {
    fn open(url: &StreamUrl) -> Result<Self> {
        ffmpeg_next::init()
            .map_err(|e| Error::open(url.as_str(), format!("initialize ffmpeg: {e}")))?;

        let network = NetworkGuard::acquire();

        let input = format::input(&url.ffmpeg_input())
            .map_err(|e| Error::open(url.as_str(), e.to_string()))?;

        let stream = input
            .streams()
            .best(media::Type::Video)
            .ok_or_else(|| Error::open(url.as_str(), "no video stream found"))?;

        let stream_index = stream.index();
        let time_base = rational_from_ffmpeg(stream.time_base())
            .ok_or_else(|| Error::open(url.as_str(), "video stream has no time base"))?;
        let frame_rate = rational_from_ffmpeg(stream.avg_frame_rate());
        let parameters = stream.parameters();
        let codec_id = codec_id_from_ffmpeg(parameters.id());
        let codec_config = CodecConfig::from_stream_parameters(&parameters);
        drop(parameters);

        log::info!(
            "opened {} ({} video on stream #{}, time base {})",
            url,
            codec_id,
            stream_index,
            time_base
        );

        Ok(Self {
            url: url.clone(),
            input,
            stream_index,
            time_base,
            frame_rate,
            codec_id,
            codec_config: Some(codec_config),
            packets_read: 0,
            _network: network,
        })
    }

    /**
        Time base of the video stream's timestamps.
    */
    pub fn time_base(&self) -> Rational {
        self.time_base
    }

    /**
        Average frame rate, if the container advertises one.
    */
    pub fn frame_rate(&self) -> Option<Rational> {
        self.frame_rate
    }

    pub fn codec_id(&self) -> CodecId {
        self.codec_id
    }

    /**
        Take the codec configuration for building a decoder.

        Returns None if it was already taken.
    */
    pub fn take_codec_config(&mut self) -> Option<CodecConfig> {
        self.codec_config.take()
    }

    /**
        Number of video packets returned so far.
    */
    pub fn packets_read(&self) -> u64 {
        self.packets_read
    }

    /**
        Read the next packet of the video stream.

        Returns [`Error::Eof`] once the input is exhausted. Read failures
        (dropped connections, broken segments) are reported as I/O errors.
        Packets without a payload are skipped.
    */
    pub fn read_packet(&mut self) -> Result<Packet> {
        loop {
            let mut packet = ffmpeg_next::Packet::empty();
            match packet.read(&mut self.input) {
                Ok(()) => {}
                Err(ffmpeg_next::Error::Eof) => return Err(Error::Eof),
                Err(ffmpeg_next::Error::Other { errno }) if errno == ffi::EAGAIN => continue,
                Err(e) => {
                    return Err(Error::Io(std::io::Error::other(format!(
                        "read from {}: {e}",
                        self.url
                    ))));
                }
            }

            if packet.stream() != self.stream_index {
                continue;
            }

            let Some(data) = packet.data().filter(|data| !data.is_empty()) else {
                log::trace!("skipping empty packet on stream #{}", self.stream_index);
                continue;
            };

            self.packets_read += 1;

            return Ok(Packet::new(
                data.to_vec(),
                packet.pts().map(Pts),
                packet.dts().map(Pts),
                MediaDuration(packet.duration()),
                self.time_base,
                packet.is_key(),
            ));
        }
    }
}

impl std::fmt::Debug for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Source")
            .field("url", &self.url)
            .field("stream_index", &self.stream_index)
            .field("codec", &self.codec_id)
            .field("time_base", &self.time_base)
            .field("packets_read", &self.packets_read)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn missing_file_fails_to_open() {
        let url = StreamUrl::parse("/nonexistent/dir/clip.ts").unwrap();
        let err = open(&url).unwrap_err();
        assert!(matches!(err, Error::Open { .. }), "{err:?}");
    }
}
