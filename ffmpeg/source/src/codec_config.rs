/*!
    Codec configuration handed from source to decoder.
*/

use ffmpeg_next::codec;

use ffmpeg_types::CodecId;

use crate::convert::codec_id_from_ffmpeg;

/**
    Codec parameters of the selected video stream.

    Holds its own copy of the parameters, so it does not keep the source's
    format context alive once the source is dropped.
*/
pub struct CodecConfig {
    parameters: codec::Parameters,
}

impl CodecConfig {
    pub(crate) fn from_stream_parameters(parameters: &codec::Parameters) -> Self {
        Self {
            parameters: parameters.clone(),
        }
    }

    /**
        The codec the stream is encoded with.
    */
    pub fn codec_id(&self) -> CodecId {
        codec_id_from_ffmpeg(self.parameters.id())
    }

    /**
        Consume the config, returning the FFmpeg parameters for a decoder context.
    */
    pub fn into_parameters(self) -> codec::Parameters {
        self.parameters
    }
}

impl std::fmt::Debug for CodecConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecConfig")
            .field("codec", &self.codec_id())
            .finish_non_exhaustive()
    }
}
