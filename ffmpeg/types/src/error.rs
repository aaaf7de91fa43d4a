/*!
    Errors shared by every crate in the workspace.
*/

use std::fmt;

/**
    Everything that can go wrong between opening a stream and reading its frames.
*/
#[derive(Debug)]
pub enum Error {
    /// Reading from an open input failed (dropped connection, broken segment)
    Io(std::io::Error),
    /// The media source could not be opened (unreachable, unsupported, no video)
    Open { url: String, message: String },
    /// The given location is not a usable absolute URL
    InvalidUrl { input: String, message: String },
    /// The decoder rejected a packet or failed to produce a frame
    Codec { message: String },
    /// A decoded frame or packet is malformed
    InvalidData { message: String },
    /// A codec or pixel format without a decoder or conversion
    UnsupportedFormat { message: String },
    /// Operation requires an open session
    NotOpen,
    /// The session already holds an open source
    AlreadyOpen,
    /// The session has been closed and cannot be reused
    Closed,
    /// A previous read failed and the session no longer produces frames
    Terminated,
    /// The input is exhausted
    Eof,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Open { url, message } => write!(f, "failed to open '{url}': {message}"),
            Self::InvalidUrl { input, message } => write!(f, "invalid url '{input}': {message}"),
            Self::Codec { message } => write!(f, "codec error: {message}"),
            Self::InvalidData { message } => write!(f, "invalid data: {message}"),
            Self::UnsupportedFormat { message } => write!(f, "unsupported format: {message}"),
            Self::NotOpen => write!(f, "session is not open"),
            Self::AlreadyOpen => write!(f, "session is already open"),
            Self::Closed => write!(f, "session is closed"),
            Self::Terminated => write!(f, "session terminated after a failed read"),
            Self::Eof => write!(f, "end of stream"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl Error {
    /**
        Create an open error for the given url.
    */
    pub fn open(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Open {
            url: url.into(),
            message: message.into(),
        }
    }

    /**
        Create an invalid url error for the given input.
    */
    pub fn invalid_url(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidUrl {
            input: input.into(),
            message: message.into(),
        }
    }

    /**
        A decoder failure.
    */
    pub fn codec(message: impl Into<String>) -> Self {
        Self::Codec {
            message: message.into(),
        }
    }

    /**
        Malformed media data.
    */
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /**
        A format nothing in the pipeline can handle.
    */
    pub fn unsupported_format(message: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            message: message.into(),
        }
    }

    /**
        True for the end of the stream, which is not a failure.
    */
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }

    /**
        Returns true if this error came from opening a source.
    */
    pub fn is_open_failure(&self) -> bool {
        matches!(self, Self::Open { .. } | Self::InvalidUrl { .. })
    }
}

/**
    Result type used throughout the workspace.
*/
pub type Result<T> = std::result::Result<T, Error>;
