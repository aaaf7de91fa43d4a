/*!
    Media source locations.
*/

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use url::Url;

use crate::{Error, Result};

/**
    A syntactically valid, absolute location of a media source.

    Network URLs (`https://…/playlist.m3u8`, `rtsp://…`, `udp://…`) are kept
    as given. Absolute filesystem paths are accepted too and stored as
    `file://` URLs. Reachability is never checked here; that is up to
    whatever opens the source.
*/
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StreamUrl {
    url: Url,
}

impl StreamUrl {
    /**
        Parse a URL or absolute path.
    */
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(Error::invalid_url(input, "empty location"));
        }

        match Url::parse(trimmed) {
            Ok(url) => Ok(Self { url }),
            Err(url::ParseError::RelativeUrlWithoutBase) if Path::new(trimmed).is_absolute() => {
                let url = Url::from_file_path(trimmed)
                    .map_err(|()| Error::invalid_url(input, "not a valid file path"))?;
                Ok(Self { url })
            }
            Err(e) => Err(Error::invalid_url(input, e.to_string())),
        }
    }

    /**
        The URL scheme, lowercase (`https`, `file`, `synthetic`, …).
    */
    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /**
        Returns true if the location refers to a local file.
    */
    pub fn is_file(&self) -> bool {
        self.url.scheme() == "file"
    }

    /**
        The string to hand to FFmpeg when opening this location.

        Local files are passed as plain paths, everything else as the URL.
    */
    pub fn ffmpeg_input(&self) -> String {
        if self.is_file() {
            if let Ok(path) = self.url.to_file_path() {
                return path.to_string_lossy().into_owned();
            }
        }
        self.url.as_str().to_owned()
    }

    /**
        Returns the first value of query parameter `key`, if present.
    */
    pub fn query_param(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

impl FromStr for StreamUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for StreamUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for StreamUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

impl fmt::Debug for StreamUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StreamUrl({})", self.url)
    }
}
