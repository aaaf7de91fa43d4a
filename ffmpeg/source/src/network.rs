/*!
    FFmpeg network layer lifetime.
*/

/**
    Keeps FFmpeg's network layer (TLS, sockets) initialized while alive.

    Every open source holds one; the matching deinit runs when the source
    is dropped, after its format context has been closed.
*/
pub(crate) struct NetworkGuard {
    _private: (),
}

impl NetworkGuard {
    pub fn acquire() -> Self {
        ffmpeg_next::format::network::init();
        Self { _private: () }
    }
}

impl Drop for NetworkGuard {
    fn drop(&mut self) {
        ffmpeg_next::format::network::deinit();
    }
}
