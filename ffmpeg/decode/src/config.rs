/*!
    Decoder configuration types.
*/

/**
    Hardware device type for hardware-accelerated decoding.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum HwDevice {
    /// VideoToolbox (macOS)
    VideoToolbox,
    /// VAAPI (Linux - AMD, Intel)
    Vaapi,
    /// CUDA/NVDEC (NVIDIA)
    Cuda,
    /// Quick Sync Video (Intel)
    Qsv,
}

impl HwDevice {
    /**
        The device to try when none was requested explicitly.

        macOS always has VideoToolbox; on other platforms a device is only
        picked when the matching cargo feature is enabled.
    */
    pub fn auto_detect() -> Option<Self> {
        if cfg!(feature = "cuda") {
            Some(Self::Cuda)
        } else if cfg!(feature = "vaapi") {
            Some(Self::Vaapi)
        } else if cfg!(any(target_os = "macos", feature = "videotoolbox")) {
            Some(Self::VideoToolbox)
        } else {
            None
        }
    }
}

/**
    Configuration for video decoder.
*/
#[derive(Clone, Debug, Default)]
pub struct VideoDecoderConfig {
    /// Prefer hardware decoding if available.
    pub prefer_hw: bool,
    /// Specific hardware device to use (None = auto-detect).
    pub hw_device: Option<HwDevice>,
}

impl VideoDecoderConfig {
    /**
        Create a new config with default settings (software decoding).
    */
    pub fn new() -> Self {
        Self::default()
    }

    /**
        Create a config that prefers hardware acceleration.
    */
    pub fn with_hw_accel() -> Self {
        Self {
            prefer_hw: true,
            hw_device: None,
        }
    }

    /**
        Create a config with a specific hardware device.
    */
    pub fn with_hw_device(device: HwDevice) -> Self {
        Self {
            prefer_hw: true,
            hw_device: Some(device),
        }
    }

    /**
        The hardware device to try, or None for software decoding.
    */
    pub fn requested_device(&self) -> Option<HwDevice> {
        if !self.prefer_hw {
            return None;
        }
        self.hw_device.or_else(HwDevice::auto_detect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_software() {
        let config = VideoDecoderConfig::new();
        assert!(!config.prefer_hw);
        assert_eq!(config.requested_device(), None);
    }

    #[test]
    fn explicit_device_wins() {
        let config = VideoDecoderConfig::with_hw_device(HwDevice::Vaapi);
        assert_eq!(config.requested_device(), Some(HwDevice::Vaapi));
    }

    #[test]
    fn hw_accel_uses_auto_detection() {
        let config = VideoDecoderConfig::with_hw_accel();
        assert_eq!(config.requested_device(), HwDevice::auto_detect());
    }

    #[test]
    fn device_ignored_without_preference() {
        let config = VideoDecoderConfig {
            prefer_hw: false,
            hw_device: Some(HwDevice::Cuda),
        };
        assert_eq!(config.requested_device(), None);
    }
}
