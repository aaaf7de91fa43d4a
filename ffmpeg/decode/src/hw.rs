/*!
    Hardware decoding devices and surface download.
*/

use std::ptr::{self, NonNull};

use ffmpeg_next::{ffi, util::frame::video::Video as VideoFrameFFmpeg};

use crate::config::HwDevice;

fn av_device_type(device: HwDevice) -> ffi::AVHWDeviceType {
    match device {
        HwDevice::VideoToolbox => ffi::AVHWDeviceType::AV_HWDEVICE_TYPE_VIDEOTOOLBOX,
        HwDevice::Vaapi => ffi::AVHWDeviceType::AV_HWDEVICE_TYPE_VAAPI,
        HwDevice::Cuda => ffi::AVHWDeviceType::AV_HWDEVICE_TYPE_CUDA,
        HwDevice::Qsv => ffi::AVHWDeviceType::AV_HWDEVICE_TYPE_QSV,
    }
}

/**
    An open hardware device, owned by the decoder that uses it.

    The decoder context holds its own reference (see [`share`](Self::share)),
    so the device stays alive until both are gone.
*/
pub(crate) struct HwDeviceRef {
    buffer: NonNull<ffi::AVBufferRef>,
    device: HwDevice,
}

impl HwDeviceRef {
    /**
        Open the system's default device of the given kind.
    */
    pub fn open(device: HwDevice) -> Result<Self, ffmpeg_next::Error> {
        let mut buffer: *mut ffi::AVBufferRef = ptr::null_mut();

        // SAFETY: on success FFmpeg stores a new buffer reference we now own
        let ret = unsafe {
            ffi::av_hwdevice_ctx_create(
                &mut buffer,
                av_device_type(device),
                ptr::null(),
                ptr::null_mut(),
                0,
            )
        };
        if ret < 0 {
            return Err(ffmpeg_next::Error::from(ret));
        }

        NonNull::new(buffer)
            .map(|buffer| Self { buffer, device })
            .ok_or(ffmpeg_next::Error::Bug)
    }

    pub fn device(&self) -> HwDevice {
        self.device
    }

    /**
        A new reference to the device, for a codec context to take ownership of.
    */
    pub fn share(&self) -> *mut ffi::AVBufferRef {
        unsafe { ffi::av_buffer_ref(self.buffer.as_ptr()) }
    }
}

impl Drop for HwDeviceRef {
    fn drop(&mut self) {
        let mut buffer = self.buffer.as_ptr();
        unsafe { ffi::av_buffer_unref(&mut buffer) };
    }
}

// SAFETY: AVBufferRef reference counting is atomic; we only ref and unref.
unsafe impl Send for HwDeviceRef {}

/**
    True if the frame's pixels live in device memory.
*/
pub(crate) fn is_hw_frame(frame: &VideoFrameFFmpeg) -> bool {
    unsafe { !(*frame.as_ptr()).hw_frames_ctx.is_null() }
}

/**
    Download a device frame into system memory, keeping its timestamps.
*/
pub(crate) fn download_frame(
    hw_frame: &VideoFrameFFmpeg,
) -> Result<VideoFrameFFmpeg, ffmpeg_next::Error> {
    let mut frame = VideoFrameFFmpeg::empty();

    unsafe {
        let ret = ffi::av_hwframe_transfer_data(frame.as_mut_ptr(), hw_frame.as_ptr(), 0);
        if ret < 0 {
            return Err(ffmpeg_next::Error::from(ret));
        }

        let ret = ffi::av_frame_copy_props(frame.as_mut_ptr(), hw_frame.as_ptr());
        if ret < 0 {
            return Err(ffmpeg_next::Error::from(ret));
        }
    }

    Ok(frame)
}
