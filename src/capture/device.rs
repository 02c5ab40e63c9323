//! Platform camera abstraction.
//!
//! A [`CaptureDevice`] grants live streams; a [`LiveStream`] hands out frames
//! until its tracks are released.

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use super::CaptureError;

/// Which camera to use on devices that have more than one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Front-facing ("user") camera
    Front,
    /// Rear-facing ("environment") camera
    #[default]
    Rear,
}

impl FacingMode {
    /// The other camera.
    pub fn opposite(self) -> Self {
        match self {
            FacingMode::Front => FacingMode::Rear,
            FacingMode::Rear => FacingMode::Front,
        }
    }

    /// Name used by browser media constraints.
    pub fn constraint_name(&self) -> &'static str {
        match self {
            FacingMode::Front => "user",
            FacingMode::Rear => "environment",
        }
    }
}

/// Parameters for opening a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamRequest {
    /// Requested camera
    pub facing: FacingMode,
    /// Preferred width; the device may deliver something else
    pub ideal_width: u32,
    /// Preferred height; the device may deliver something else
    pub ideal_height: u32,
}

/// A camera (or camera-like source) that can grant live streams.
pub trait CaptureDevice {
    /// Request access and begin streaming.
    ///
    /// Fails with [`CaptureError::PermissionDenied`] or
    /// [`CaptureError::DeviceUnavailable`].
    fn open(&mut self, request: &StreamRequest) -> Result<Box<dyn LiveStream>, CaptureError>;
}

/// An active stream of frames.
pub trait LiveStream {
    /// Actual (width, height) delivered by the device.
    fn resolution(&self) -> (u32, u32);

    /// Grab the current frame.
    fn grab_frame(&mut self) -> Result<RgbaImage, CaptureError>;

    /// Release all device tracks. Called exactly once per stream.
    fn stop(&mut self);
}
