//! Camera capture adapter.
//!
//! [`MediaCaptureAdapter`] owns the capture device, the selected facing mode and
//! at most one live stream. Starting and stopping are idempotent, so repeated
//! button presses never leak a stream or fail.

mod device;
mod synthetic;

pub use device::{CaptureDevice, FacingMode, LiveStream, StreamRequest};
pub use synthetic::{CameraAvailability, CameraStats, SyntheticCamera};

use crate::constants::{IDEAL_CAPTURE_HEIGHT, IDEAL_CAPTURE_WIDTH};
use crate::model::{EncodedImage, FrameEncoder};

/// Errors reported by the capture adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    /// The user or platform refused camera access
    #[error("Camera permission denied")]
    PermissionDenied,

    /// No usable camera, or the camera stopped delivering frames
    #[error("Camera unavailable: {0}")]
    DeviceUnavailable(String),

    /// A frame was requested without an active stream
    #[error("No active camera stream")]
    NotStreaming,
}

/// Caller-visible handle describing the active stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHandle {
    /// Monotonic stream id, unique per adapter
    pub id: u64,
    /// Camera the stream comes from
    pub facing: FacingMode,
    /// Delivered width in pixels
    pub width: u32,
    /// Delivered height in pixels
    pub height: u32,
}

/// Resolution preferences sent with every stream request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConstraints {
    /// Preferred width
    pub ideal_width: u32,
    /// Preferred height
    pub ideal_height: u32,
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        Self {
            ideal_width: IDEAL_CAPTURE_WIDTH,
            ideal_height: IDEAL_CAPTURE_HEIGHT,
        }
    }
}

struct CaptureSession {
    handle: StreamHandle,
    stream: Box<dyn LiveStream>,
}

/// Owns the camera lifecycle for one session.
pub struct MediaCaptureAdapter {
    device: Box<dyn CaptureDevice>,
    constraints: CaptureConstraints,
    encoder: FrameEncoder,
    facing: FacingMode,
    session: Option<CaptureSession>,
    next_stream_id: u64,
}

impl MediaCaptureAdapter {
    /// Create an idle adapter around a device.
    pub fn new(device: Box<dyn CaptureDevice>, facing: FacingMode) -> Self {
        Self {
            device,
            constraints: CaptureConstraints::default(),
            encoder: FrameEncoder::default(),
            facing,
            session: None,
            next_stream_id: 1,
        }
    }

    /// Override the resolution preferences.
    pub fn with_constraints(mut self, constraints: CaptureConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Override the frame encoder.
    pub fn with_encoder(mut self, encoder: FrameEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    /// Currently selected camera.
    pub fn facing(&self) -> FacingMode {
        self.facing
    }

    /// Whether a stream is live.
    pub fn is_streaming(&self) -> bool {
        self.session.is_some()
    }

    /// The stream shown on the preview surface, if any.
    pub fn preview(&self) -> Option<StreamHandle> {
        self.session.as_ref().map(|s| s.handle)
    }

    /// Start streaming from the given camera.
    ///
    /// Starting the camera that is already streaming returns the existing handle.
    /// Starting a different camera releases the current stream first.
    pub fn start(&mut self, facing: FacingMode) -> Result<StreamHandle, CaptureError> {
        if let Some(session) = &self.session {
            if session.handle.facing == facing {
                log::debug!("Camera already streaming ({:?}), reusing stream", facing);
                return Ok(session.handle);
            }
            self.stop();
        }

        self.facing = facing;
        let request = StreamRequest {
            facing,
            ideal_width: self.constraints.ideal_width,
            ideal_height: self.constraints.ideal_height,
        };

        let stream = self.device.open(&request).map_err(|e| {
            log::warn!("Error accessing camera ({}): {}", facing.constraint_name(), e);
            e
        })?;

        let (width, height) = stream.resolution();
        let handle = StreamHandle {
            id: self.next_stream_id,
            facing,
            width,
            height,
        };
        self.next_stream_id += 1;
        self.session = Some(CaptureSession { handle, stream });

        log::info!(
            "📷 Camera stream #{} started ({}, {}x{})",
            handle.id,
            facing.constraint_name(),
            width,
            height
        );
        Ok(handle)
    }

    /// Release the active stream and clear the preview. No-op when idle.
    pub fn stop(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.stream.stop();
            log::info!("Camera stream #{} stopped", session.handle.id);
        }
    }

    /// Restart on the opposite camera.
    ///
    /// The facing mode flips even if the restart fails, so the next attempt
    /// targets the other camera again.
    pub fn switch_facing(&mut self) -> Result<StreamHandle, CaptureError> {
        let next = self.facing.opposite();
        self.stop();
        self.facing = next;
        log::debug!("🔄 Switching camera to {}", next.constraint_name());
        self.start(next)
    }

    /// Encode the current frame of the live stream.
    pub fn capture_frame(&mut self) -> Result<EncodedImage, CaptureError> {
        let session = self.session.as_mut().ok_or(CaptureError::NotStreaming)?;
        let frame = session.stream.grab_frame()?;
        self.encoder
            .encode(&frame)
            .map_err(|e| CaptureError::DeviceUnavailable(format!("Failed to encode frame: {}", e)))
    }
}

impl Drop for MediaCaptureAdapter {
    fn drop(&mut self) {
        self.stop();
    }
}
