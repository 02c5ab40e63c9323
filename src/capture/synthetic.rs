//! Synthetic camera producing generated test-pattern frames.
//!
//! Used by the native host (which has no browser camera) and by tests, where the
//! shared [`CameraStats`] counters make stream lifecycles observable.

use std::cell::Cell;
use std::rc::Rc;

use image::{Rgba, RgbaImage};

use super::{CaptureDevice, CaptureError, FacingMode, LiveStream, StreamRequest};

/// How the synthetic camera answers stream requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraAvailability {
    /// Both cameras work
    #[default]
    Ready,
    /// Every request is refused
    PermissionDenied,
    /// There is no camera at all
    NoDevice,
    /// Only the rear camera exists
    RearOnly,
}

/// Stream lifecycle counters shared between a camera and its observers.
#[derive(Debug, Default)]
pub struct CameraStats {
    opened: Cell<usize>,
    released: Cell<usize>,
}

impl CameraStats {
    /// Streams granted so far.
    pub fn opened(&self) -> usize {
        self.opened.get()
    }

    /// Streams whose tracks were released.
    pub fn released(&self) -> usize {
        self.released.get()
    }

    /// Streams currently live.
    pub fn active(&self) -> usize {
        self.opened() - self.released()
    }
}

/// Camera that renders a moving gradient instead of reading hardware.
#[derive(Debug, Default)]
pub struct SyntheticCamera {
    availability: CameraAvailability,
    stats: Rc<CameraStats>,
}

impl SyntheticCamera {
    /// A camera with front and rear lenses that always grants access.
    pub fn new() -> Self {
        Self::default()
    }

    /// A camera with the given availability.
    pub fn with_availability(availability: CameraAvailability) -> Self {
        Self {
            availability,
            stats: Rc::default(),
        }
    }

    /// Shared lifecycle counters.
    pub fn stats(&self) -> Rc<CameraStats> {
        Rc::clone(&self.stats)
    }
}

impl CaptureDevice for SyntheticCamera {
    fn open(&mut self, request: &StreamRequest) -> Result<Box<dyn LiveStream>, CaptureError> {
        match (self.availability, request.facing) {
            (CameraAvailability::PermissionDenied, _) => Err(CaptureError::PermissionDenied),
            (CameraAvailability::NoDevice, _) => Err(CaptureError::DeviceUnavailable(
                "no camera found".to_string(),
            )),
            (CameraAvailability::RearOnly, FacingMode::Front) => Err(
                CaptureError::DeviceUnavailable("no front-facing camera".to_string()),
            ),
            _ => {
                self.stats.opened.set(self.stats.opened.get() + 1);
                Ok(Box::new(SyntheticStream {
                    facing: request.facing,
                    width: request.ideal_width.max(1),
                    height: request.ideal_height.max(1),
                    frame_index: 0,
                    stopped: false,
                    stats: Rc::clone(&self.stats),
                }))
            }
        }
    }
}

struct SyntheticStream {
    facing: FacingMode,
    width: u32,
    height: u32,
    frame_index: u32,
    stopped: bool,
    stats: Rc<CameraStats>,
}

impl LiveStream for SyntheticStream {
    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn grab_frame(&mut self) -> Result<RgbaImage, CaptureError> {
        if self.stopped {
            return Err(CaptureError::DeviceUnavailable(
                "stream tracks were released".to_string(),
            ));
        }

        // Diagonal gradient that drifts one step per frame; the front camera
        // is tinted blue and the rear camera green.
        let shift = self.frame_index;
        let (tint_g, tint_b) = match self.facing {
            FacingMode::Front => (60u8, 200u8),
            FacingMode::Rear => (200u8, 60u8),
        };
        let (w, h) = (self.width, self.height);
        let period = w.saturating_add(h);
        let frame = RgbaImage::from_fn(w, h, |x, y| {
            let t = (x.wrapping_add(y).wrapping_add(shift) % period) as f32 / period as f32;
            let r = (t * 255.0) as u8;
            Rgba([r, tint_g, tint_b, 255])
        });

        self.frame_index = self.frame_index.wrapping_add(1);
        Ok(frame)
    }

    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.stats.released.set(self.stats.released.get() + 1);
        }
    }
}
