//! Global constants for the ecosort session

/// Ideal capture width requested from the camera
pub const IDEAL_CAPTURE_WIDTH: u32 = 1280;

/// Ideal capture height requested from the camera
pub const IDEAL_CAPTURE_HEIGHT: u32 = 720;

/// Largest capture width or height accepted from configuration
pub const MAX_CAPTURE_DIMENSION: u32 = 4096;

/// JPEG quality used for captured and uploaded frames (1-100)
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Simulated classification latency in milliseconds
pub const CLASSIFICATION_DELAY_MS: u64 = 2000;

/// Simulated chat reply latency in milliseconds
pub const CHAT_REPLY_DELAY_MS: u64 = 1000;

/// Host loop polling interval in milliseconds
pub const HOST_TICK_INTERVAL_MS: u64 = 50;
