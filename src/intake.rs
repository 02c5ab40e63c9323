//! User-supplied image intake (file picker and drag-and-drop).
//!
//! Files are validated by declared media type, decoded with the `image` crate and
//! re-encoded through the same [`FrameEncoder`] the camera uses, so a classifier
//! never sees the difference between an upload and a capture.

use crate::model::{EncodedImage, FrameEncoder};

/// Errors reported by the intake adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    /// The declared media type is not an image
    #[error("Unsupported file type '{media_type}'")]
    UnsupportedType {
        /// Declared media type of the rejected file
        media_type: String,
    },

    /// The bytes could not be decoded as an image
    #[error("Failed to decode image '{name}': {reason}")]
    DecodeFailure {
        /// File name
        name: String,
        /// Decoder message
        reason: String,
    },

    /// The drop payload carried no files
    #[error("No file provided")]
    NoFile,
}

/// A file chosen by the user, with the media type the platform declared for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// File name
    pub name: String,
    /// Declared media type, e.g. `image/png`
    pub media_type: String,
    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    /// Create a selected file.
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing its media type from the extension.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_path(path: &std::path::Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let media_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        log::debug!("Read {} ({}, {} bytes)", name, media_type, bytes.len());
        Ok(Self::new(name, media_type, bytes))
    }

    /// Whether the declared media type is an image type.
    pub fn is_image(&self) -> bool {
        self.media_type
            .get(..6)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
    }
}

/// Files carried by a drag-and-drop gesture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropPayload {
    /// Dropped files in platform order
    pub files: Vec<SelectedFile>,
}

impl DropPayload {
    /// Payload with the given files.
    pub fn new(files: Vec<SelectedFile>) -> Self {
        Self { files }
    }
}

/// Turns user-supplied files into [`EncodedImage`]s.
#[derive(Debug, Clone, Default)]
pub struct ImageIntakeAdapter {
    encoder: FrameEncoder,
}

impl ImageIntakeAdapter {
    /// Create an adapter that re-encodes with the given encoder.
    pub fn new(encoder: FrameEncoder) -> Self {
        Self { encoder }
    }

    /// Validate and decode a file from the file picker.
    pub fn from_file(&self, file: &SelectedFile) -> Result<EncodedImage, IntakeError> {
        if !file.is_image() {
            log::warn!("Rejected '{}': media type '{}'", file.name, file.media_type);
            return Err(IntakeError::UnsupportedType {
                media_type: file.media_type.clone(),
            });
        }

        let decode_failure = |reason: String| IntakeError::DecodeFailure {
            name: file.name.clone(),
            reason,
        };

        let pixels = image::load_from_memory(&file.bytes)
            .map_err(|e| decode_failure(e.to_string()))?
            .to_rgba8();
        let encoded = self
            .encoder
            .encode(&pixels)
            .map_err(|e| decode_failure(e.to_string()))?;

        log::info!(
            "📂 Loaded '{}' ({}x{})",
            file.name,
            encoded.width(),
            encoded.height()
        );
        Ok(encoded)
    }

    /// Validate and decode the first file of a drop payload.
    pub fn from_drop(&self, payload: &DropPayload) -> Result<EncodedImage, IntakeError> {
        let file = payload.files.first().ok_or(IntakeError::NoFile)?;
        if payload.files.len() > 1 {
            log::debug!(
                "Drop carried {} files, using '{}'",
                payload.files.len(),
                file.name
            );
        }
        self.from_file(file)
    }
}
