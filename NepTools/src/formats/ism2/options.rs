//! Caller-supplied settings for ISM2 decoding

use std::path::PathBuf;

/// Default texture folder, relative to the model's directory.
pub const TEXTURE_PATH_DEFAULT: &str = "texture";

/// Options for decoding ISM2 files.
///
/// Nothing is read from a configuration file; callers (or CLI flags) fill
/// this in.
///
/// # Example
///
/// ```
/// use neptools::formats::ism2::DecodeOptions;
///
/// // Decode everything, including bounding boxes and the face.anm sidecar
/// let options = DecodeOptions::full();
///
/// // Or configure individually
/// let options = DecodeOptions::new()
///     .with_bounding_boxes(true)
///     .with_texture_path("texture/002")
///     .with_verbose(true);
/// ```
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Decode surface- and mesh-scoped bounding boxes
    pub parse_bounding_boxes: bool,

    /// Read the `face.anm` sidecar next to the model
    pub parse_face_anm: bool,

    /// Decode armature animation sections (best effort)
    pub parse_motion: bool,

    /// Decode the material list. When off, surfaces resolve to no material.
    pub load_materials: bool,

    /// Texture folder relative to the model directory
    /// Default: `texture`
    pub texture_path: PathBuf,

    /// Emit the section-by-section narrative at debug level
    pub verbose: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl DecodeOptions {
    /// Create options with the optional parts disabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parse_bounding_boxes: false,
            parse_face_anm: false,
            parse_motion: false,
            load_materials: true,
            texture_path: PathBuf::from(TEXTURE_PATH_DEFAULT),
            verbose: false,
        }
    }

    /// Create options with every optional part enabled.
    #[must_use]
    pub fn full() -> Self {
        Self {
            parse_bounding_boxes: true,
            parse_face_anm: true,
            parse_motion: true,
            ..Self::new()
        }
    }

    #[must_use]
    pub fn with_bounding_boxes(mut self, value: bool) -> Self {
        self.parse_bounding_boxes = value;
        self
    }

    #[must_use]
    pub fn with_face_anm(mut self, value: bool) -> Self {
        self.parse_face_anm = value;
        self
    }

    #[must_use]
    pub fn with_motion(mut self, value: bool) -> Self {
        self.parse_motion = value;
        self
    }

    #[must_use]
    pub fn with_materials(mut self, value: bool) -> Self {
        self.load_materials = value;
        self
    }

    /// Set the texture folder; leading/trailing separators are ignored.
    #[must_use]
    pub fn with_texture_path(mut self, path: &str) -> Self {
        self.texture_path = crate::model::normalize_texture_path(path);
        self
    }

    #[must_use]
    pub fn with_verbose(mut self, value: bool) -> Self {
        self.verbose = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = DecodeOptions::default();
        assert!(!options.parse_bounding_boxes);
        assert!(options.load_materials);
        assert_eq!(options.texture_path, PathBuf::from("texture"));
    }

    #[test]
    fn test_builders() {
        let options = DecodeOptions::new()
            .with_bounding_boxes(true)
            .with_texture_path("\\texture\\001\\");
        assert!(options.parse_bounding_boxes);
        assert_eq!(options.texture_path, PathBuf::from("texture/001"));
        assert!(DecodeOptions::full().parse_face_anm);
    }
}
