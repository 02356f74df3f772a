//! Engine-agnostic scene model produced by the ISM2 decoder
//!
//! A [`SceneModel`] is built once per file and handed whole to a consumer.
//! Everything that refers to a name does so through the string table, which
//! is why lookups go through [`SceneModel::string`] instead of indexing.

mod bones;
mod motion;
mod texture_dirs;
pub mod transform;
mod types;

use serde::Serialize;

use crate::error::{Error, Result};

pub use bones::{Bone, Bones};
pub use motion::{Motion, MotionBone, MotionFrame, MotionType};
pub use texture_dirs::{TextureDirectory, discover_texture_directories, normalize_texture_path};
pub use transform::{BoneTransformParts, coordinate_conversion};
pub use types::{
    BoneWeight, BoundingBox, Diagnostic, Face, FaceAnm, Material, Surface, Texture,
    TextureChannel, Vertex, truncate_weights,
};

/// Decoded ISM2 scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SceneModel {
    /// Display name: the surface-carrying bone's name, else the file stem
    pub name: String,
    /// Header version bytes, major first
    pub version: [u8; 4],
    pub strings: Vec<String>,
    pub textures: Vec<Texture>,
    pub texture_directories: Vec<TextureDirectory>,
    pub materials: Vec<Material>,
    pub surfaces: Vec<Surface>,
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
    /// Mesh-scoped bounding box
    pub bounding_box: Option<BoundingBox>,
    pub bones: Option<Bones>,
    pub motions: Vec<Motion>,
    pub face_anm: Option<FaceAnm>,
    /// Recoverable problems met while decoding
    pub diagnostics: Vec<Diagnostic>,
}

impl SceneModel {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Resolve a string id.
    ///
    /// # Errors
    /// Returns [`Error::InvalidStringId`] when `id` is past the table end.
    pub fn string(&self, id: u32) -> Result<&str> {
        self.strings
            .get(id as usize)
            .map(String::as_str)
            .ok_or(Error::InvalidStringId {
                id,
                count: self.strings.len(),
            })
    }

    /// Index of the first material called `name`.
    #[must_use]
    pub fn material_index_by_name(&self, name: &str) -> Option<usize> {
        self.materials.iter().position(|m| m.name == name)
    }

    /// Index of the first surface called `name`.
    #[must_use]
    pub fn surface_index_by_name(&self, name: &str) -> Option<usize> {
        self.surfaces.iter().position(|s| s.name == name)
    }

    /// Material used by a surface, if it resolved to one.
    #[must_use]
    pub fn surface_material(&self, surface_index: usize) -> Option<&Material> {
        let index = self.surfaces.get(surface_index)?.material_index?;
        self.materials.get(index)
    }

    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bones.as_ref().map_or(0, Bones::len)
    }

    /// Record a recoverable anomaly and log it.
    pub fn diagnose(&mut self, section_type: u32, offset: usize, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("section {section_type:#x} @ {offset:#x}: {message}");
        self.diagnostics.push(Diagnostic {
            section_type,
            offset,
            message,
        });
    }
}
