//! Geometry, material and bookkeeping types of a decoded scene

use serde::Serialize;

/// Texture channel a material binding feeds, selected by the filename suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TextureChannel {
    Diffuse,
    Specular,
    Emission,
    Normal,
    /// Mask texture whose channels encode tint regions ("M" maps)
    CyanGreen,
}

impl TextureChannel {
    /// Classify a texture filename by its trailing `_<letter>` suffix.
    ///
    /// `abc_c` is diffuse, `_s` specular, `_i` emission, `_n` normal and `_m`
    /// cyan-green. Case is ignored. Anything else returns `None`.
    #[must_use]
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, suffix) = filename.rsplit_once('_')?;
        let mut chars = suffix.chars();
        let letter = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        match letter.to_ascii_lowercase() {
            'c' => Some(TextureChannel::Diffuse),
            's' => Some(TextureChannel::Specular),
            'i' => Some(TextureChannel::Emission),
            'n' => Some(TextureChannel::Normal),
            'm' => Some(TextureChannel::CyanGreen),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TextureChannel::Diffuse => "diffuse",
            TextureChannel::Specular => "specular",
            TextureChannel::Emission => "emission",
            TextureChannel::Normal => "normal",
            TextureChannel::CyanGreen => "cyangreen",
        }
    }

    /// All channels in the order consumers usually wire them.
    pub const ALL: [TextureChannel; 5] = [
        TextureChannel::Diffuse,
        TextureChannel::Specular,
        TextureChannel::Emission,
        TextureChannel::Normal,
        TextureChannel::CyanGreen,
    ];
}

/// A material and the texture filename bound to each channel.
///
/// Filenames carry no extension; consumers look for `<name>.png` inside a
/// [`TextureDirectory`](super::TextureDirectory).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Material {
    pub name: String,
    pub diffuse: Option<String>,
    pub specular: Option<String>,
    pub emission: Option<String>,
    pub normal: Option<String>,
    pub cyangreen: Option<String>,
    /// Set once any face using this material references a vertex whose
    /// colour is not opaque white.
    pub enable_vertex_coloring: bool,
}

impl Material {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn texture(&self, channel: TextureChannel) -> Option<&str> {
        match channel {
            TextureChannel::Diffuse => self.diffuse.as_deref(),
            TextureChannel::Specular => self.specular.as_deref(),
            TextureChannel::Emission => self.emission.as_deref(),
            TextureChannel::Normal => self.normal.as_deref(),
            TextureChannel::CyanGreen => self.cyangreen.as_deref(),
        }
    }

    pub fn set_texture(&mut self, channel: TextureChannel, filename: String) {
        let slot = match channel {
            TextureChannel::Diffuse => &mut self.diffuse,
            TextureChannel::Specular => &mut self.specular,
            TextureChannel::Emission => &mut self.emission,
            TextureChannel::Normal => &mut self.normal,
            TextureChannel::CyanGreen => &mut self.cyangreen,
        };
        *slot = Some(filename);
    }
}

/// Informational texture record from the file's texture list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Texture {
    pub name: String,
    pub name2: String,
    pub path: String,
    pub filename: String,
}

/// Axis-aligned box in converted (Y-up) space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl BoundingBox {
    /// The eight corners, bottom face first.
    #[must_use]
    pub fn corners(&self) -> [[f32; 3]; 8] {
        let [x0, y0, z0] = self.min;
        let [x1, y1, z1] = self.max;
        [
            [x0, y0, z1],
            [x0, y0, z0],
            [x1, y0, z0],
            [x1, y0, z1],
            [x0, y1, z1],
            [x0, y1, z0],
            [x1, y1, z0],
            [x1, y1, z1],
        ]
    }

    /// The six faces as quads over [`corners`](Self::corners).
    #[must_use]
    pub fn quads() -> [[usize; 4]; 6] {
        [
            [0, 1, 2, 3],
            [3, 2, 6, 7],
            [7, 6, 5, 4],
            [4, 5, 1, 0],
            [4, 0, 3, 7],
            [1, 5, 6, 2],
        ]
    }
}

/// A named group of faces sharing one material.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Surface {
    pub name: String,
    /// Index into the material list, `None` when no material name matched
    pub material_index: Option<usize>,
    pub bounding_box: Option<BoundingBox>,
}

/// One skinning influence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoneWeight {
    pub bone_id: i32,
    pub weight: f32,
}

/// Build a weight list, stopping at the first weight that is not positive.
///
/// The remaining slots are padding; they are dropped, never reordered.
#[must_use]
pub fn truncate_weights(ids: &[i32], weights: &[f32]) -> Vec<BoneWeight> {
    ids.iter()
        .zip(weights)
        .take_while(|(_, w)| **w > 0.0)
        .map(|(&bone_id, &weight)| BoneWeight { bone_id, weight })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    /// Texture coordinate with V already flipped (`1 - v`)
    pub uv: [f32; 2],
    pub rgba: [f32; 4],
    pub bone_weights: Vec<BoneWeight>,
}

impl Vertex {
    /// True when the colour is anything but opaque white.
    #[must_use]
    pub fn has_custom_color(&self) -> bool {
        self.rgba.iter().any(|&c| c < 1.0)
    }
}

/// A triangle: three vertex indices and the surface it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Face {
    pub indices: [u32; 3],
    pub surface_index: usize,
}

/// Flat text dump of a face.anm sidecar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaceAnm {
    pub text: String,
}

impl FaceAnm {
    pub fn lines(&self) -> std::str::Lines<'_> {
        self.text.lines()
    }
}

/// A recoverable anomaly met while decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Type code of the section the anomaly belongs to
    pub section_type: u32,
    /// Absolute offset of the block that triggered it
    pub offset: usize,
    pub message: String,
}
