//! Header and section directory types for ISM2 files

use serde::Serialize;

use crate::formats::common::Endianness;

/// Type code of a top-level file section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SectionType {
    Armature,
    ObjectMesh,
    Strings,
    Textures,
    /// List of unknown records (`0x32`), only counted
    Unknown32,
    ArmatureAnimations,
    Materials,
    FxShaderNodes,
    Unknown(u32),
}

impl SectionType {
    #[must_use]
    pub fn from_code(code: u32) -> Self {
        match code {
            0x03 => SectionType::Armature,
            0x0B => SectionType::ObjectMesh,
            0x21 => SectionType::Strings,
            0x2E => SectionType::Textures,
            0x32 => SectionType::Unknown32,
            0x34 => SectionType::ArmatureAnimations,
            0x61 => SectionType::Materials,
            0x62 => SectionType::FxShaderNodes,
            other => SectionType::Unknown(other),
        }
    }

    #[must_use]
    pub fn code(&self) -> u32 {
        match self {
            SectionType::Armature => 0x03,
            SectionType::ObjectMesh => 0x0B,
            SectionType::Strings => 0x21,
            SectionType::Textures => 0x2E,
            SectionType::Unknown32 => 0x32,
            SectionType::ArmatureAnimations => 0x34,
            SectionType::Materials => 0x61,
            SectionType::FxShaderNodes => 0x62,
            SectionType::Unknown(code) => *code,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::Armature => "Armature",
            SectionType::ObjectMesh => "Object-Mesh",
            SectionType::Strings => "Strings",
            SectionType::Textures => "Textures",
            SectionType::Unknown32 => "Somethings",
            SectionType::ArmatureAnimations => "Armature Animations",
            SectionType::Materials => "Materials",
            SectionType::FxShaderNodes => "FX Shader Nodes",
            SectionType::Unknown(_) => "<not-implemented>",
        }
    }
}

/// One entry of the section directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionEntry {
    pub section_type: SectionType,
    /// Absolute offset of the section
    pub offset: usize,
}

/// Fixed ISM2 header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ism2Header {
    pub endian: Endianness,
    /// Version bytes, major first
    pub version: [u8; 4],
    /// File length as stored in the header
    pub file_length: u32,
    pub sections: Vec<SectionEntry>,
}

impl Ism2Header {
    /// Major version, which selects the bone-weight encodings.
    #[must_use]
    pub fn major_version(&self) -> u8 {
        self.version[0]
    }

    #[must_use]
    pub fn version_string(&self) -> String {
        let [a, b, c, d] = self.version;
        format!("{a}.{b}.{c}.{d}")
    }
}
