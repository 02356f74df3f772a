//! Per-section decoders
//!
//! Each decoder gets the cursor, the section's absolute offset and the model
//! it contributes to. Decoders write into the model as they go, so a decoder
//! that fails halfway leaves whatever it already added.

/// Section-by-section narrative, only emitted when the caller asked for it.
macro_rules! narrate {
    ($ctx:expr, $($arg:tt)*) => {
        if $ctx.options.verbose {
            tracing::debug!($($arg)*);
        }
    };
}

pub(crate) use narrate;

mod animation;
mod armature;
mod materials;
mod mesh;
mod strings;
mod textures;

use super::options::DecodeOptions;
use super::types::{SectionEntry, SectionType};
use crate::error::Result;
use crate::formats::common::ByteCursor;
use crate::model::SceneModel;

pub(crate) use strings::decode_strings;

/// State shared by every section decoder of one file.
pub(crate) struct SectionContext<'o> {
    /// Header version bytes, major first
    pub version: [u8; 4],
    pub options: &'o DecodeOptions,
    /// File name without extension, used to name motions
    pub file_stem: String,
}

impl SectionContext<'_> {
    pub fn major_version(&self) -> u8 {
        self.version[0]
    }
}

/// Decode one non-string section into the model.
///
/// Strings are read up front by the reader and skipped here.
pub(crate) fn decode_section(
    cursor: &mut ByteCursor<'_>,
    entry: &SectionEntry,
    ctx: &SectionContext<'_>,
    model: &mut SceneModel,
) -> Result<()> {
    let offset = entry.offset;
    match entry.section_type {
        SectionType::Strings => Ok(()),
        SectionType::Textures => {
            if ctx.options.load_materials {
                textures::decode_textures(cursor, offset, ctx, model)?;
            }
            Ok(())
        }
        SectionType::FxShaderNodes => {
            if ctx.options.load_materials {
                textures::decode_fx_shader_nodes(cursor, offset, ctx, model)?;
            }
            Ok(())
        }
        SectionType::Unknown32 => textures::decode_unknown_list(cursor, offset, ctx),
        SectionType::Materials => {
            if ctx.options.load_materials {
                materials::decode_materials(cursor, offset, ctx, model)?;
            }
            Ok(())
        }
        SectionType::Armature => armature::decode_armature(cursor, offset, ctx, model),
        SectionType::ObjectMesh => mesh::decode_object_mesh(cursor, offset, ctx, model),
        SectionType::ArmatureAnimations => {
            if ctx.options.parse_motion {
                animation::decode_animations(cursor, offset, ctx, model)?;
            }
            Ok(())
        }
        SectionType::Unknown(code) => {
            model.diagnose(code, offset, "section type not implemented, skipped");
            Ok(())
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Little-endian block builder shared by the section tests.

    use byteorder::{LittleEndian, WriteBytesExt};

    use super::SectionContext;
    use crate::formats::ism2::DecodeOptions;

    pub fn context(options: &DecodeOptions) -> SectionContext<'_> {
        SectionContext {
            version: [2, 0, 0, 0],
            options,
            file_stem: "test".to_string(),
        }
    }

    /// Growable buffer with absolute-offset patching.
    #[derive(Default)]
    pub struct Blob {
        pub data: Vec<u8>,
    }

    impl Blob {
        pub fn pos(&self) -> u32 {
            u32::try_from(self.data.len()).unwrap()
        }

        pub fn u32(&mut self, value: u32) -> &mut Self {
            self.data.write_u32::<LittleEndian>(value).unwrap();
            self
        }

        pub fn i32(&mut self, value: i32) -> &mut Self {
            self.data.write_i32::<LittleEndian>(value).unwrap();
            self
        }

        pub fn u16(&mut self, value: u16) -> &mut Self {
            self.data.write_u16::<LittleEndian>(value).unwrap();
            self
        }

        pub fn f32(&mut self, value: f32) -> &mut Self {
            self.data.write_f32::<LittleEndian>(value).unwrap();
            self
        }

        pub fn f16(&mut self, value: f32) -> &mut Self {
            self.u16(half::f16::from_f32(value).to_bits())
        }

        pub fn bytes(&mut self, bytes: &[u8]) -> &mut Self {
            self.data.extend_from_slice(bytes);
            self
        }

        pub fn zeros(&mut self, count: usize) -> &mut Self {
            self.data.resize(self.data.len() + count, 0);
            self
        }

        /// Pad with zeros up to the absolute position `to`.
        pub fn pad_to(&mut self, to: u32) -> &mut Self {
            self.data.resize(to as usize, 0);
            self
        }

        pub fn patch_u32(&mut self, at: u32, value: u32) {
            let at = at as usize;
            self.data[at..at + 4].copy_from_slice(&value.to_le_bytes());
        }
    }
}
