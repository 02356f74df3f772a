//! Material list (0x61)
//!
//! Each material points at a texture list (0x6C) whose entries are texture
//! bindings (0x6A). A binding reaches its texture filename through three more
//! hops:
//!
//! ```text
//! binding +0x14 -> sampler (0x6B) +0x18 -> sampler ref (0x6B) +0x18 -> filename record
//! ```
//!
//! The filename record starts with the string id of the texture filename.

use super::{SectionContext, narrate};
use crate::error::Result;
use crate::formats::common::{ByteCursor, read_counted_table};
use crate::model::{Material, SceneModel, TextureChannel};

const SECTION_MATERIALS: u32 = 0x61;

/// Kind string that marks a binding worth following.
const TEXTURE_BINDING_KIND: &str = "texture";

pub(crate) fn decode_materials(
    cursor: &mut ByteCursor<'_>,
    offset: usize,
    ctx: &SectionContext<'_>,
    model: &mut SceneModel,
) -> Result<()> {
    let offsets = read_counted_table(cursor, offset, 0x08, 0x0C)?;
    narrate!(ctx, "Material List @ {offset:#x}: {} materials", offsets.len());

    for (index, &at) in offsets.iter().enumerate() {
        let at = at as usize;
        let mut material = None;
        if let Err(err) = decode_material(cursor, at, ctx, model, &mut material) {
            model.diagnose(SECTION_MATERIALS, at, format!("material {index}: {err}"));
        }
        if let Some(material) = material {
            narrate!(
                ctx,
                "  Material {index} @ {at:#x}: {} diffuse={:?}",
                material.name,
                material.diffuse
            );
            model.materials.push(material);
        }
    }
    Ok(())
}

/// Decode one material into `slot`.
///
/// The material lands in `slot` as soon as its name is known, so a failure
/// further down the chain still leaves the channels resolved so far.
fn decode_material(
    cursor: &mut ByteCursor<'_>,
    at: usize,
    ctx: &SectionContext<'_>,
    model: &mut SceneModel,
    slot: &mut Option<Material>,
) -> Result<()> {
    cursor.goto(at + 0x08)?;
    let sub_material_count = cursor.read_u32()?;
    let name = model.string(cursor.read_u32()?)?.to_string();
    let material = slot.insert(Material::new(name));

    cursor.goto(at + 0x1C)?;
    let texture_list = cursor.read_u32()? as usize;
    let bindings = read_counted_table(cursor, texture_list, 0x08, 0x0C)?;
    narrate!(
        ctx,
        "    {} sub-materials, {} bindings @ {texture_list:#x}",
        sub_material_count,
        bindings.len()
    );

    let mut tagged = Vec::new();
    for &binding in &bindings {
        let binding = binding as usize;
        if binding_kind(cursor, binding, model).is_some_and(|k| k.eq_ignore_ascii_case(TEXTURE_BINDING_KIND)) {
            tagged.push(binding);
        }
    }

    // Older files carry a single untagged diffuse binding.
    if tagged.is_empty() {
        if let Some(&first) = bindings.first() {
            let filename = binding_filename(cursor, first as usize, model)?;
            let channel = TextureChannel::from_filename(&filename).unwrap_or(TextureChannel::Diffuse);
            material.set_texture(channel, filename);
        }
        return Ok(());
    }

    for binding in tagged {
        let filename = binding_filename(cursor, binding, model)?;
        match TextureChannel::from_filename(&filename) {
            Some(channel) => {
                narrate!(ctx, "    {} texture: {filename}", channel.as_str());
                material.set_texture(channel, filename);
            }
            None => model.diagnose(
                SECTION_MATERIALS,
                binding,
                format!("texture {filename:?} has no known channel suffix, dropped"),
            ),
        }
    }
    Ok(())
}

/// Kind string of a binding, `None` when the slot does not hold a valid id.
fn binding_kind<'m>(cursor: &ByteCursor<'_>, binding: usize, model: &'m SceneModel) -> Option<&'m str> {
    let id = cursor.peek_u32_at(binding + 0x0C).ok()?;
    model.string(id).ok()
}

fn binding_filename(cursor: &mut ByteCursor<'_>, binding: usize, model: &SceneModel) -> Result<String> {
    cursor.goto(binding + 0x14)?;
    let sampler = cursor.read_u32()? as usize;
    cursor.goto(sampler + 0x18)?;
    let sampler_ref = cursor.read_u32()? as usize;
    cursor.goto(sampler_ref + 0x18)?;
    let record = cursor.read_u32()? as usize;
    cursor.goto(record)?;
    Ok(model.string(cursor.read_u32()?)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::common::Endianness;
    use crate::formats::ism2::DecodeOptions;
    use crate::formats::ism2::sections::test_support::{Blob, context};

    const STRINGS: [&str; 6] = ["skin", "texture", "sampler", "body_c", "body_n", "body_x"];

    fn model() -> SceneModel {
        let mut model = SceneModel::new("m");
        model.strings = STRINGS.iter().map(ToString::to_string).collect();
        model
    }

    /// Append a binding chain ending in `filename_id` and return the binding offset.
    fn binding(blob: &mut Blob, kind_id: u32, filename_id: u32) -> u32 {
        let start = blob.pos();
        // binding 0x6A
        blob.u32(0x6A).u32(0x18).u32(0).u32(kind_id).u32(0).u32(start + 0x18);
        // sampler 0x6B
        let sampler = blob.pos();
        blob.u32(0x6B).zeros(0x14).u32(sampler + 0x1C);
        // sampler reference 0x6B
        let sampler_ref = blob.pos();
        blob.u32(0x6B).zeros(0x14).u32(sampler_ref + 0x1C);
        // filename record
        blob.u32(filename_id);
        start
    }

    /// Section with one material whose texture list holds `bindings`.
    fn material_section(bindings: &[(u32, u32)]) -> Vec<u8> {
        let mut blob = Blob::default();
        blob.u32(0x61).u32(0x10).u32(1).u32(0x10);
        // material 0x0D at 0x10
        blob.u32(0x0D).u32(0x20).u32(1).u32(0).zeros(0x0C).u32(0x30);
        // texture list 0x6C at 0x30
        let count = u32::try_from(bindings.len()).unwrap();
        blob.u32(0x6C).u32(0x0C).u32(count);
        let table = blob.pos();
        blob.zeros(bindings.len() * 4);
        for (i, &(kind, filename)) in bindings.iter().enumerate() {
            let at = binding(&mut blob, kind, filename);
            blob.patch_u32(table + u32::try_from(i).unwrap() * 4, at);
        }
        blob.data
    }

    fn decode(data: &[u8]) -> SceneModel {
        let options = DecodeOptions::new();
        let mut model = model();
        let mut cursor = ByteCursor::new(data, Endianness::Little);
        decode_materials(&mut cursor, 0, &context(&options), &mut model).unwrap();
        model
    }

    #[test]
    fn test_texture_bindings_fill_channels() {
        let model = decode(&material_section(&[(1, 3), (2, 5), (1, 4)]));
        assert_eq!(model.materials.len(), 1);
        let skin = &model.materials[0];
        assert_eq!(skin.name, "skin");
        assert_eq!(skin.diffuse.as_deref(), Some("body_c"));
        assert_eq!(skin.normal.as_deref(), Some("body_n"));
        assert!(model.diagnostics.is_empty());
    }

    #[test]
    fn test_untagged_first_binding_is_diffuse() {
        let model = decode(&material_section(&[(2, 5)]));
        assert_eq!(model.materials[0].diffuse.as_deref(), Some("body_x"));
    }

    #[test]
    fn test_unknown_suffix_is_reported() {
        let model = decode(&material_section(&[(1, 5)]));
        assert_eq!(model.materials[0].diffuse, None);
        assert_eq!(model.diagnostics.len(), 1);
    }

    #[test]
    fn test_bad_material_offset_is_isolated() {
        let mut data = material_section(&[(1, 3)]);
        data[0x0C..0x10].copy_from_slice(&0xFFFF_u32.to_le_bytes());
        let model = decode(&data);
        assert!(model.materials.is_empty());
        assert_eq!(model.diagnostics.len(), 1);
        assert_eq!(model.diagnostics[0].section_type, 0x61);
    }
}
