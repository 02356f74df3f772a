//! Texture list (0x2E), FX shader nodes (0x62) and the unknown list (0x32)
//!
//! None of these feed the geometry. The texture list names are not reliable
//! enough to bind materials (the material chain is used for that), so it is
//! kept for inspection only; the other two are only narrated.

use super::{SectionContext, narrate};
use crate::error::Result;
use crate::formats::common::{ByteCursor, read_counted_table, visit_offsets};
use crate::model::{SceneModel, Texture};

pub(crate) fn decode_textures(
    cursor: &mut ByteCursor<'_>,
    offset: usize,
    ctx: &SectionContext<'_>,
    model: &mut SceneModel,
) -> Result<()> {
    let offsets = read_counted_table(cursor, offset, 0x08, 0x0C)?;
    narrate!(ctx, "Texture List @ {offset:#x}: {} textures", offsets.len());

    visit_offsets(cursor, &offsets, |cursor, _, at| {
        // 0x2D block tag
        cursor.seek(4)?;
        let name = cursor.read_u32()?;
        let name2 = cursor.read_u32()?;
        let path = cursor.read_u32()?;
        let filename = cursor.read_u32()?;

        let texture = Texture {
            name: model.string(name)?.to_string(),
            name2: model.string(name2)?.to_string(),
            path: model.string(path)?.to_string(),
            filename: model.string(filename)?.to_string(),
        };
        narrate!(ctx, "  Texture @ {at:#x}: {} ({})", texture.name, texture.filename);
        model.textures.push(texture);
        Ok(())
    })
}

pub(crate) fn decode_fx_shader_nodes(
    cursor: &mut ByteCursor<'_>,
    offset: usize,
    ctx: &SectionContext<'_>,
    model: &SceneModel,
) -> Result<()> {
    let offsets = read_counted_table(cursor, offset, 0x08, 0x0C)?;
    narrate!(ctx, "FX Shader Nodes @ {offset:#x}: {} nodes", offsets.len());

    visit_offsets(cursor, &offsets, |cursor, _, at| {
        cursor.goto(at + 0x08)?;
        let property_count = cursor.read_u32()?;
        let name = model.string(cursor.read_u32()?)?;
        narrate!(ctx, "  FX Shader Node @ {at:#x}: {name} ({property_count} properties)");
        Ok(())
    })
}

pub(crate) fn decode_unknown_list(
    cursor: &mut ByteCursor<'_>,
    offset: usize,
    ctx: &SectionContext<'_>,
) -> Result<()> {
    cursor.goto(offset + 0x08)?;
    let count = cursor.read_u32()?;
    narrate!(ctx, "Section 0x32 @ {offset:#x}: {count} entries (not decoded)");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::formats::common::Endianness;
    use crate::formats::ism2::DecodeOptions;
    use crate::formats::ism2::sections::test_support::{Blob, context};

    fn model_with_strings() -> SceneModel {
        let mut model = SceneModel::new("m");
        model.strings = ["body", "body_2", "C:/tex/body.dds", "body_c"]
            .iter()
            .map(ToString::to_string)
            .collect();
        model
    }

    #[test]
    fn test_decode_textures() {
        let mut blob = Blob::default();
        blob.u32(0x2E).u32(0x10).u32(1).u32(0x10);
        blob.u32(0x2D).u32(0).u32(1).u32(2).u32(3).zeros(12);

        let options = DecodeOptions::new();
        let mut model = model_with_strings();
        let mut cursor = ByteCursor::new(&blob.data, Endianness::Little);
        decode_textures(&mut cursor, 0, &context(&options), &mut model).unwrap();

        assert_eq!(model.textures.len(), 1);
        assert_eq!(model.textures[0].name2, "body_2");
        assert_eq!(model.textures[0].filename, "body_c");
    }

    #[test]
    fn test_bad_string_id_in_texture_list() {
        let mut blob = Blob::default();
        blob.u32(0x2E).u32(0x10).u32(1).u32(0x10);
        blob.u32(0x2D).u32(0).u32(1).u32(2).u32(99);

        let options = DecodeOptions::new();
        let mut model = model_with_strings();
        let mut cursor = ByteCursor::new(&blob.data, Endianness::Little);
        let result = decode_textures(&mut cursor, 0, &context(&options), &mut model);
        assert!(matches!(result, Err(Error::InvalidStringId { id: 99, .. })));
        assert!(model.textures.is_empty());
    }
}
