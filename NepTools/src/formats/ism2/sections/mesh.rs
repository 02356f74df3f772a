//! Object-Mesh (0x0B)
//!
//! A mesh attribute (0x0A) lists vertex blocks (0x59), per-surface index
//! blocks (0x46) and an optional mesh bounding box (0x6E). Vertex blocks of
//! type 1 carry geometry; type 3 blocks carry skin weights for the vertices
//! of the type 1 block before them.

use super::{SectionContext, narrate};
use crate::error::{Error, Result};
use crate::formats::common::{ByteCursor, read_counted_table, read_offset_table, visit_offsets};
use crate::model::transform::convert_point;
use crate::model::{BoneWeight, BoundingBox, Face, SceneModel, Vertex, truncate_weights};

const SECTION_OBJECT_MESH: u32 = 0x0B;

const ATTR_MESH: u32 = 0x0A;
const BLOCK_FACE_LOOPS: u32 = 0x45;
const BLOCK_INDICES: u32 = 0x46;
const BLOCK_VERTICES: u32 = 0x59;
const BLOCK_BOUNDING_BOX: u32 = 0x6E;

const VERTEX_TYPE_GEOMETRY: u16 = 0x01;
const VERTEX_TYPE_WEIGHTS: u16 = 0x03;

/// Bytes a geometry vertex occupies before any stride padding.
const GEOMETRY_VERTEX_SIZE: usize = 0x20;

pub(crate) fn decode_object_mesh(
    cursor: &mut ByteCursor<'_>,
    offset: usize,
    ctx: &SectionContext<'_>,
    model: &mut SceneModel,
) -> Result<()> {
    cursor.goto(offset + 0x04)?;
    let header_length = cursor.read_u32()?;
    let attribute_count = cursor.read_u32()?;
    let attributes = read_offset_table(cursor, attribute_count)?;
    narrate!(ctx, "Object-Mesh @ {offset:#x}: header {header_length:#x}, {attribute_count} attributes");

    visit_offsets(cursor, &attributes, |cursor, _, at| match cursor.read_u32()? {
        ATTR_MESH => decode_mesh(cursor, at, ctx, model),
        other => {
            narrate!(ctx, "  unknown mesh attribute {other:#x} @ {at:#x}");
            Ok(())
        }
    })
}

fn decode_mesh(
    cursor: &mut ByteCursor<'_>,
    at: usize,
    ctx: &SectionContext<'_>,
    model: &mut SceneModel,
) -> Result<()> {
    let blocks = read_counted_table(cursor, at, 0x08, 0x20)?;
    narrate!(ctx, "  Mesh @ {at:#x}: {} blocks", blocks.len());

    // First vertex of the latest geometry block; weights attach from here
    let mut vertex_base = model.vertices.len();
    visit_offsets(cursor, &blocks, |cursor, _, block| {
        match cursor.read_u32()? {
            BLOCK_VERTICES => decode_vertices(cursor, block, ctx, model, &mut vertex_base)?,
            BLOCK_INDICES => decode_indices(cursor, block, ctx, model)?,
            BLOCK_BOUNDING_BOX => {
                if ctx.options.parse_bounding_boxes {
                    let bounding_box = read_bounding_box(cursor, block)?;
                    narrate!(ctx, "    mesh bounding box {:?} {:?}", bounding_box.min, bounding_box.max);
                    model.bounding_box = Some(bounding_box);
                }
            }
            other => narrate!(ctx, "    unknown mesh block {other:#x} @ {block:#x}"),
        }
        Ok(())
    })
}

fn decode_vertices(
    cursor: &mut ByteCursor<'_>,
    at: usize,
    ctx: &SectionContext<'_>,
    model: &mut SceneModel,
    vertex_base: &mut usize,
) -> Result<()> {
    cursor.goto(at + 0x08)?;
    let block_count = cursor.read_u32()?;
    let vertex_type = cursor.read_u16()?;
    cursor.seek(2)?;
    let vertex_count = cursor.read_u32()? as usize;
    let vertex_size = cursor.read_u32()? as usize;
    cursor.goto(at + 0x1C)?;
    let sub_block = cursor.read_u32()? as usize;
    cursor.goto(sub_block + 0x14)?;
    let data_at = cursor.read_u32()? as usize;
    narrate!(
        ctx,
        "    Vertices @ {at:#x}: type {vertex_type}, {vertex_count} x {vertex_size:#x} bytes, {block_count} blocks, data @ {data_at:#x}"
    );

    cursor.goto(data_at)?;
    let needed = vertex_count.saturating_mul(vertex_size);
    if needed > cursor.remaining() {
        return Err(Error::TruncatedInput {
            offset: data_at,
            requested: needed,
            available: cursor.remaining(),
        });
    }

    match vertex_type {
        VERTEX_TYPE_GEOMETRY => {
            if vertex_size < GEOMETRY_VERTEX_SIZE {
                model.diagnose(
                    SECTION_OBJECT_MESH,
                    at,
                    format!("geometry vertex size {vertex_size:#x} is too small, block skipped"),
                );
                return Ok(());
            }
            *vertex_base = model.vertices.len();
            model.vertices.reserve(vertex_count);
            for index in 0..vertex_count {
                cursor.goto(data_at + index * vertex_size)?;
                model.vertices.push(read_geometry_vertex(cursor)?);
            }
        }
        VERTEX_TYPE_WEIGHTS => {
            let Some(layout) = WeightLayout::select(ctx.major_version(), vertex_size) else {
                model.diagnose(
                    SECTION_OBJECT_MESH,
                    at,
                    format!(
                        "no weight layout for version {} and vertex size {vertex_size:#x}, block skipped",
                        ctx.major_version()
                    ),
                );
                return Ok(());
            };
            for index in 0..vertex_count {
                let weights = layout.read(cursor)?;
                match model.vertices.get_mut(*vertex_base + index) {
                    Some(vertex) => vertex.bone_weights = weights,
                    None => {
                        model.diagnose(
                            SECTION_OBJECT_MESH,
                            at,
                            format!(
                                "{} weight rows have no vertex",
                                vertex_count - index
                            ),
                        );
                        break;
                    }
                }
            }
        }
        other => model.diagnose(
            SECTION_OBJECT_MESH,
            at,
            format!("vertex type {other:#x} not implemented, block skipped"),
        ),
    }
    Ok(())
}

/// Position, normal, UV and colour of one vertex.
///
/// Layout: 3 x f32 position, 3 x f16 normal, f16 u, 3 x f16 secondary
/// normal (unused), f16 v, 4 x u8 colour.
fn read_geometry_vertex(cursor: &mut ByteCursor<'_>) -> Result<Vertex> {
    let position = convert_point(cursor.read_vec3()?);
    let normal = convert_point([cursor.read_f16()?, cursor.read_f16()?, cursor.read_f16()?]);
    let u = cursor.read_f16()?;
    cursor.seek(6)?;
    let v = 1.0 - cursor.read_f16()?;
    let rgba = [
        cursor.read_byte_as_unit_float()?,
        cursor.read_byte_as_unit_float()?,
        cursor.read_byte_as_unit_float()?,
        cursor.read_byte_as_unit_float()?,
    ];
    Ok(Vertex {
        position,
        normal,
        uv: [u, v],
        rgba,
        bone_weights: Vec::new(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoneIdWidth {
    U16,
    I8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WeightWidth {
    F32,
    F16,
}

/// Encoding of one skin-weight row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WeightLayout {
    ids: BoneIdWidth,
    weights: WeightWidth,
    influences: usize,
    padding: i64,
}

impl WeightLayout {
    const MAX_INFLUENCES: usize = 8;

    /// Pick the row encoding from the major version and the row size.
    fn select(major_version: u8, vertex_size: usize) -> Option<Self> {
        let (ids, weights, influences, padding) = match (major_version, vertex_size) {
            (2, 0x20) => (BoneIdWidth::U16, WeightWidth::F32, 4, 8),
            (2, 0x30) => (BoneIdWidth::U16, WeightWidth::F32, 8, 0),
            (1, 0x20) => (BoneIdWidth::I8, WeightWidth::F32, 4, 12),
            (1, 0x10) => (BoneIdWidth::I8, WeightWidth::F16, 4, 4),
            _ => return None,
        };
        Some(Self {
            ids,
            weights,
            influences,
            padding,
        })
    }

    fn read(&self, cursor: &mut ByteCursor<'_>) -> Result<Vec<BoneWeight>> {
        let mut ids = [0_i32; Self::MAX_INFLUENCES];
        let mut weights = [0_f32; Self::MAX_INFLUENCES];
        let n = self.influences;

        for id in &mut ids[..n] {
            *id = match self.ids {
                BoneIdWidth::U16 => i32::from(cursor.read_u16()?),
                BoneIdWidth::I8 => i32::from(cursor.read_i8()?),
            };
        }
        for weight in &mut weights[..n] {
            *weight = match self.weights {
                WeightWidth::F32 => cursor.read_f32()?,
                WeightWidth::F16 => cursor.read_f16()?,
            };
        }
        cursor.seek(self.padding)?;
        Ok(truncate_weights(&ids[..n], &weights[..n]))
    }
}

fn decode_indices(
    cursor: &mut ByteCursor<'_>,
    at: usize,
    ctx: &SectionContext<'_>,
    model: &mut SceneModel,
) -> Result<()> {
    cursor.goto(at + 0x08)?;
    let block_count = cursor.read_u32()?;
    let name = model.string(cursor.read_u32()?)?.to_string();
    cursor.goto(at + 0x18)?;
    let face_loop_count = cursor.read_u32()?;
    let blocks = read_offset_table(cursor, block_count)?;

    let surface_index = model.surface_index_by_name(&name).unwrap_or_else(|| {
        model.diagnose(
            SECTION_OBJECT_MESH,
            at,
            format!("indices name unknown surface {name:?}, using surface 0"),
        );
        0
    });
    narrate!(ctx, "    Indices @ {at:#x}: surface {name} ({surface_index}), {face_loop_count} face loops");

    visit_offsets(cursor, &blocks, |cursor, _, block| {
        match cursor.read_u32()? {
            BLOCK_FACE_LOOPS => decode_face_loops(cursor, block, surface_index, ctx, model)?,
            BLOCK_BOUNDING_BOX => {
                if ctx.options.parse_bounding_boxes {
                    let bounding_box = read_bounding_box(cursor, block)?;
                    narrate!(ctx, "      surface bounding box {:?} {:?}", bounding_box.min, bounding_box.max);
                    match model.surfaces.get_mut(surface_index) {
                        Some(surface) => surface.bounding_box = Some(bounding_box),
                        None => model.diagnose(
                            SECTION_OBJECT_MESH,
                            block,
                            "bounding box for a surface that does not exist, dropped",
                        ),
                    }
                }
            }
            other => narrate!(ctx, "      unknown surface block {other:#x} @ {block:#x}"),
        }
        Ok(())
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IndexWidth {
    U16,
    U32,
}

impl IndexWidth {
    fn size(self) -> usize {
        match self {
            IndexWidth::U16 => 2,
            IndexWidth::U32 => 4,
        }
    }

    fn read(self, cursor: &mut ByteCursor<'_>) -> Result<u32> {
        match self {
            IndexWidth::U16 => cursor.read_u16().map(u32::from),
            IndexWidth::U32 => cursor.read_u32(),
        }
    }
}

fn decode_face_loops(
    cursor: &mut ByteCursor<'_>,
    at: usize,
    surface_index: usize,
    ctx: &SectionContext<'_>,
    model: &mut SceneModel,
) -> Result<()> {
    cursor.goto(at + 0x08)?;
    let index_count = cursor.read_u32()? as usize;
    let tag = cursor.read_u16()?;
    let tag2 = cursor.read_u16()?;
    cursor.goto(at + 0x14)?;

    let width = match tag {
        0x05 => IndexWidth::U16,
        0x07 => IndexWidth::U32,
        other => {
            model.diagnose(
                SECTION_OBJECT_MESH,
                at,
                format!("face loop tag {other:#x} unknown, reading 32-bit indices"),
            );
            IndexWidth::U32
        }
    };

    let triangle_count = index_count / 3;
    let needed = triangle_count.saturating_mul(3 * width.size());
    if needed > cursor.remaining() {
        return Err(Error::TruncatedInput {
            offset: cursor.position(),
            requested: needed,
            available: cursor.remaining(),
        });
    }
    narrate!(ctx, "      Face loops @ {at:#x}: {triangle_count} triangles ({width:?}, {tag2:#x})");

    let mut coloured = false;
    model.faces.reserve(triangle_count);
    for _ in 0..triangle_count {
        let indices = [width.read(cursor)?, width.read(cursor)?, width.read(cursor)?];
        coloured |= indices
            .iter()
            .any(|&i| model.vertices.get(i as usize).is_some_and(Vertex::has_custom_color));
        model.faces.push(Face {
            indices,
            surface_index,
        });
    }

    if coloured {
        let material = model
            .surfaces
            .get(surface_index)
            .and_then(|s| s.material_index)
            .and_then(|m| model.materials.get_mut(m));
        if let Some(material) = material {
            material.enable_vertex_coloring = true;
        }
    }
    Ok(())
}

/// Bounding box block: min at +0x10, max at +0x20, both axis-converted.
fn read_bounding_box(cursor: &mut ByteCursor<'_>, at: usize) -> Result<BoundingBox> {
    cursor.goto(at + 0x10)?;
    let min = convert_point(cursor.read_vec3()?);
    cursor.goto(at + 0x20)?;
    let max = convert_point(cursor.read_vec3()?);
    Ok(BoundingBox { min, max })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::common::Endianness;
    use crate::formats::ism2::DecodeOptions;
    use crate::formats::ism2::sections::test_support::{Blob, context};
    use crate::model::{Material, Surface};
    use pretty_assertions::assert_eq;

    fn model() -> SceneModel {
        let mut model = SceneModel::new("m");
        model.strings = vec!["body".to_string(), "hair".to_string()];
        model.materials.push(Material::new("skin"));
        model.surfaces.push(Surface {
            name: "body".to_string(),
            material_index: Some(0),
            bounding_box: None,
        });
        model
    }

    /// Vertex block header at the current position; returns its offset.
    fn vertex_block(blob: &mut Blob, vertex_type: u16, count: u32, size: u32) -> u32 {
        let start = blob.pos();
        blob.u32(0x59).u32(0x20).u32(1).u16(vertex_type).u16(0).u32(count).u32(size).u32(0);
        blob.u32(start + 0x20);
        blob.pad_to(start + 0x20);
        // sub block: data pointer at +0x14
        blob.zeros(0x14).u32(start + 0x38);
        start
    }

    fn geometry_vertex(blob: &mut Blob, position: [f32; 3], v: f32, rgba: [u8; 4]) {
        blob.f32(position[0]).f32(position[1]).f32(position[2]);
        blob.f16(0.0).f16(0.0).f16(1.0);
        blob.f16(0.5).zeros(6).f16(v);
        blob.bytes(&rgba);
    }

    fn indices_block(blob: &mut Blob, name_id: u32, tag: u16, indices: &[u32]) -> u32 {
        let start = blob.pos();
        blob.u32(0x46).u32(0x20).u32(1).u32(name_id).u32(0).u16(0).u16(0);
        blob.u32(u32::try_from(indices.len()).unwrap()).u32(start + 0x20);
        // face loops 0x45
        let count = u32::try_from(indices.len()).unwrap();
        blob.u32(0x45).u32(0).u32(count).u16(tag).u16(0).u32(0);
        for &i in indices {
            if tag == 0x05 {
                blob.u16(u16::try_from(i).unwrap());
            } else {
                blob.u32(i);
            }
        }
        start
    }

    /// Object-Mesh with a single mesh attribute listing `blocks`.
    fn object_mesh(build: impl FnOnce(&mut Blob) -> Vec<u32>) -> Vec<u8> {
        let mut blob = Blob::default();
        blob.u32(0x0B).u32(0x10).u32(1).u32(0x10);
        // mesh attribute at 0x10, block table at +0x20, room for 8 entries
        blob.u32(0x0A).u32(0x20).u32(0).zeros(0x14).zeros(0x20);
        let blocks = build(&mut blob);
        blob.patch_u32(0x18, u32::try_from(blocks.len()).unwrap());
        for (i, &b) in blocks.iter().enumerate() {
            blob.patch_u32(0x30 + u32::try_from(i).unwrap() * 4, b);
        }
        blob.data
    }

    fn decode(data: &[u8], options: &DecodeOptions, version: u8) -> (SceneModel, Result<()>) {
        let mut model = model();
        let mut ctx = context(options);
        ctx.version = [version, 0, 0, 0];
        let mut cursor = ByteCursor::new(data, Endianness::Little);
        let result = decode_object_mesh(&mut cursor, 0, &ctx, &mut model);
        (model, result)
    }

    fn triangle(blob: &mut Blob, colour: [u8; 4]) -> Vec<u32> {
        let vertices = vertex_block(blob, 1, 3, 0x20);
        geometry_vertex(blob, [0.0, 0.0, 0.0], 0.25, [255; 4]);
        geometry_vertex(blob, [1.0, 0.0, 0.0], 0.25, [255; 4]);
        geometry_vertex(blob, [0.0, 0.0, 1.0], 0.25, colour);
        let indices = indices_block(blob, 0, 0x05, &[0, 1, 2]);
        vec![vertices, indices]
    }

    #[test]
    fn test_triangle() {
        let data = object_mesh(|blob| triangle(blob, [255; 4]));
        let (model, result) = decode(&data, &DecodeOptions::new(), 2);
        result.unwrap();

        assert_eq!(model.vertices.len(), 3);
        assert_eq!(model.faces, vec![Face { indices: [0, 1, 2], surface_index: 0 }]);
        // z-up to y-up: (0, 0, 1) becomes (0, -1, 0)
        let converted = model.vertices[2].position;
        assert!((converted[1] + 1.0).abs() < 1e-6 && converted[2].abs() < 1e-6);
        assert!(!model.materials[0].enable_vertex_coloring);
    }

    #[test]
    fn test_v_is_flipped() {
        let data = object_mesh(|blob| triangle(blob, [255; 4]));
        let (model, _) = decode(&data, &DecodeOptions::new(), 2);
        assert_eq!(model.vertices[0].uv, [0.5, 0.75]);
    }

    #[test]
    fn test_vertex_colour_enables_material_flag() {
        let data = object_mesh(|blob| triangle(blob, [255, 0, 0, 255]));
        let (model, _) = decode(&data, &DecodeOptions::new(), 2);
        assert!(model.materials[0].enable_vertex_coloring);
    }

    #[test]
    fn test_weights_truncate_at_first_empty_slot() {
        let data = object_mesh(|blob| {
            let mut blocks = triangle(blob, [255; 4]);
            let weights = vertex_block(blob, 3, 3, 0x20);
            for _ in 0..3 {
                blob.u16(4).u16(7).u16(9).u16(0);
                blob.f32(0.6).f32(0.4).f32(0.0).f32(0.3).zeros(8);
            }
            blocks.push(weights);
            blocks
        });
        let (model, result) = decode(&data, &DecodeOptions::new(), 2);
        result.unwrap();
        assert_eq!(
            model.vertices[1].bone_weights,
            vec![
                BoneWeight { bone_id: 4, weight: 0.6 },
                BoneWeight { bone_id: 7, weight: 0.4 },
            ]
        );
    }

    #[test]
    fn test_unknown_weight_layout_is_reported() {
        let data = object_mesh(|blob| {
            let mut blocks = triangle(blob, [255; 4]);
            let weights = vertex_block(blob, 3, 1, 0x18);
            blob.zeros(0x18);
            blocks.push(weights);
            blocks
        });
        let (model, result) = decode(&data, &DecodeOptions::new(), 2);
        result.unwrap();
        assert!(model.vertices.iter().all(|v| v.bone_weights.is_empty()));
        assert_eq!(model.diagnostics.len(), 1);
    }

    #[test]
    fn test_unknown_surface_defaults_to_first() {
        let data = object_mesh(|blob| {
            let vertices = vertex_block(blob, 1, 3, 0x20);
            for _ in 0..3 {
                geometry_vertex(blob, [0.0; 3], 0.0, [255; 4]);
            }
            vec![vertices, indices_block(blob, 1, 0x07, &[2, 1, 0])]
        });
        let (model, _) = decode(&data, &DecodeOptions::new(), 1);
        assert_eq!(model.faces[0].indices, [2, 1, 0]);
        assert_eq!(model.faces[0].surface_index, 0);
        assert_eq!(model.diagnostics.len(), 1);
    }

    #[test]
    fn test_bounding_box_only_when_requested() {
        let build = |blob: &mut Blob| {
            let start = blob.pos();
            blob.u32(0x6E).u32(0x30).zeros(8);
            blob.f32(-1.0).f32(-2.0).f32(-3.0).zeros(4);
            blob.f32(1.0).f32(2.0).f32(3.0).zeros(4);
            vec![start]
        };
        let (model, _) = decode(&object_mesh(build), &DecodeOptions::new(), 2);
        assert!(model.bounding_box.is_none());

        let options = DecodeOptions::new().with_bounding_boxes(true);
        let (model, _) = decode(&object_mesh(build), &options, 2);
        let bounding_box = model.bounding_box.unwrap();
        assert!((bounding_box.min[1] - 3.0).abs() < 1e-6);
        assert!((bounding_box.max[2] - 2.0).abs() < 1e-6);
    }
}
