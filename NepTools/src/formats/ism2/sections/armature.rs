//! Armature (0x03): bones, their transforms and the surface list

use super::{SectionContext, narrate};
use crate::error::{Error, Result};
use crate::formats::common::{ByteCursor, read_counted_table, read_offset_table, visit_offsets};
use crate::model::transform::absolute_transform;
use crate::model::{Bone, BoneTransformParts, Bones, SceneModel, Surface};

const SECTION_ARMATURE: u32 = 0x03;

const ATTR_SURFACES: u32 = 0x4C;
const ATTR_SHAPE_KEYS: u32 = 0x4D;
const ATTR_TRANSFORMS: u32 = 0x5B;
const ATTR_CHILD_BONES: u32 = 0x5C;

const TRANSFORM_TRANSLATION: u32 = 0x14;
const TRANSFORM_MATRIX_X: u32 = 0x5D;
const TRANSFORM_MATRIX_Z: u32 = 0x5F;
const TRANSFORM_JOINT_ORIENT_X: u32 = 0x67;
const TRANSFORM_JOINT_ORIENT_Z: u32 = 0x69;

/// Offset of the sequential bone number inside a bone block.
const BONE_NUMBER_AT: usize = 0x34;

pub(crate) fn decode_armature(
    cursor: &mut ByteCursor<'_>,
    offset: usize,
    ctx: &SectionContext<'_>,
    model: &mut SceneModel,
) -> Result<()> {
    cursor.goto(offset + 0x04)?;
    let header_length = cursor.read_u32()? as usize;
    let bone_count = cursor.read_u32()?;
    cursor.goto(offset + header_length)?;
    let bone_offsets = read_offset_table(cursor, bone_count)?;
    narrate!(ctx, "Armature @ {offset:#x}: {bone_count} bones");

    let mut bones = Bones::with_capacity(bone_offsets.len());
    let mut result = Ok(());
    for &at in &bone_offsets {
        match decode_bone(cursor, at as usize, ctx, model, &bones) {
            Ok(bone) => bones.push(bone),
            Err(err) => {
                result = Err(err);
                break;
            }
        }
    }

    // Keep the bones read before a failure
    bones.trim();
    model.bones = Some(bones);
    result
}

fn decode_bone(
    cursor: &mut ByteCursor<'_>,
    at: usize,
    ctx: &SectionContext<'_>,
    model: &mut SceneModel,
    bones: &Bones,
) -> Result<Bone> {
    cursor.goto(at)?;
    let bone_type = cursor.read_u32()?;
    let header_length = cursor.read_u32()? as usize;
    let attribute_count = cursor.read_u32()?;
    let name = model.string(cursor.read_u32()?)?.to_string();

    cursor.goto(at + 0x1C)?;
    let parent_offset = cursor.read_i32()?;
    cursor.goto(at + 0x2C)?;
    let bone_id = cursor.read_i32()?;
    cursor.goto(at + BONE_NUMBER_AT)?;
    let bone_number = cursor.read_u32()? as usize;

    if bone_number != bones.len() {
        model.diagnose(
            SECTION_ARMATURE,
            at,
            format!("bone {name} is numbered {bone_number} but is entry {}", bones.len()),
        );
    }

    let mut bone = Bone::new(name, bone_id, bone_number);
    if parent_offset != 0 {
        let parent_at = usize::try_from(parent_offset).map_err(|_| Error::InvalidOffset {
            offset: i64::from(parent_offset),
            len: cursor.len(),
        })?;
        bone.parent = Some(cursor.peek_u32_at(parent_at + BONE_NUMBER_AT)? as usize);
    }

    narrate!(
        ctx,
        "  Bone {bone_number:>3} id={bone_id:>3} type={bone_type:#x} @ {at:#x} parent={:?} {}",
        bone.parent,
        bone.name
    );

    cursor.goto(at + header_length)?;
    let attributes = read_offset_table(cursor, attribute_count)?;

    let mut parts = BoneTransformParts::default();
    for &attribute in &attributes {
        let attribute = attribute as usize;
        cursor.goto(attribute)?;
        match cursor.read_u32()? {
            ATTR_TRANSFORMS => parts = read_transforms(cursor, attribute)?,
            ATTR_SURFACES => decode_surfaces(cursor, attribute, &bone.name, ctx, model)?,
            ATTR_SHAPE_KEYS => narrate!(ctx, "    shape keys @ {attribute:#x} (not decoded)"),
            ATTR_CHILD_BONES => narrate!(ctx, "    child bone list @ {attribute:#x} (not decoded)"),
            other => narrate!(ctx, "    unknown bone attribute {other:#x} @ {attribute:#x}"),
        }
    }

    bone.local_transform = parts.local_matrix();
    let parent_transform = match bone.parent {
        Some(parent) => match bones.get(parent) {
            Some(parent) => Some(parent.transform),
            None => {
                model.diagnose(
                    SECTION_ARMATURE,
                    at,
                    format!("bone {} refers to parent {parent} before it is defined", bone.name),
                );
                None
            }
        },
        None => None,
    };
    bone.transform = absolute_transform(parent_transform.as_ref(), &bone.local_transform);
    Ok(bone)
}

/// Gather translation and rotations from a transforms attribute.
///
/// Scale, collision and physics entries are skipped.
fn read_transforms(cursor: &mut ByteCursor<'_>, attribute: usize) -> Result<BoneTransformParts> {
    let offsets = read_counted_table(cursor, attribute, 0x08, 0x0C)?;
    let mut parts = BoneTransformParts::default();
    visit_offsets(cursor, &offsets, |cursor, _, _| {
        let kind = cursor.read_u32()?;
        cursor.seek(4)?;
        match kind {
            TRANSFORM_TRANSLATION => parts.translation = cursor.read_vec3()?,
            TRANSFORM_MATRIX_X..=TRANSFORM_MATRIX_Z => {
                parts.matrix[(kind - TRANSFORM_MATRIX_X) as usize] = read_axis_angle(cursor)?;
            }
            TRANSFORM_JOINT_ORIENT_X..=TRANSFORM_JOINT_ORIENT_Z => {
                parts.joint_orient[(kind - TRANSFORM_JOINT_ORIENT_X) as usize] = read_axis_angle(cursor)?;
            }
            _ => {}
        }
        Ok(())
    })?;
    Ok(parts)
}

/// Axis vector (ignored, the entry type already names the axis) and an angle
/// in degrees. Returns radians.
fn read_axis_angle(cursor: &mut ByteCursor<'_>) -> Result<f32> {
    cursor.seek(12)?;
    Ok(cursor.read_f32()?.to_radians())
}

fn decode_surfaces(
    cursor: &mut ByteCursor<'_>,
    attribute: usize,
    bone_name: &str,
    ctx: &SectionContext<'_>,
    model: &mut SceneModel,
) -> Result<()> {
    // The surface-carrying bone names the model
    model.name = bone_name.to_string();

    let offsets = read_counted_table(cursor, attribute, 0x08, 0x18)?;
    narrate!(ctx, "    {} surfaces @ {attribute:#x}", offsets.len());

    visit_offsets(cursor, &offsets, |cursor, index, at| {
        cursor.goto(at + 0x0C)?;
        let name = model.string(cursor.read_u32()?)?.to_string();
        let material_name = model.string(cursor.read_u32()?)?;
        let material_index = model.material_index_by_name(material_name);
        narrate!(ctx, "      Surface {index} @ {at:#x}: {name} material={material_name} ({material_index:?})");
        model.surfaces.push(Surface {
            name,
            material_index,
            bounding_box: None,
        });
        Ok(())
    })
}
