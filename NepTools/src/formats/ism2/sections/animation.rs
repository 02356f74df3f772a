//! Armature animations (0x34), best effort
//!
//! Keyframes are kept as raw value lists. Only the two keyframe formats seen
//! so far are read; other formats and tags are narrated and skipped.

use super::{SectionContext, narrate};
use crate::error::Result;
use crate::formats::common::{ByteCursor, read_counted_table};
use crate::model::{Motion, MotionBone, MotionFrame, MotionType, SceneModel};

const SECTION_ANIMATIONS: u32 = 0x34;

const BLOCK_ANIMATION_BONE: u32 = 0x50;
const BLOCK_CHANNEL: u32 = 0x0F;
const BLOCK_KEYFRAMES: u32 = 0x44;

const FORMAT_F32: u16 = 0x0C;
const FORMAT_F16: u16 = 0x12;

pub(crate) fn decode_animations(
    cursor: &mut ByteCursor<'_>,
    offset: usize,
    ctx: &SectionContext<'_>,
    model: &mut SceneModel,
) -> Result<()> {
    cursor.goto(offset + 0x14)?;
    let duration = cursor.read_f32()?;
    let entries = read_counted_table(cursor, offset, 0x08, 0x20)?;
    narrate!(ctx, "Armature Animations @ {offset:#x}: {} bones, duration {duration}", entries.len());

    let mut motion = Motion {
        name: ctx.file_stem.clone(),
        duration,
        bones: Vec::with_capacity(entries.len()),
    };

    let mut result = Ok(());
    for &entry in &entries {
        let entry = entry as usize;
        match decode_animation_bone(cursor, entry, ctx, model) {
            Ok(Some(bone)) => motion.bones.push(bone),
            Ok(None) => {}
            Err(err) => {
                result = Err(err);
                break;
            }
        }
    }

    model.motions.push(motion);
    result
}

fn decode_animation_bone(
    cursor: &mut ByteCursor<'_>,
    at: usize,
    ctx: &SectionContext<'_>,
    model: &mut SceneModel,
) -> Result<Option<MotionBone>> {
    cursor.goto(at)?;
    let tag = cursor.read_u32()?;
    if tag != BLOCK_ANIMATION_BONE {
        narrate!(ctx, "  unknown animation entry {tag:#x} @ {at:#x}");
        return Ok(None);
    }

    cursor.goto(at + 0x0C)?;
    let bone_name = model.string(cursor.read_u32()?)?.to_string();
    let channels = read_counted_table(cursor, at, 0x08, 0x20)?;
    narrate!(ctx, "  Animation bone @ {at:#x}: {bone_name}, {} channels", channels.len());

    let mut bone = MotionBone {
        bone_name,
        motion_types: Vec::with_capacity(channels.len()),
    };
    for &channel in &channels {
        bone.motion_types.push(decode_channel(cursor, channel as usize, ctx, model)?);
    }
    Ok(Some(bone))
}

fn decode_channel(
    cursor: &mut ByteCursor<'_>,
    at: usize,
    ctx: &SectionContext<'_>,
    model: &mut SceneModel,
) -> Result<MotionType> {
    let mut motion_type = MotionType::default();

    cursor.goto(at)?;
    let tag = cursor.read_u32()?;
    if tag != BLOCK_CHANNEL {
        narrate!(ctx, "    unknown channel {tag:#x} @ {at:#x}");
        return Ok(motion_type);
    }
    cursor.goto(at + 0x28)?;
    let target = model.string(cursor.read_u32()?)?;
    narrate!(ctx, "    Channel @ {at:#x}: {target}");

    let keyframes = at + 0x40;
    cursor.goto(keyframes)?;
    let tag = cursor.read_u32()?;
    if tag != BLOCK_KEYFRAMES {
        narrate!(ctx, "      unknown keyframe block {tag:#x} @ {keyframes:#x}");
        return Ok(motion_type);
    }

    cursor.goto(keyframes + 0x08)?;
    let block_words = cursor.read_u32()? as usize;
    cursor.goto(keyframes + 0x10)?;
    let format = cursor.read_u16()?;
    cursor.goto(keyframes + 0x14)?;
    let entry_words = cursor.read_u32()? as usize;
    cursor.goto(keyframes + 0x20)?;

    if entry_words < 2 {
        model.diagnose(
            SECTION_ANIMATIONS,
            keyframes,
            format!("keyframe entry length {entry_words} is too short, channel skipped"),
        );
        return Ok(motion_type);
    }
    let frame_count = block_words / entry_words;
    let values = entry_words - 2;
    narrate!(ctx, "      {frame_count} frames, format {format:#x}, {entry_words} words each");

    match format {
        FORMAT_F32 => {
            for _ in 0..frame_count {
                let frame_position = cursor.read_f32()?;
                // two u16 keyframe flags
                cursor.seek(4)?;
                let data = (0..values).map(|_| cursor.read_f32()).collect::<Result<Vec<_>>>()?;
                motion_type.frames.push(MotionFrame { frame_position, data });
            }
        }
        FORMAT_F16 => {
            for _ in 0..frame_count {
                let frame_position = cursor.read_f16()?;
                cursor.seek(2)?;
                let data = (0..values).map(|_| cursor.read_f16()).collect::<Result<Vec<_>>>()?;
                motion_type.frames.push(MotionFrame { frame_position, data });
            }
        }
        other => narrate!(ctx, "      keyframe format {other:#x} not decoded"),
    }
    Ok(motion_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::common::Endianness;
    use crate::formats::ism2::DecodeOptions;
    use crate::formats::ism2::sections::test_support::{Blob, context};

    fn animation(format: u16) -> Vec<u8> {
        let mut blob = Blob::default();
        blob.u32(0x34).u32(0x20).u32(1).zeros(8).f32(2.5).zeros(8).u32(0x24);
        // bone 0x50 at 0x24: name id at +0x0C, channel table at +0x20
        blob.u32(0x50).u32(0x20).u32(1).u32(0).zeros(0x10).u32(0x48);
        // channel 0x0F at 0x48: target name at +0x28, keyframes at +0x40
        blob.u32(0x0F).zeros(0x24).u32(1).pad_to(0x48 + 0x40);
        // keyframes 0x44: 2 frames, entry length 4 words
        blob.u32(0x44).u32(0x20).u32(8).u32(0).u16(format).u16(0).u32(4).zeros(8);
        for time in [0.0, 1.0] {
            if format == FORMAT_F32 {
                blob.f32(time).u16(0).u16(0).f32(time * 2.0).f32(time * 3.0);
            } else {
                blob.f16(time).u16(0).f16(time * 2.0).f16(time * 3.0);
            }
        }
        blob.data
    }

    fn decode(data: &[u8]) -> SceneModel {
        let options = DecodeOptions::new().with_motion(true);
        let mut model = SceneModel::new("m");
        model.strings = vec!["Hips".to_string(), "rotate".to_string()];
        let mut cursor = ByteCursor::new(data, Endianness::Little);
        decode_animations(&mut cursor, 0, &context(&options), &mut model).unwrap();
        model
    }

    #[test]
    fn test_float_keyframes() {
        let model = decode(&animation(FORMAT_F32));
        let motion = &model.motions[0];
        assert_eq!(motion.name, "test");
        assert!((motion.duration - 2.5).abs() < f32::EPSILON);
        assert_eq!(motion.bones[0].bone_name, "Hips");
        let frames = &motion.bones[0].motion_types[0].frames;
        assert_eq!(frames.len(), 2);
        assert!((frames[1].frame_position - 1.0).abs() < f32::EPSILON);
        assert_eq!(frames[1].data, vec![2.0, 3.0]);
        assert_eq!(motion.frame_count(), 2);
    }

    #[test]
    fn test_half_keyframes() {
        let model = decode(&animation(FORMAT_F16));
        let frames = &model.motions[0].bones[0].motion_types[0].frames;
        assert_eq!(frames[1].data, vec![2.0, 3.0]);
    }
}
