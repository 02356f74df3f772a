//! Best-effort keyframe containers for armature animations
//!
//! The animation blocks are only partly understood. Frames are kept as raw
//! value lists; nothing here interprets them as rotations or translations.

use serde::Serialize;

/// One keyframe: a time stamp and the raw values stored with it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MotionFrame {
    pub frame_position: f32,
    pub data: Vec<f32>,
}

/// One animated channel of a bone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MotionType {
    pub frames: Vec<MotionFrame>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MotionBone {
    pub bone_name: String,
    pub motion_types: Vec<MotionType>,
}

/// Animation decoded from one animation section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Motion {
    pub name: String,
    pub duration: f32,
    pub bones: Vec<MotionBone>,
}

impl Motion {
    /// Total number of keyframes across all bones and channels.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.bones
            .iter()
            .flat_map(|b| &b.motion_types)
            .map(|t| t.frames.len())
            .sum()
    }
}
