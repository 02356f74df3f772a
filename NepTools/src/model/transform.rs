//! Bone transform composition and the source-to-consumer axis conversion

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec3};

/// +90 degrees about X: converts the file's Z-up convention to Y-up.
#[must_use]
pub fn coordinate_conversion() -> Mat4 {
    Mat4::from_rotation_x(FRAC_PI_2)
}

/// Apply the axis conversion to a point.
#[must_use]
pub fn convert_point(point: [f32; 3]) -> [f32; 3] {
    coordinate_conversion()
        .transform_point3(Vec3::from_array(point))
        .to_array()
}

/// Raw transform fields gathered from a bone's transforms attribute.
///
/// Angles are in radians. `matrix` holds the "Matrix X/Y/Z" rotations and
/// `joint_orient` the "Joint Orient X/Y/Z" rotations.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoneTransformParts {
    pub translation: [f32; 3],
    pub matrix: [f32; 3],
    pub joint_orient: [f32; 3],
}

impl BoneTransformParts {
    /// Compose the local transform.
    ///
    /// `Rz(matrix.z) * Ry(matrix.y) * Rx(matrix.x) * Rz(joint.z) * Ry(joint.y) * Rx(joint.x)`,
    /// then the translation is written straight into the translation column.
    /// Axes with an angle of exactly zero are skipped.
    #[must_use]
    pub fn local_matrix(&self) -> Mat4 {
        let steps: [(f32, fn(f32) -> Mat4); 6] = [
            (self.matrix[2], Mat4::from_rotation_z),
            (self.matrix[1], Mat4::from_rotation_y),
            (self.matrix[0], Mat4::from_rotation_x),
            (self.joint_orient[2], Mat4::from_rotation_z),
            (self.joint_orient[1], Mat4::from_rotation_y),
            (self.joint_orient[0], Mat4::from_rotation_x),
        ];

        let mut local = Mat4::IDENTITY;
        for (angle, rotation) in steps {
            if angle != 0.0 {
                local *= rotation(angle);
            }
        }
        local.w_axis = Vec3::from_array(self.translation).extend(1.0);
        local
    }
}

/// Absolute transform of a bone: `parent * local`, or `conversion * local` at a root.
#[must_use]
pub fn absolute_transform(parent: Option<&Mat4>, local: &Mat4) -> Mat4 {
    match parent {
        Some(parent) => *parent * *local,
        None => coordinate_conversion() * *local,
    }
}
