//! Hand-off of a decoded scene to a host mesh builder

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

use crate::error::Error;
use crate::model::{Bone, Face, Material, SceneModel, Vertex};

/// A triangle the host could not represent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("triangle {indices:?} rejected: {reason}")]
pub struct TriangleRejected {
    pub indices: [u32; 3],
    pub reason: String,
}

impl TriangleRejected {
    pub fn new(face: &Face, reason: impl Into<String>) -> Self {
        Self {
            indices: face.indices,
            reason: reason.into(),
        }
    }
}

/// Host side of an import.
///
/// [`submit_model`] calls `begin_model`, then every bone in arena order,
/// every material, every vertex, every triangle, and finally `finish_model`.
/// Bones arrive after their parents.
pub trait SceneConsumer {
    fn begin_model(&mut self, _model: &SceneModel) {}

    fn add_bone(&mut self, bone: &Bone);

    fn add_material(&mut self, index: usize, material: &Material);

    fn add_vertex(&mut self, index: usize, vertex: &Vertex);

    /// Add one triangle. `material` is the index of the owning surface's
    /// material, if it has one.
    fn add_triangle(&mut self, face: &Face, material: Option<usize>) -> Result<(), TriangleRejected>;

    fn finish_model(&mut self, _model: &SceneModel) {}
}

/// What happened to a model during submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub model_name: String,
    pub bones: usize,
    pub materials: usize,
    pub vertices: usize,
    pub triangles_submitted: usize,
    /// Triangles the consumer rejected
    pub triangles_skipped: usize,
    /// Triangles never offered because they name a vertex that does not exist
    pub triangles_invalid: usize,
    /// Decode diagnostics carried by the model
    pub diagnostics: usize,
}

/// Drive `consumer` through `model`.
///
/// Rejected and invalid triangles are counted and logged; they never stop the
/// rest of the model.
pub fn submit_model<C: SceneConsumer + ?Sized>(model: &SceneModel, consumer: &mut C) -> ImportReport {
    let mut report = ImportReport {
        model_name: model.name.clone(),
        diagnostics: model.diagnostics.len(),
        ..Default::default()
    };

    consumer.begin_model(model);

    if let Some(bones) = &model.bones {
        for bone in bones.iter() {
            consumer.add_bone(bone);
            report.bones += 1;
        }
    }

    for (index, material) in model.materials.iter().enumerate() {
        consumer.add_material(index, material);
        report.materials += 1;
    }

    for (index, vertex) in model.vertices.iter().enumerate() {
        consumer.add_vertex(index, vertex);
        report.vertices += 1;
    }

    let vertex_count = model.vertices.len();
    for face in &model.faces {
        if let Some(&index) = face.indices.iter().find(|&&i| i as usize >= vertex_count) {
            let err = Error::VertexIndexOutOfRange {
                index: index as usize,
                count: vertex_count,
            };
            tracing::warn!("{}: skipping triangle {:?}: {err}", model.name, face.indices);
            report.triangles_invalid += 1;
            continue;
        }

        let material = model
            .surfaces
            .get(face.surface_index)
            .and_then(|s| s.material_index);
        match consumer.add_triangle(face, material) {
            Ok(()) => report.triangles_submitted += 1,
            Err(rejected) => {
                tracing::debug!("{}: {rejected}", model.name);
                report.triangles_skipped += 1;
            }
        }
    }

    consumer.finish_model(model);

    if report.triangles_skipped > 0 || report.triangles_invalid > 0 {
        tracing::warn!(
            "{}: {} triangles skipped by the mesh builder, {} invalid",
            model.name,
            report.triangles_skipped,
            report.triangles_invalid
        );
    }
    report
}

/// Plain indexed mesh built from a scene.
///
/// Rejects the triangles a half-edge mesh cannot hold: degenerate ones that
/// repeat a vertex, and repeats of a triangle already added over the same
/// three vertices (including its flipped, double-sided twin).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndexedMesh {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub triangles: Vec<[u32; 3]>,
    /// Material index per triangle
    pub triangle_materials: Vec<Option<usize>>,
    pub bone_names: Vec<String>,
    pub material_names: Vec<String>,
    #[serde(skip)]
    seen: HashSet<[u32; 3]>,
}

impl IndexedMesh {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SceneConsumer for IndexedMesh {
    fn begin_model(&mut self, model: &SceneModel) {
        self.name.clone_from(&model.name);
    }

    fn add_bone(&mut self, bone: &Bone) {
        self.bone_names.push(bone.name.clone());
    }

    fn add_material(&mut self, _index: usize, material: &Material) {
        self.material_names.push(material.name.clone());
    }

    fn add_vertex(&mut self, _index: usize, vertex: &Vertex) {
        self.positions.push(vertex.position);
    }

    fn add_triangle(&mut self, face: &Face, material: Option<usize>) -> Result<(), TriangleRejected> {
        let [a, b, c] = face.indices;
        if a == b || b == c || a == c {
            return Err(TriangleRejected::new(face, "degenerate"));
        }
        let mut key = face.indices;
        key.sort_unstable();
        if !self.seen.insert(key) {
            return Err(TriangleRejected::new(face, "duplicate of an existing triangle"));
        }
        self.triangles.push(face.indices);
        self.triangle_materials.push(material);
        Ok(())
    }
}
