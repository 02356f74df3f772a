//! Bone arena with a sparse stable-id lookup

use glam::Mat4;
use serde::Serialize;

/// A single armature bone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bone {
    /// Bone name from the string table
    pub name: String,
    /// Stable id used by vertex weights; `-1` marks a bone without one
    /// (roots and attachment points)
    pub bone_id: i32,
    /// Sequential number of the bone in the file, which is also its arena index
    pub index: usize,
    /// Arena index of the parent bone
    pub parent: Option<usize>,
    /// Transform relative to the parent
    pub local_transform: Mat4,
    /// Parent transform (or the axis conversion at a root) times `local_transform`
    pub transform: Mat4,
}

impl Bone {
    #[must_use]
    pub fn new(name: impl Into<String>, bone_id: i32, index: usize) -> Self {
        Self {
            name: name.into(),
            bone_id,
            index,
            parent: None,
            local_transform: Mat4::IDENTITY,
            transform: Mat4::IDENTITY,
        }
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Ordered bones plus an `id -> index` table.
///
/// The lookup table is sized to the declared bone count; after the armature
/// is read it is trimmed to the highest id that was actually assigned, and
/// dropped entirely when no bone carries an id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Bones {
    bones: Vec<Bone>,
    by_id: Option<Vec<Option<usize>>>,
}

impl Bones {
    /// Create an empty arena for `declared_count` bones.
    #[must_use]
    pub fn with_capacity(declared_count: usize) -> Self {
        Self {
            bones: Vec::with_capacity(declared_count),
            by_id: Some(vec![None; declared_count]),
        }
    }

    /// Append a bone, registering its id when it has one.
    ///
    /// Ids outside the declared range are kept on the bone but not indexed.
    pub fn push(&mut self, bone: Bone) {
        let arena_index = self.bones.len();
        if let (Ok(id), Some(by_id)) = (usize::try_from(bone.bone_id), self.by_id.as_mut()) {
            if id >= by_id.len() {
                tracing::warn!("bone {} has id {} beyond the declared count {}", bone.name, id, by_id.len());
            } else {
                by_id[id] = Some(arena_index);
            }
        }
        self.bones.push(bone);
    }

    /// Cut the id table down to the highest assigned id.
    pub fn trim(&mut self) {
        let Some(by_id) = self.by_id.as_mut() else {
            return;
        };
        match by_id.iter().rposition(Option::is_some) {
            Some(last) => by_id.truncate(last + 1),
            None => self.by_id = None,
        }
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    /// Look a bone up by its stable id.
    #[must_use]
    pub fn get_by_id(&self, bone_id: i32) -> Option<&Bone> {
        let id = usize::try_from(bone_id).ok()?;
        let index = (*self.by_id.as_ref()?.get(id)?)?;
        self.bones.get(index)
    }

    /// The id table, `None` once trimmed with no ids present.
    #[must_use]
    pub fn id_table(&self) -> Option<&[Option<usize>]> {
        self.by_id.as_deref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bone> {
        self.bones.iter()
    }

    /// Bones as a slice, in file order.
    #[must_use]
    pub fn as_slice(&self) -> &[Bone] {
        &self.bones
    }
}

impl<'a> IntoIterator for &'a Bones {
    type Item = &'a Bone;
    type IntoIter = std::slice::Iter<'a, Bone>;

    fn into_iter(self) -> Self::IntoIter {
        self.bones.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_indexes_by_id() {
        let mut bones = Bones::with_capacity(4);
        bones.push(Bone::new("root", -1, 0));
        bones.push(Bone::new("hip", 2, 1));
        bones.push(Bone::new("spine", 0, 2));

        assert_eq!(bones.len(), 3);
        assert_eq!(bones.get_by_id(2).unwrap().name, "hip");
        assert_eq!(bones.get_by_id(0).unwrap().name, "spine");
        assert!(bones.get_by_id(1).is_none());
        assert!(bones.get_by_id(-1).is_none());
    }

    #[test]
    fn test_trim_to_highest_assigned_id() {
        let mut bones = Bones::with_capacity(6);
        bones.push(Bone::new("a", 0, 0));
        bones.push(Bone::new("b", 2, 1));
        bones.trim();
        assert_eq!(bones.id_table().unwrap(), &[Some(0), None, Some(1)]);
    }

    #[test]
    fn test_trim_without_ids_drops_table() {
        let mut bones = Bones::with_capacity(2);
        bones.push(Bone::new("a", -1, 0));
        bones.push(Bone::new("b", -1, 1));
        bones.trim();
        assert!(bones.id_table().is_none());
        assert!(bones.get_by_id(0).is_none());
        assert_eq!(bones.len(), 2);
    }

    #[test]
    fn test_out_of_range_id_is_not_indexed() {
        let mut bones = Bones::with_capacity(1);
        bones.push(Bone::new("a", 5, 0));
        assert!(bones.get_by_id(5).is_none());
        assert_eq!(bones.get(0).unwrap().bone_id, 5);
    }
}
