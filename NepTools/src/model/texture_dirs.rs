//! Texture directory discovery
//!
//! Models keep their converted textures next to them, usually as
//! `texture/<variant>/<name>.png` with one variant folder per costume.
//! Maps and props drop the variant level and keep the PNGs directly in
//! `texture/`.

use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

/// Folder that holds the PNG textures of one model variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextureDirectory {
    /// Variant name (the folder name), `None` when textures sit directly in
    /// the texture root
    pub name: Option<String>,
    pub path: PathBuf,
}

impl TextureDirectory {
    /// Expected location of a texture referenced by a material.
    #[must_use]
    pub fn texture_path(&self, texture_name: &str) -> PathBuf {
        self.path.join(format!("{texture_name}.png"))
    }

    /// Whether the PNG for `texture_name` exists in this directory.
    #[must_use]
    pub fn contains(&self, texture_name: &str) -> bool {
        self.texture_path(texture_name).is_file()
    }
}

/// Trim separators and blanks a user may have typed around a texture path.
#[must_use]
pub fn normalize_texture_path(texture_path: &str) -> PathBuf {
    let trimmed = texture_path.trim_matches(|c: char| c == '/' || c == '\\' || c == ' ');
    PathBuf::from(trimmed.replace('\\', "/"))
}

/// Find the texture directories of a model.
///
/// Every immediate subdirectory of `model_dir/texture_path` becomes a named
/// variant. When there are none, the texture root itself is returned as a
/// single unnamed directory. A missing texture root yields an empty list.
#[must_use]
pub fn discover_texture_directories(model_dir: &Path, texture_path: &Path) -> Vec<TextureDirectory> {
    let root = model_dir.join(texture_path);
    if !root.is_dir() {
        tracing::debug!("no texture directory at {}", root.display());
        return Vec::new();
    }

    let mut variants: Vec<TextureDirectory> = WalkDir::new(&root)
        .follow_links(true)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.path().is_dir())
        .map(|e| TextureDirectory {
            name: Some(e.file_name().to_string_lossy().into_owned()),
            path: e.path().to_path_buf(),
        })
        .collect();

    if variants.is_empty() {
        return vec![TextureDirectory {
            name: None,
            path: root,
        }];
    }

    variants.sort_by(|a, b| a.path.cmp(&b.path));
    variants
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_variant_folders_become_named_directories() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("texture/002")).unwrap();
        std::fs::create_dir_all(dir.path().join("texture/001")).unwrap();
        std::fs::write(dir.path().join("texture/001/body_c.png"), b"png").unwrap();

        let found = discover_texture_directories(dir.path(), Path::new("texture"));
        let names: Vec<_> = found.iter().map(|d| d.name.clone().unwrap()).collect();
        assert_eq!(names, vec!["001", "002"]);
        assert!(found[0].contains("body_c"));
        assert!(!found[1].contains("body_c"));
    }

    #[test]
    fn test_flat_texture_root_is_unnamed() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("texture")).unwrap();
        let found = discover_texture_directories(dir.path(), Path::new("texture"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, None);
        assert_eq!(found[0].texture_path("a"), dir.path().join("texture").join("a.png"));
    }

    #[test]
    fn test_missing_root() {
        let dir = tempdir().unwrap();
        assert!(discover_texture_directories(dir.path(), Path::new("texture")).is_empty());
    }

    #[test]
    fn test_normalize_texture_path() {
        assert_eq!(normalize_texture_path("\\texture\\001\\ "), PathBuf::from("texture/001"));
        assert_eq!(normalize_texture_path("/"), PathBuf::from(""));
    }
}
