//! ARC descriptor and progress types

use std::path::PathBuf;

use serde::Serialize;

/// Kind of a descriptor, from its `path_type` word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PathType {
    /// The archive root. Its children live directly in the output directory.
    Root,
    Folder,
    File,
    Unknown(u32),
}

impl PathType {
    #[must_use]
    pub fn from_code(code: u32) -> Self {
        match code {
            0x0300_0000 => Self::Root,
            0x0200_0000 => Self::Folder,
            0x0400_0000 => Self::File,
            other => Self::Unknown(other),
        }
    }

    #[must_use]
    pub fn code(self) -> u32 {
        match self {
            Self::Root => 0x0300_0000,
            Self::Folder => 0x0200_0000,
            Self::File => 0x0400_0000,
            Self::Unknown(code) => code,
        }
    }

    /// Whether `offset`/`size` describe a child range rather than a payload.
    #[must_use]
    pub fn is_folder(self) -> bool {
        matches!(self, Self::Root | Self::Folder)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Folder => "folder",
            Self::File => "file",
            Self::Unknown(_) => "unknown",
        }
    }
}

/// Fixed-size archive header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArcHeader {
    pub file_count: u32,
    pub description_table_size: u32,
    pub name_list_size: u32,
    /// Bytes per descriptor, `description_table_size / file_count`
    pub entry_stride: usize,
}

impl ArcHeader {
    /// Absolute offset of the name list.
    #[must_use]
    pub fn name_list_offset(&self) -> usize {
        super::HEADER_SIZE + self.description_table_size as usize
    }

    /// Absolute offset payload offsets are relative to.
    #[must_use]
    pub fn payload_base(&self) -> usize {
        self.name_list_offset() + self.name_list_size as usize
    }
}

/// One row of the descriptor table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArcDescriptor {
    /// Position in the table
    pub index: usize,
    pub path_type: PathType,
    pub entry_number: u32,
    pub name: String,
    /// Folders: first child, relative to `index`. Files: payload offset.
    pub offset: u32,
    /// Folders: child count. Files: payload size.
    pub size: u32,
    /// Index of the enclosing folder, `None` for top-level descriptors
    pub parent: Option<usize>,
}

/// A descriptor with its resolved extraction path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArcEntry {
    /// Path relative to the output directory
    pub path: PathBuf,
    pub path_type: PathType,
    pub offset: u32,
    pub size: u32,
}

/// Phase of an ARC operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcPhase {
    /// Reading the header and descriptor table
    ReadingTable,
    /// Linking descriptors to their folders
    BuildingTree,
    /// Writing files to disk
    WritingFiles,
    Complete,
}

impl ArcPhase {
    /// Get a human-readable description of this phase
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReadingTable => "Reading descriptor table",
            Self::BuildingTree => "Building folder tree",
            Self::WritingFiles => "Writing files",
            Self::Complete => "Complete",
        }
    }
}

/// Progress update reported during extraction
#[derive(Debug, Clone)]
pub struct ArcProgress {
    pub phase: ArcPhase,
    /// Current item number (1-indexed)
    pub current: usize,
    pub total: usize,
    /// Current file being processed (if applicable)
    pub current_file: Option<String>,
}

impl ArcProgress {
    #[must_use]
    pub fn new(phase: ArcPhase, current: usize, total: usize) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: None,
        }
    }

    #[must_use]
    pub fn with_file(phase: ArcPhase, current: usize, total: usize, file: impl Into<String>) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: Some(file.into()),
        }
    }

    /// Progress as a fraction (0.0 - 1.0)
    #[must_use]
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.current as f32 / self.total as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_type_codes() {
        assert_eq!(PathType::from_code(0x0200_0000), PathType::Folder);
        assert_eq!(PathType::from_code(0x0400_0000), PathType::File);
        assert!(PathType::from_code(0x0300_0000).is_folder());
        assert!(!PathType::from_code(0x0400_0000).is_folder());
        assert_eq!(PathType::from_code(7), PathType::Unknown(7));
        assert_eq!(PathType::Unknown(7).code(), 7);
    }

    #[test]
    fn test_progress_percentage() {
        assert!((ArcProgress::new(ArcPhase::WritingFiles, 1, 4).percentage() - 0.25).abs() < f32::EPSILON);
        assert!((ArcProgress::new(ArcPhase::Complete, 0, 0).percentage() - 1.0).abs() < f32::EPSILON);
    }
}
