//! ARC descriptor table reader

use std::path::{Component, Path, PathBuf};

use super::types::{ArcDescriptor, ArcEntry, ArcHeader, PathType};
use super::{HEADER_SIZE, MAGIC, MIN_ENTRY_STRIDE};
use crate::error::{Error, Result};
use crate::formats::common::{ByteCursor, Endianness};

/// Parsed view over an in-memory ARC archive.
///
/// The whole table is read and linked on [`ArcReader::parse`]; payloads are
/// borrowed from the input on demand.
#[derive(Debug)]
pub struct ArcReader<'a> {
    data: &'a [u8],
    header: ArcHeader,
    descriptors: Vec<ArcDescriptor>,
}

impl<'a> ArcReader<'a> {
    /// Read the header and descriptor table and assign parents.
    ///
    /// # Errors
    /// Returns [`Error::BadMagic`], [`Error::CorruptHeader`] for an empty or
    /// undersized table, [`Error::ArcEntryOutOfRange`] when a folder's child
    /// range runs past the table, or a cursor error for a truncated table.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let header = read_header(data)?;
        let mut descriptors = read_descriptors(data, &header)?;
        assign_parents(&mut descriptors)?;
        Ok(Self {
            data,
            header,
            descriptors,
        })
    }

    #[must_use]
    pub fn header(&self) -> &ArcHeader {
        &self.header
    }

    /// Descriptors in table order.
    #[must_use]
    pub fn descriptors(&self) -> &[ArcDescriptor] {
        &self.descriptors
    }

    /// Indices of the file descriptors, in table order.
    pub fn file_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.descriptors
            .iter()
            .filter(|d| d.path_type == PathType::File)
            .map(|d| d.index)
    }

    /// Path of a descriptor relative to the output directory.
    ///
    /// Built from the names of its ancestors, top-most first. The root folder
    /// contributes nothing.
    ///
    /// # Errors
    /// Returns [`Error::UnsafeArchivePath`] for a component that could leave
    /// the output directory and [`Error::CorruptHeader`] for a parent cycle.
    pub fn relative_path(&self, index: usize) -> Result<PathBuf> {
        let mut chain = Vec::new();
        let mut current = Some(index);
        while let Some(i) = current {
            if chain.len() > self.descriptors.len() {
                return Err(Error::CorruptHeader(format!(
                    "parent chain of entry {index} does not terminate"
                )));
            }
            let descriptor = self.descriptors.get(i).ok_or_else(|| {
                Error::CorruptHeader(format!("entry {i} is not in the table"))
            })?;
            if descriptor.path_type != PathType::Root {
                chain.push(descriptor.name.as_str());
            }
            current = descriptor.parent;
        }

        let mut path = PathBuf::new();
        for name in chain.iter().rev() {
            check_component(name)?;
            path.push(name);
        }
        Ok(path)
    }

    /// Payload bytes of a file descriptor.
    ///
    /// # Errors
    /// Returns [`Error::ArcPayloadOutOfRange`] when the payload lies outside
    /// the archive.
    pub fn payload(&self, index: usize) -> Result<&'a [u8]> {
        let descriptor = self.descriptors.get(index).ok_or_else(|| {
            Error::CorruptHeader(format!("entry {index} is not in the table"))
        })?;
        let offset = self.header.payload_base() + descriptor.offset as usize;
        let size = descriptor.size as usize;
        offset
            .checked_add(size)
            .and_then(|end| self.data.get(offset..end))
            .ok_or_else(|| Error::ArcPayloadOutOfRange {
                name: descriptor.name.clone(),
                offset,
                size,
            })
    }

    /// Every descriptor with its resolved path.
    ///
    /// # Errors
    /// Fails on the first unsafe path, as [`ArcReader::relative_path`].
    pub fn list(&self) -> Result<Vec<ArcEntry>> {
        self.descriptors
            .iter()
            .map(|d| {
                Ok(ArcEntry {
                    path: self.relative_path(d.index)?,
                    path_type: d.path_type,
                    offset: d.offset,
                    size: d.size,
                })
            })
            .collect()
    }
}

/// Read the fixed header.
///
/// # Errors
/// See [`ArcReader::parse`].
pub fn read_header(data: &[u8]) -> Result<ArcHeader> {
    let magic = data.get(..MAGIC.len()).unwrap_or(data);
    if magic != MAGIC {
        return Err(Error::BadMagic {
            expected: MAGIC,
            found: magic.to_vec(),
        });
    }

    let mut cursor = ByteCursor::new(data, Endianness::Big);
    cursor.goto(MAGIC.len())?;
    let file_count = cursor.read_u32()?;
    let description_table_size = cursor.read_u32()?;
    let name_list_size = cursor.read_u32()?;

    if file_count == 0 {
        return Err(Error::CorruptHeader("file count is zero".to_string()));
    }
    let entry_stride = (description_table_size / file_count) as usize;
    if entry_stride < MIN_ENTRY_STRIDE {
        return Err(Error::CorruptHeader(format!(
            "descriptor stride {entry_stride} is smaller than {MIN_ENTRY_STRIDE} bytes"
        )));
    }

    Ok(ArcHeader {
        file_count,
        description_table_size,
        name_list_size,
        entry_stride,
    })
}

fn read_descriptors(data: &[u8], header: &ArcHeader) -> Result<Vec<ArcDescriptor>> {
    let mut cursor = ByteCursor::new(data, Endianness::Big);
    let names_at = header.name_list_offset();
    let count = header.file_count as usize;
    let table_end = HEADER_SIZE + count * header.entry_stride;
    if table_end > data.len() {
        return Err(Error::TruncatedInput {
            offset: HEADER_SIZE,
            requested: table_end - HEADER_SIZE,
            available: data.len().saturating_sub(HEADER_SIZE),
        });
    }

    let mut descriptors = Vec::with_capacity(count);
    for index in 0..count {
        cursor.goto(HEADER_SIZE + index * header.entry_stride)?;
        let path_type = PathType::from_code(cursor.read_u32()?);
        let entry_number = cursor.read_u32()?;
        let name_at = cursor.read_u32()? as usize;
        let size = cursor.read_u32()?;
        cursor.seek(4)?;
        let offset = cursor.read_u32()?;

        cursor.goto(names_at + name_at)?;
        let name = cursor.read_cstring()?;

        if let PathType::Unknown(code) = path_type {
            tracing::warn!("ARC entry {index} ({name}) has unknown path type {code:#010x}");
        }
        descriptors.push(ArcDescriptor {
            index,
            path_type,
            entry_number,
            name,
            offset,
            size,
            parent: None,
        });
    }
    Ok(descriptors)
}

/// Link every descriptor to its folder.
///
/// A folder at table index `i` owns the descriptors whose index lies in
/// `i + offset .. i + offset + size`. Only `(path_type, offset, size)` are
/// read, so the result does not depend on any earlier parent assignment.
///
/// # Errors
/// Returns [`Error::ArcEntryOutOfRange`] when a range ends past the table.
pub fn assign_parents(descriptors: &mut [ArcDescriptor]) -> Result<()> {
    let count = descriptors.len();
    let ranges: Vec<(usize, usize, usize)> = descriptors
        .iter()
        .filter(|d| d.path_type.is_folder())
        .map(|d| {
            let start = d.index + d.offset as usize;
            (d.index, start, start + d.size as usize)
        })
        .collect();

    for &(folder, start, end) in &ranges {
        if end > count {
            return Err(Error::ArcEntryOutOfRange {
                folder,
                start,
                end,
                count,
            });
        }
    }

    for descriptor in descriptors.iter_mut() {
        descriptor.parent = None;
    }
    for (folder, start, end) in ranges {
        for child in &mut descriptors[start..end] {
            child.parent = Some(folder);
        }
    }
    Ok(())
}

fn check_component(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !single_normal || name.contains(['/', '\\']) {
        return Err(Error::UnsafeArchivePath(name.to_string()));
    }
    Ok(())
}
