//! ISM2 header parsing and whole-file decoding

use std::path::Path;

use super::options::DecodeOptions;
use super::sections::{self, SectionContext, decode_strings};
use super::types::{Ism2Header, SectionEntry, SectionType};
use super::{MAGIC, SECTION_COUNT_AT, SECTION_DIRECTORY_AT};
use crate::error::{Error, Result};
use crate::formats::common::{ByteCursor, Endianness};
use crate::formats::face_anm::{FACE_ANM_FILENAME, parse_face_anm};
use crate::model::{SceneModel, discover_texture_directories};

/// Read the header and section directory.
///
/// # Errors
/// Returns [`Error::BadMagic`] for a non-ISM2 file and a cursor error when
/// the header or directory runs past the end of the data.
pub fn read_header(data: &[u8]) -> Result<Ism2Header> {
    let magic = data.get(..MAGIC.len()).unwrap_or(data);
    if magic != MAGIC {
        return Err(Error::BadMagic {
            expected: MAGIC,
            found: magic.to_vec(),
        });
    }

    let endian = Endianness::detect(data, SECTION_COUNT_AT)?;
    let mut cursor = ByteCursor::new(data, endian);

    cursor.goto(0x04)?;
    let bytes = cursor.read_bytes(4)?;
    let version = [bytes[0], bytes[1], bytes[2], bytes[3]];
    cursor.goto(0x10)?;
    let file_length = cursor.read_u32()?;
    cursor.goto(SECTION_COUNT_AT)?;
    let section_count = cursor.read_u32()? as usize;

    cursor.goto(SECTION_DIRECTORY_AT)?;
    let needed = section_count.saturating_mul(8);
    if needed > cursor.remaining() {
        return Err(Error::TruncatedInput {
            offset: SECTION_DIRECTORY_AT,
            requested: needed,
            available: cursor.remaining(),
        });
    }

    let mut sections = Vec::with_capacity(section_count);
    for _ in 0..section_count {
        let section_type = SectionType::from_code(cursor.read_u32()?);
        let offset = cursor.read_u32()? as usize;
        sections.push(SectionEntry {
            section_type,
            offset,
        });
    }

    Ok(Ism2Header {
        endian,
        version,
        file_length,
        sections,
    })
}

/// Decode an in-memory ISM2 file.
///
/// `name` is used as the model name until a surface-carrying bone replaces
/// it, and to name motions. Sidecar files and texture folders are not looked
/// at; see [`read_ism2`] for that.
///
/// # Errors
/// Fails only when the header, the section directory or the string table
/// cannot be read. Every other section failure is recorded in
/// [`SceneModel::diagnostics`] and decoding continues.
pub fn decode_ism2(data: &[u8], name: &str, options: &DecodeOptions) -> Result<SceneModel> {
    let header = read_header(data)?;
    let mut cursor = ByteCursor::new(data, header.endian);
    let ctx = SectionContext {
        version: header.version,
        options,
        file_stem: name.to_string(),
    };

    let mut model = SceneModel::new(name);
    model.version = header.version;

    if ctx.options.verbose {
        tracing::debug!(
            "{name}: ISM2 {} ({}), {} sections, {} bytes (header says {})",
            header.version_string(),
            header.endian.as_str(),
            header.sections.len(),
            data.len(),
            header.file_length
        );
    }

    let mut string_tables = header
        .sections
        .iter()
        .filter(|s| s.section_type == SectionType::Strings);
    match string_tables.next() {
        Some(strings) => model.strings = decode_strings(&mut cursor, strings.offset, &ctx)?,
        None => model.diagnose(
            SectionType::Strings.code(),
            0,
            "file has no string table, names cannot be resolved",
        ),
    }
    for extra in string_tables {
        model.diagnose(extra.section_type.code(), extra.offset, "second string table ignored");
    }

    for entry in &header.sections {
        if let Err(err) = sections::decode_section(&mut cursor, entry, &ctx, &mut model) {
            model.diagnose(
                entry.section_type.code(),
                entry.offset,
                format!("{} section failed: {err}", entry.section_type.as_str()),
            );
        }
    }

    tracing::info!(
        "Decoded {}: {} vertices, {} faces, {} surfaces, {} materials, {} bones, {} diagnostics",
        model.name,
        model.vertices.len(),
        model.faces.len(),
        model.surfaces.len(),
        model.materials.len(),
        model.bone_count(),
        model.diagnostics.len()
    );
    Ok(model)
}

/// Read and decode an ISM2 file from disk.
///
/// Besides the file itself this attaches the `face.anm` sidecar (when
/// [`DecodeOptions::parse_face_anm`] is set) and the texture directories
/// found under [`DecodeOptions::texture_path`] next to the file.
///
/// # Errors
/// Returns [`Error::Io`] when the file cannot be read, otherwise as
/// [`decode_ism2`].
pub fn read_ism2<P: AsRef<Path>>(path: P, options: &DecodeOptions) -> Result<SceneModel> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut model = decode_ism2(&data, &stem, options)?;

    let model_dir = path.parent().unwrap_or_else(|| Path::new("."));
    if options.parse_face_anm {
        model.face_anm = parse_face_anm(model_dir.join(FACE_ANM_FILENAME));
    }
    model.texture_directories = discover_texture_directories(model_dir, &options.texture_path);
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(count: u32, entries: &[(u32, u32)]) -> Vec<u8> {
        let mut data = b"ISM2".to_vec();
        data.extend_from_slice(&[2, 0, 0, 0]);
        data.extend_from_slice(&[0; 8]);
        data.extend_from_slice(&0x100_u32.to_le_bytes());
        data.extend_from_slice(&count.to_le_bytes());
        data.extend_from_slice(&[0; 8]);
        for (code, offset) in entries {
            data.extend_from_slice(&code.to_le_bytes());
            data.extend_from_slice(&offset.to_le_bytes());
        }
        data
    }

    #[test]
    fn test_read_header() {
        let data = header(2, &[(0x21, 0x30), (0x99, 0x40)]);
        let header = read_header(&data).unwrap();
        assert_eq!(header.endian, Endianness::Little);
        assert_eq!(header.major_version(), 2);
        assert_eq!(header.file_length, 0x100);
        assert_eq!(header.sections[0].section_type, SectionType::Strings);
        assert_eq!(header.sections[1].section_type, SectionType::Unknown(0x99));
    }

    #[test]
    fn test_bad_magic() {
        let mut data = header(0, &[]);
        data[..4].copy_from_slice(b"ISM3");
        assert!(matches!(read_header(&data), Err(Error::BadMagic { .. })));
        assert!(matches!(read_header(b"IS"), Err(Error::BadMagic { .. })));
    }

    #[test]
    fn test_directory_past_end() {
        let data = header(3, &[(0x21, 0x30)]);
        assert!(matches!(read_header(&data), Err(Error::TruncatedInput { .. })));
    }

    #[test]
    fn test_unknown_sections_only() {
        let data = header(1, &[(0x99, 0x28)]);
        let model = decode_ism2(&data, "props", &DecodeOptions::new()).unwrap();
        assert_eq!(model.name, "props");
        assert!(model.vertices.is_empty());
        // no string table, plus the unknown section
        assert_eq!(model.diagnostics.len(), 2);
    }
}
