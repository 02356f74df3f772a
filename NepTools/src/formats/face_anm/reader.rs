//! face.anm text dump

use std::fmt::Write as _;
use std::path::Path;

use super::{EXPRESSION_TYPES, LITTLE_ENDIAN_PROBE_AT};
use crate::error::{Error, Result};
use crate::formats::common::{ByteCursor, Endianness};
use crate::model::FaceAnm;

/// Decode a face.anm file into its text dump.
///
/// `display_path` only appears in the first line of the dump.
///
/// # Errors
/// Returns a cursor error when a record runs past the end of the data and
/// [`Error::UnknownExpression`] for an expression index with no name.
pub fn decode_face_anm(data: &[u8], display_path: &str) -> Result<FaceAnm> {
    let endian = Endianness::detect(data, LITTLE_ENDIAN_PROBE_AT)?;
    let mut cursor = ByteCursor::new(data, endian);
    let mut lines = Vec::new();

    let version = cursor.read_f32()?;
    lines.push(format!("Face Anims Version: {version:.1}  File: \"{display_path}\""));

    let something_count = cursor.read_u32()?;
    lines.push(format!("Something Count: {something_count}"));
    for _ in 0..something_count {
        let mut line = String::new();
        for _ in 0..22 {
            let _ = write!(line, "{:>2} ", cursor.read_i32()?);
        }
        let _ = write!(line, "{:>6.1} {:>6.1}", cursor.read_f32()?, cursor.read_f32()?);
        lines.push(line);
    }

    let face_parts_count = cursor.read_u32()?;
    lines.push(format!("Face Parts Count: {face_parts_count}"));
    for id in 0..face_parts_count {
        let at = cursor.position();
        let texnum = cursor.read_u32()?;
        let expression = expression_name(cursor.read_u32()?)?;
        let h3 = cursor.read_u32()?;
        let h4 = cursor.read_u32()?;
        let chunk = cursor.read_u32()?;
        let [cx, cy, sx, sy] = read_f32s(&mut cursor)?;
        let [h13, h14, h15, h16] = read_f32s(&mut cursor)?;
        let h17 = cursor.read_f32()?;
        let h18 = cursor.read_u8()?;
        lines.push(format!(
            "@{at:>#6x}  ID: {id:>2}  Tex #{texnum}  ExpressionType: {expression:<10}  H3:{h3:>2}  H4:{h4:>2}  Chunk:{chunk:>3}  \
             TexCenter: ({cx:>6?}, {cy:>6?}), TexSize: ({sx:>6?}, {sy:>6?})  \
             H13:{h13:>7.3}  H14:{h14:>7.3}  H15:{h15:>7.3}  H16:{h16:>7.3}  H17:{h17:>7.3}  H18:{h18:>2}"
        ));
    }

    let skipped = cursor.read_u32()?;
    cursor.seek(i64::from(skipped) * 0x20)?;
    let extra_count = cursor.read_u32()?;
    lines.push(format!("Extra Count: {extra_count}"));
    for id in 0..extra_count {
        let at = cursor.position();
        let texnum = cursor.read_u32()?;
        let expression = expression_name(cursor.read_u32()?)?;
        let h3 = cursor.read_u32()?;
        let h4 = cursor.read_u32()?;
        let chunk_start = cursor.read_u32()?;
        let chunk_end = cursor.read_u32()?;
        let h7 = cursor.read_f32()?;
        let h8 = cursor.read_u8()?;
        let [cx, cy, sx, sy] = read_f32s(&mut cursor)?;
        let h13 = cursor.read_f32()?;
        let h14 = cursor.read_f32()?;
        let h15 = cursor.read_u8()?;
        let h16 = cursor.read_u8()?;
        lines.push(format!(
            "@{at:>#6x}  ID: {id:>2}  Tex #{texnum}  ExpressionType:{expression:>10}  H3:{h3:>2}  H4:{h4:>2}  \
             Chunk Range: ({chunk_start:>3}, {chunk_end:>3}) H7:{h7:>5?} H8:{h8:>2}  \
             TexCenter: ({cx:>8.3}, {cy:>8.3}), TexSize: ({sx:>8.3}, {sy:>8.3})  \
             H13:{h13:?}  H14:{h14:?}  H15:{h15}  H16:{h16}"
        ));
    }

    Ok(FaceAnm {
        text: lines.join("\n"),
    })
}

/// Read the face.anm at `path`.
///
/// The sidecar is optional: a missing file or any decode failure is logged
/// and yields `None`.
pub fn parse_face_anm<P: AsRef<Path>>(path: P) -> Option<FaceAnm> {
    let path = path.as_ref();
    if !path.is_file() {
        tracing::warn!("face.anm not found: {}", path.display());
        return None;
    }

    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}", path.display());
            return None;
        }
    };

    match decode_face_anm(&data, &path.display().to_string()) {
        Ok(face_anm) => Some(face_anm),
        Err(err) => {
            tracing::warn!("Failed to decode {}: {err}", path.display());
            None
        }
    }
}

fn expression_name(index: u32) -> Result<&'static str> {
    EXPRESSION_TYPES
        .get(index as usize)
        .copied()
        .ok_or(Error::UnknownExpression(index))
}

fn read_f32s(cursor: &mut ByteCursor<'_>) -> Result<[f32; 4]> {
    Ok([
        cursor.read_f32()?,
        cursor.read_f32()?,
        cursor.read_f32()?,
        cursor.read_f32()?,
    ])
}
