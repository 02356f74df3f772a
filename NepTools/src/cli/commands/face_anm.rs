//! face.anm CLI command

use std::path::Path;

use crate::formats::face_anm::decode_face_anm;

/// Print the text dump of a face.anm file.
///
/// Unlike model decoding, a broken sidecar is an error here.
pub fn execute(path: &Path) -> anyhow::Result<()> {
    let data = std::fs::read(path)?;
    let dump = decode_face_anm(&data, &path.display().to_string())?;
    println!("{}", dump.text);
    Ok(())
}
