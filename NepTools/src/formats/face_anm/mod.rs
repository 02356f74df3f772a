//! face.anm facial animation sidecar
//!
//! The format is only partly understood, so it is not decoded into a
//! structure. The reader produces a line-per-record text dump that tools can
//! show next to the model.

mod reader;

pub use reader::{decode_face_anm, parse_face_anm};

/// Name of the sidecar inside a model directory.
pub const FACE_ANM_FILENAME: &str = "face.anm";

/// Names of the expression slots, by index.
pub const EXPRESSION_TYPES: [&str; 8] = [
    "Base",
    "R.Pupil",
    "L.Pupil",
    "R.Eyelid",
    "L.Eyelid",
    "R.Eyebrow",
    "L.Eyebrow",
    "Mouth",
];

/// Offset of the first record count, used for byte-order detection.
const LITTLE_ENDIAN_PROBE_AT: usize = 0x04;
