//! ISM2 scene files
//!
//! An ISM2 file is a header, a directory of `(type, offset)` pairs and the
//! sections those pairs point at. Sections reference each other by absolute
//! offset and name everything through the string table (0x21).
//!
//! | Code | Section |
//! |------|---------|
//! | 0x03 | Armature: bones, transforms, surfaces |
//! | 0x0B | Object-Mesh: vertices, weights, indices, bounding boxes |
//! | 0x21 | Strings |
//! | 0x2E | Texture list (informational) |
//! | 0x32 | Unknown list |
//! | 0x34 | Armature animations |
//! | 0x61 | Materials |
//! | 0x62 | FX shader nodes |
//!
//! # Example
//!
//! ```no_run
//! use neptools::formats::ism2::{DecodeOptions, read_ism2};
//!
//! let model = read_ism2("model/001.ism2", &DecodeOptions::new())?;
//! println!("{} vertices, {} faces", model.vertices.len(), model.faces.len());
//! # Ok::<(), neptools::Error>(())
//! ```

mod options;
mod reader;
mod sections;
mod types;

pub use options::{DecodeOptions, TEXTURE_PATH_DEFAULT};
pub use reader::{decode_ism2, read_header, read_ism2};
pub use types::{Ism2Header, SectionEntry, SectionType};

/// File magic.
pub const MAGIC: &[u8] = b"ISM2";

/// Offset of the section count, which also drives byte-order detection.
pub const SECTION_COUNT_AT: usize = 0x14;

/// Offset of the section directory.
pub const SECTION_DIRECTORY_AT: usize = 0x20;

/// File extension of ISM2 models.
pub const EXTENSION: &str = "ism2";
