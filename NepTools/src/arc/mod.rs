//! ARC archive support
//!
//! An ARC archive is a big-endian container with a flat descriptor table.
//! Folders own the descriptors that follow them through a `(offset, size)`
//! index range, and files point into a payload area after the name list.
//!
//! ```text
//! 0x00  "ARC\x02"
//! 0x04  file_count              u32
//! 0x08  description_table_size  u32
//! 0x0C  name_list_size          u32
//! 0x10  descriptors             file_count × stride
//!       name list               nul-terminated names
//!       payloads
//! ```

pub mod batch;
pub mod dlc;
mod extractor;
mod reader;
mod types;

pub use batch::{BatchArcResult, batch_extract, find_arc_files};
pub use dlc::{DlcDescription, describe_dlc, list_dlc_descriptions};
pub use extractor::{extract_arc, extract_arc_data};
pub use reader::{ArcReader, assign_parents, read_header};
pub use types::{ArcDescriptor, ArcEntry, ArcHeader, ArcPhase, ArcProgress, PathType};

/// File magic.
pub const MAGIC: &[u8] = b"ARC\x02";

/// Size of the fixed header; descriptors start right after it.
pub const HEADER_SIZE: usize = 0x10;

/// Smallest descriptor that holds every field read.
pub const MIN_ENTRY_STRIDE: usize = 0x18;

/// File extension of ARC archives.
pub const EXTENSION: &str = "arc";
