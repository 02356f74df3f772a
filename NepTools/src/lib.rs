//! # NepTools
//!
//! A pure-Rust library for reading Neptunia asset containers.
//!
//! ## Supported Formats
//!
//! - **ISM2** - Scene files: skeleton, geometry, materials, bounding boxes and
//!   (best effort) armature animations
//! - **ARC** - Asset archives with a folder/file descriptor table
//! - **face.anm** - Facial animation sidecars, as a text dump
//!
//! ## Quick Start
//!
//! ### Decoding a Model
//!
//! ```no_run
//! use neptools::formats::ism2::{DecodeOptions, read_ism2};
//! use neptools::importer::{IndexedMesh, submit_model};
//!
//! let model = read_ism2("chara/001/001.ism2", &DecodeOptions::full())?;
//! for diagnostic in &model.diagnostics {
//!     println!("{}", diagnostic.message);
//! }
//!
//! // Hand the model to a mesh builder
//! let mut mesh = IndexedMesh::new();
//! let report = submit_model(&model, &mut mesh);
//! println!("{} triangles skipped", report.triangles_skipped);
//! # Ok::<(), neptools::Error>(())
//! ```
//!
//! ### Extracting an Archive
//!
//! ```no_run
//! use neptools::arc::extract_arc;
//!
//! let written = extract_arc("dlc/0001/contents.arc", "dlc/0001/contents", |_| {})?;
//! println!("Extracted {written} files");
//! # Ok::<(), neptools::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `neptools` command-line binary

pub mod arc;
pub mod error;
pub mod formats;
pub mod importer;
pub mod model;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::formats::common::{ByteCursor, Endianness};
    pub use crate::formats::face_anm::{decode_face_anm, parse_face_anm};
    pub use crate::formats::ism2::{DecodeOptions, decode_ism2, read_ism2};

    pub use crate::model::{
        Bone, Bones, Face, FaceAnm, Material, SceneModel, Surface, TextureChannel, Vertex,
    };

    // ARC operations
    pub use crate::arc::{
        ArcReader, BatchArcResult, batch_extract, extract_arc, find_arc_files,
        list_dlc_descriptions,
    };

    // Host hand-off
    pub use crate::importer::{
        BatchDecodeResult, ImportReport, IndexedMesh, SceneConsumer, TriangleRejected,
        batch_decode, find_ism2_files, submit_model,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
