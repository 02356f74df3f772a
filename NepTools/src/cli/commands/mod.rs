use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::formats::ism2::{DecodeOptions, TEXTURE_PATH_DEFAULT};

pub mod arc;
pub mod definitions;
pub mod execute;
pub mod face_anm;
pub mod ism2;

use definitions::{ArcCommands, Ism2Commands};

#[derive(Subcommand)]
pub enum Commands {
    /// ISM2 model operations
    Ism2 {
        #[command(subcommand)]
        command: Ism2Commands,
    },

    /// ARC archive operations
    Arc {
        #[command(subcommand)]
        command: ArcCommands,
    },

    /// Print the text dump of a face.anm file
    #[command(name = "face-anm")]
    FaceAnm {
        /// face.anm file
        path: PathBuf,
    },
}

/// Decoder switches shared by the ISM2 commands
#[derive(Args, Debug, Clone)]
pub struct DecodeArgs {
    /// Decode everything optional (bounding boxes, face.anm, motions)
    #[arg(long)]
    pub full: bool,

    /// Read surface and mesh bounding boxes
    #[arg(long)]
    pub bounding_boxes: bool,

    /// Attach the face.anm next to the model
    #[arg(long)]
    pub face_anm: bool,

    /// Decode armature animations (best effort)
    #[arg(long)]
    pub motion: bool,

    /// Skip the texture list, FX nodes and materials
    #[arg(long)]
    pub no_materials: bool,

    /// Texture folder, relative to the model
    #[arg(long, default_value = TEXTURE_PATH_DEFAULT)]
    pub texture_path: String,
}

impl DecodeArgs {
    /// Build decoder options; `verbose` turns on the section log.
    #[must_use]
    pub fn to_options(&self, verbose: bool) -> DecodeOptions {
        let base = if self.full {
            DecodeOptions::full()
        } else {
            DecodeOptions::new()
                .with_bounding_boxes(self.bounding_boxes)
                .with_face_anm(self.face_anm)
                .with_motion(self.motion)
        };
        base.with_materials(!self.no_materials)
            .with_texture_path(&self.texture_path)
            .with_verbose(verbose)
    }
}
