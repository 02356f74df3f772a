//! Subcommand enum definitions for CLI

use clap::Subcommand;
use std::path::PathBuf;

use super::DecodeArgs;

/// ISM2 model commands
#[derive(Subcommand)]
pub enum Ism2Commands {
    /// Decode an ISM2 file and print a summary
    Inspect {
        /// ISM2 file to inspect
        path: PathBuf,

        #[command(flatten)]
        decode: DecodeArgs,
    },

    /// Decode an ISM2 file and write the model as JSON
    Dump {
        /// ISM2 file to dump
        path: PathBuf,

        /// Output JSON file (prints to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        decode: DecodeArgs,
    },

    /// Decode every ISM2 file under a directory
    Batch {
        /// Directory to search
        source: PathBuf,

        /// Suppress progress bar
        #[arg(short, long)]
        quiet: bool,

        #[command(flatten)]
        decode: DecodeArgs,
    },
}

/// ARC archive commands
#[derive(Subcommand)]
pub enum ArcCommands {
    /// List the descriptors of an ARC archive
    List {
        /// ARC file
        source: PathBuf,

        /// Print the listing as JSON
        #[arg(long)]
        json: bool,

        /// Only show count of files
        #[arg(short, long)]
        count: bool,
    },

    /// Extract an ARC archive
    Extract {
        /// Source ARC file
        source: PathBuf,

        /// Output directory (defaults to a folder named after the archive)
        destination: Option<PathBuf>,

        /// Suppress progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Extract every ARC archive under a directory
    Batch {
        /// Directory to search
        source: PathBuf,

        /// Output directory
        destination: PathBuf,

        /// Suppress progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// List installed DLCs with their titles and descriptions
    Dlc {
        /// Folder holding one subfolder per DLC
        dir: PathBuf,
    },
}
