//! Command execution implementations

use super::Commands;
use super::definitions::{ArcCommands, Ism2Commands};
use super::{arc, face_anm, ism2};

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self, verbose: bool) -> anyhow::Result<()> {
        match self {
            Commands::Ism2 { command } => command.execute(verbose),
            Commands::Arc { command } => command.execute(),
            Commands::FaceAnm { path } => face_anm::execute(path),
        }
    }
}

impl Ism2Commands {
    /// Execute the selected ISM2 command.
    ///
    /// # Errors
    /// Returns an error if the underlying decode fails.
    pub fn execute(&self, verbose: bool) -> anyhow::Result<()> {
        match self {
            Ism2Commands::Inspect { path, decode } => {
                ism2::inspect(path, &decode.to_options(verbose))
            }
            Ism2Commands::Dump {
                path,
                output,
                decode,
            } => ism2::dump(path, output.as_deref(), &decode.to_options(verbose)),
            Ism2Commands::Batch {
                source,
                quiet,
                decode,
            } => ism2::batch(source, &decode.to_options(verbose), *quiet),
        }
    }
}

impl ArcCommands {
    /// Execute the selected ARC command.
    ///
    /// # Errors
    /// Returns an error if the underlying archive operation fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            ArcCommands::List {
                source,
                json,
                count,
            } => arc::list(source, *json, *count),
            ArcCommands::Extract {
                source,
                destination,
                quiet,
            } => arc::extract(source, destination.as_deref(), *quiet),
            ArcCommands::Batch {
                source,
                destination,
                quiet,
            } => arc::batch_extract_cmd(source, destination, *quiet),
            ArcCommands::Dlc { dir } => arc::dlc(dir),
        }
    }
}
