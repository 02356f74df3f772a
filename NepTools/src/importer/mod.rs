//! Handing decoded scenes to a host application
//!
//! Decoding never touches the host. [`submit_model`] walks a finished
//! [`crate::model::SceneModel`] through a [`SceneConsumer`], and
//! [`batch_decode`] decodes many files in parallel ahead of that serial
//! hand-off.

pub mod batch;
mod consumer;

pub use batch::{BatchDecodeResult, DecodeProgress, DecodedFile, batch_decode, find_ism2_files};
pub use consumer::{ImportReport, IndexedMesh, SceneConsumer, TriangleRejected, submit_model};
