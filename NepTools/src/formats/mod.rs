//! File format decoders

pub mod common;
pub mod face_anm;
pub mod ism2;

pub use common::{ByteCursor, Endianness};
pub use face_anm::{decode_face_anm, parse_face_anm};
pub use ism2::{DecodeOptions, decode_ism2, read_ism2};
