//! Binary reading primitives shared by the ISM2, ARC and face.anm readers

pub mod cursor;
pub mod offset_table;

pub use cursor::{ByteCursor, Endianness};
pub use offset_table::{read_counted_table, read_offset_table, visit_offsets};
