//! Endian-aware cursor over a fully buffered binary file

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use half::f16;
use serde::Serialize;

use crate::error::{Error, Result};

/// Byte order used for every multi-byte read of a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    /// Guess the byte order from a count field that is known to be small.
    ///
    /// Reads the `u32` at `field_offset` as little-endian. A value strictly
    /// between 0 and 65536 selects little-endian, anything else big-endian.
    /// This is a heuristic, not a flag stored in the file: a genuine count of
    /// 0, or one of 65536 or more, is classified as big-endian.
    ///
    /// # Errors
    /// Returns [`Error::TruncatedInput`] if the field is not fully present.
    pub fn detect(data: &[u8], field_offset: usize) -> Result<Self> {
        let bytes = data
            .get(field_offset..field_offset + 4)
            .ok_or(Error::TruncatedInput {
                offset: field_offset,
                requested: 4,
                available: data.len().saturating_sub(field_offset),
            })?;
        let value = LittleEndian::read_u32(bytes);
        if value > 0 && value < 0x1_0000 {
            Ok(Endianness::Little)
        } else {
            Ok(Endianness::Big)
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Endianness::Little => "little-endian",
            Endianness::Big => "big-endian",
        }
    }
}

/// Seekable reader over a byte slice.
///
/// The byte order is fixed at construction. Every read is bounds-checked:
/// running off the end yields [`Error::TruncatedInput`], and moving the
/// position outside the buffer yields [`Error::InvalidOffset`].
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
    endian: Endianness,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor at position 0.
    #[must_use]
    pub fn new(data: &'a [u8], endian: Endianness) -> Self {
        Self {
            data,
            pos: 0,
            endian,
        }
    }

    #[must_use]
    pub fn endian(&self) -> Endianness {
        self.endian
    }

    /// Current absolute position.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total length of the underlying buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left between the position and the end of the buffer.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Move to an absolute position. The end of the buffer is a valid target.
    pub fn goto(&mut self, offset: usize) -> Result<()> {
        if offset > self.data.len() {
            return Err(Error::InvalidOffset {
                offset: offset as i64,
                len: self.data.len(),
            });
        }
        self.pos = offset;
        Ok(())
    }

    /// Move relative to the current position.
    pub fn seek(&mut self, relative: i64) -> Result<()> {
        let target = self.pos as i64 + relative;
        if target < 0 || target > self.data.len() as i64 {
            return Err(Error::InvalidOffset {
                offset: target,
                len: self.data.len(),
            });
        }
        self.pos = target as usize;
        Ok(())
    }

    /// Borrow the next `count` bytes and advance past them.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(count)
            .filter(|&end| end <= self.data.len())
            .ok_or(Error::TruncatedInput {
                offset: self.pos,
                requested: count,
                available: self.remaining(),
            })?;
        let data = self.data;
        let bytes = &data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(match self.endian {
            Endianness::Little => LittleEndian::read_u16(bytes),
            Endianness::Big => BigEndian::read_u16(bytes),
        })
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.read_u16()? as i16)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(match self.endian {
            Endianness::Little => LittleEndian::read_u32(bytes),
            Endianness::Big => BigEndian::read_u32(bytes),
        })
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        let bytes = self.read_bytes(4)?;
        Ok(match self.endian {
            Endianness::Little => LittleEndian::read_f32(bytes),
            Endianness::Big => BigEndian::read_f32(bytes),
        })
    }

    /// Read an IEEE 754 binary16 value widened to `f32`.
    pub fn read_f16(&mut self) -> Result<f32> {
        Ok(f16::from_bits(self.read_u16()?).to_f32())
    }

    /// Read one byte scaled into `[0, 1]`.
    pub fn read_byte_as_unit_float(&mut self) -> Result<f32> {
        Ok(f32::from(self.read_u8()?) / 255.0)
    }

    /// Read three consecutive `f32` values.
    pub fn read_vec3(&mut self) -> Result<[f32; 3]> {
        Ok([self.read_f32()?, self.read_f32()?, self.read_f32()?])
    }

    /// Read a nul-terminated string.
    ///
    /// Invalid UTF-8 is replaced rather than rejected. A string with no
    /// terminator before the end of the buffer is [`Error::TruncatedInput`].
    pub fn read_cstring(&mut self) -> Result<String> {
        let data = self.data;
        let rest = &data[self.pos.min(data.len())..];
        let Some(len) = rest.iter().position(|&b| b == 0) else {
            return Err(Error::TruncatedInput {
                offset: self.pos,
                requested: rest.len() + 1,
                available: rest.len(),
            });
        };
        let text = String::from_utf8_lossy(&rest[..len]).into_owned();
        self.pos += len + 1;
        Ok(text)
    }

    /// Read a `u32` at an absolute offset without moving the cursor.
    pub fn peek_u32_at(&self, offset: usize) -> Result<u32> {
        let mut probe = self.clone();
        probe.goto(offset)?;
        probe.read_u32()
    }
}
