//! Offset tables: a count of `u32` absolute offsets, each pointing at a block
//!
//! Nearly every level of the ISM2 and ARC formats is laid out this way, so the
//! section decoders read the table once and then visit each entry.

use super::cursor::ByteCursor;
use crate::error::{Error, Result};

/// Read `count` consecutive `u32` offsets at the cursor position.
///
/// The count is checked against the bytes actually left before anything is
/// allocated, so a corrupt count fails fast with [`Error::TruncatedInput`].
pub fn read_offset_table(cursor: &mut ByteCursor<'_>, count: u32) -> Result<Vec<u32>> {
    let count = count as usize;
    let needed = count.saturating_mul(4);
    if needed > cursor.remaining() {
        return Err(Error::TruncatedInput {
            offset: cursor.position(),
            requested: needed,
            available: cursor.remaining(),
        });
    }

    let mut offsets = Vec::with_capacity(count);
    for _ in 0..count {
        offsets.push(cursor.read_u32()?);
    }
    Ok(offsets)
}

/// Visit every offset in order, moving the cursor to it before calling `visit`.
///
/// `visit` receives the cursor, the entry index and the entry offset. The
/// first error stops the walk and is returned.
pub fn visit_offsets<'a, F>(cursor: &mut ByteCursor<'a>, offsets: &[u32], mut visit: F) -> Result<()>
where
    F: FnMut(&mut ByteCursor<'a>, usize, usize) -> Result<()>,
{
    for (index, &offset) in offsets.iter().enumerate() {
        let offset = offset as usize;
        cursor.goto(offset)?;
        visit(cursor, index, offset)?;
    }
    Ok(())
}

/// Read a `count` at `count_at`, then the offset table at `table_at`, both
/// relative to `base`.
pub fn read_counted_table(
    cursor: &mut ByteCursor<'_>,
    base: usize,
    count_at: usize,
    table_at: usize,
) -> Result<Vec<u32>> {
    cursor.goto(base + count_at)?;
    let count = cursor.read_u32()?;
    cursor.goto(base + table_at)?;
    read_offset_table(cursor, count)
}
