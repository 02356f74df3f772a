//! String table (0x21)

use super::{SectionContext, narrate};
use crate::error::Result;
use crate::formats::common::{ByteCursor, read_counted_table, visit_offsets};

/// Read the string table at `offset`.
///
/// Every name in the file is an index into this table, so a failure here is
/// fatal to the whole decode.
pub(crate) fn decode_strings(
    cursor: &mut ByteCursor<'_>,
    offset: usize,
    ctx: &SectionContext<'_>,
) -> Result<Vec<String>> {
    let offsets = read_counted_table(cursor, offset, 0x08, 0x0C)?;
    narrate!(ctx, "Strings @ {offset:#x}: {} entries", offsets.len());

    let mut strings = Vec::with_capacity(offsets.len());
    visit_offsets(cursor, &offsets, |cursor, index, at| {
        let value = cursor.read_cstring()?;
        narrate!(ctx, "  string {index:>4} @ {at:#x}: {value}");
        strings.push(value);
        Ok(())
    })?;
    Ok(strings)
}
