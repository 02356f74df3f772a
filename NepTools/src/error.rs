//! Error types for `NepTools`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `NepTools` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A file could not be persisted to its final location.
    #[error("failed to persist {path}: {message}")]
    PersistFailed {
        /// Destination path of the write.
        path: PathBuf,
        /// The underlying error message.
        message: String,
    },

    // ==================== Binary Cursor Errors ====================
    /// Fewer bytes remain than a read requested.
    #[error("truncated input: needed {requested} bytes at {offset:#x}, {available} available")]
    TruncatedInput {
        /// Position the read started at.
        offset: usize,
        /// Number of bytes requested.
        requested: usize,
        /// Number of bytes left in the buffer.
        available: usize,
    },

    /// A `goto`/`seek` target lies outside the buffer.
    #[error("invalid offset {offset:#x} (buffer length {len:#x})")]
    InvalidOffset {
        /// The requested absolute position.
        offset: i64,
        /// Length of the underlying buffer.
        len: usize,
    },

    // ==================== Container Errors ====================
    /// The file does not start with the expected magic bytes.
    #[error("bad magic: expected {expected:?}, found {found:?}")]
    BadMagic {
        /// The magic the format requires.
        expected: &'static [u8],
        /// The first bytes actually present.
        found: Vec<u8>,
    },

    // ==================== ISM2 Errors ====================
    /// A string id points past the end of the string table.
    #[error("string id {id} out of range ({count} strings)")]
    InvalidStringId {
        /// The referenced string id.
        id: u32,
        /// Number of strings in the table.
        count: usize,
    },

    /// A block carried a different type tag than its position requires.
    #[error("unexpected block type {found:#x} at {offset:#x} (expected {expected:#x})")]
    UnexpectedBlockType {
        /// The tag that was expected.
        expected: u32,
        /// The tag that was read.
        found: u32,
        /// Absolute offset of the block.
        offset: usize,
    },

    /// A face or weight refers to a vertex that was never decoded.
    #[error("vertex index {index} out of range ({count} vertices)")]
    VertexIndexOutOfRange {
        /// The offending vertex index.
        index: usize,
        /// Number of decoded vertices.
        count: usize,
    },

    // ==================== ARC Archive Errors ====================
    /// The archive header cannot describe a usable table.
    #[error("corrupt ARC header: {0}")]
    CorruptHeader(String),

    /// A folder's child range runs past the descriptor table.
    #[error("folder entry {folder} claims children {start}..{end} but the table has {count} entries")]
    ArcEntryOutOfRange {
        /// Table index of the folder descriptor.
        folder: usize,
        /// First child index claimed by the folder.
        start: usize,
        /// One past the last child index claimed by the folder.
        end: usize,
        /// Number of descriptors in the table.
        count: usize,
    },

    /// A descriptor's payload lies outside the archive.
    #[error("payload of {name} ({size} bytes at {offset:#x}) lies outside the archive")]
    ArcPayloadOutOfRange {
        /// Descriptor name.
        name: String,
        /// Absolute payload offset.
        offset: usize,
        /// Payload size in bytes.
        size: usize,
    },

    /// An archive entry name would escape the output directory.
    #[error("unsafe archive path component: {0:?}")]
    UnsafeArchivePath(String),

    /// Extraction completed but some files failed.
    #[error("extraction failed for {failed} of {total} files: {first_error}")]
    ArcExtractionPartialFailure {
        /// Number of files the archive contains.
        total: usize,
        /// Number of failed files.
        failed: usize,
        /// The first error message encountered.
        first_error: String,
    },

    // ==================== face.anm Errors ====================
    /// An expression index outside the known expression table.
    #[error("unknown face expression index {0}")]
    UnknownExpression(u32),
}

/// Result type alias for `NepTools` operations.
pub type Result<T> = std::result::Result<T, Error>;
