//! Errors raised while reading or writing GRIN files.

use std::io;

/// Everything that can go wrong during an encode or decode.
#[derive(thiserror::Error, Debug)]
pub enum GrinError {
    #[error("invalid grin data: {0}")]
    Format(#[from] FormatError),
    #[error("i/o failure: {0}")]
    Io(#[from] io::Error),
    #[error("compressed data ended before the end-of-stream code")]
    Truncated,
}

/// Structural problems with a GRIN container.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum FormatError {
    #[error("input is too short to hold the magic number")]
    MissingMagic,
    #[error("bad magic number {found:#010x}")]
    BadMagic { found: u32 },
    #[error("huffman tree ends early")]
    TreeTruncated,
    #[error("tree leaf holds symbol {0}, which is outside 0..=256")]
    SymbolOutOfRange(u16),
    #[error("huffman tree has more than one leaf for symbol {0}")]
    DuplicateSymbol(u16),
    #[error("huffman tree is deeper than any valid tree")]
    TreeTooDeep,
    #[error("huffman tree has no end-of-stream leaf")]
    MissingEof,
}

pub type Result<T> = std::result::Result<T, GrinError>;
