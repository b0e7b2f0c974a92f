//! The huffman module builds the static code used by GRIN.
//!
//! Symbols are the 256 byte values plus one end-of-stream marker (256), so every symbol
//! needs 9 bits when it is stored in the file header.
//!
//! - huffman: the node tree, built from a frequency table, and the code table derived from it.
//! - tree_format: how the tree is written into, and read back out of, a GRIN file.
//!
//! The tree is built once per encode from a single frequency count of the whole input.
//! It is never adapted while encoding.
//!
pub mod huffman;
pub mod tree_format;
