//! Rust version of the GRIN file compressor.
//!
//! Version 0.1.0
//!
//! GRIN compresses any byte stream with a single static huffman code. The code is built
//! from one frequency count of the whole input and stored at the front of the file,
//! followed by the coded bytes and an end-of-stream code.
//!
//! Basic usage to compress and expand a file is as follows:
//!
//! `$> grin encode notes.txt notes.grin`
//!
//! `$> grin decode notes.grin notes.txt`
//!
//! The same operations are available to library users, on paths, streams or slices:
//!
//! ```
//! let packed = grin::encode_slice(b"a ab bza").unwrap();
//! assert_eq!(grin::decode_slice(&packed).unwrap(), b"a ab bza");
//! ```
//!
pub mod bitstream;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod tools;

pub use compression::compress::{encode, encode_slice, encode_stream};
pub use compression::decompress::{decode, decode_slice, decode_stream};
pub use compression::{Stats, MAGIC};
pub use error::{FormatError, GrinError};
pub use huffman_coding::huffman::{HuffmanTree, EOF};
pub use tools::freq_count::{build_frequency_table, FreqTable};
