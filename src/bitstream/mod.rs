//! The bitstream module forms the I/O subsystem for GRIN.
//!
//! Everything in a GRIN file is packed most-significant-bit-first: the 32 bit magic
//! number, the serialized tree with its 9 bit symbols, and the variable length huffman
//! codes. Neither side of the pair knows anything about the format; they only move bits.
//!
//! End of input is signalled by `Ok(None)` from the reader. The writer pads the last
//! byte with zero bits when it is finished.
//!
pub mod bitreader;
pub mod bitwriter;
