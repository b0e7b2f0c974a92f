//! The tools module provides helper functions for GRIN.
//!
//! The tools are:
//! - cli: Command line interface for the grin binary.
//! - freq_count: Frequency count of the input bytes, plus the end-of-stream symbol.
//!
pub mod cli;
pub mod freq_count;
