//! The compression module manages both directions of GRIN.
//!
//! GRIN compression happens in the following steps:
//! - Frequency count: One full pass over the input counting each byte value. The end-of-stream
//!   symbol is added with a count of 1.
//! - Huffman tree: Built from the counts, then turned into a table of codes.
//! - Header: The 32 bit magic number followed by the serialized tree.
//! - Payload: A second pass over the input writing each byte's code, then the end-of-stream code.
//!
//! Decompression checks the magic number, reads the tree back, and walks it one bit at a time
//! until it lands on the end-of-stream leaf. The payload has no length field; the end-of-stream
//! code is the only thing that stops the decoder.
//!
//! The path level functions write into a temporary file next to the destination and only rename
//! it into place once everything has been written.
//!

pub mod compress;
pub mod decompress;

use std::{
    ffi::OsString,
    fs::{self, File},
    path::{Path, PathBuf},
};

use log::warn;

use crate::error::{GrinError, Result};

/// First 32 bits of every GRIN file.
pub const MAGIC: u32 = 0x0000_0736;

/// Read/write buffer size used by the encoder and decoder.
const BUFFER_SIZE: usize = 64 * 1024;

/// Byte counts reported by an encode or decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub bytes_in: u64,
    pub bytes_out: u64,
}

impl Stats {
    /// Output size as a percentage of the input size.
    pub fn ratio(&self) -> f64 {
        if self.bytes_in == 0 {
            return 0.0;
        }
        self.bytes_out as f64 * 100.0 / self.bytes_in as f64
    }
}

/// Sibling path used while the output is being written.
fn temp_path(out: &Path) -> PathBuf {
    let mut name: OsString = out.as_os_str().to_owned();
    name.push(".grin-tmp");
    PathBuf::from(name)
}

/// Run job against a fresh temporary file and move it onto out when job succeeds.
/// On any failure the temporary file is removed and out is left untouched.
fn write_atomically<F>(out: &Path, job: F) -> Result<Stats>
where
    F: FnOnce(&mut File) -> Result<Stats>,
{
    let tmp = temp_path(out);
    let result = File::create(&tmp)
        .map_err(GrinError::from)
        .and_then(|mut file| {
            let stats = job(&mut file)?;
            file.sync_all()?;
            Ok(stats)
        })
        .and_then(|stats| {
            fs::rename(&tmp, out)?;
            Ok(stats)
        });
    if result.is_err() && tmp.exists() {
        if let Err(e) = fs::remove_file(&tmp) {
            warn!("Could not remove {}: {}", tmp.display(), e);
        }
    }
    result
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn temp_path_test() {
        assert_eq!(
            temp_path(Path::new("dir/out.grin")),
            PathBuf::from("dir/out.grin.grin-tmp")
        );
    }

    #[test]
    fn ratio_test() {
        let stats = Stats {
            bytes_in: 200,
            bytes_out: 50,
        };
        assert_eq!(stats.ratio(), 25.0);
        assert_eq!(Stats::default().ratio(), 0.0);
    }
}
