use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};

use log::debug;
use rustc_hash::FxHashMap;

use crate::huffman_coding::huffman::EOF;

const CHUNK_SIZE: usize = 64 * 1024;

/// Symbol -> occurrence count. Symbols 0-255 are bytes, 256 is the end-of-stream marker.
pub type FreqTable = FxHashMap<u16, u64>;

/// Returns a frequency table for the input data, with the end-of-stream symbol
/// forced in at a count of 1.
pub fn freqs(data: &[u8]) -> FreqTable {
    let mut counts = [0_u64; 256];
    data.iter().for_each(|&el| counts[el as usize] += 1);
    to_table(&counts)
}

/// Same as freqs(), but pulls the data from a reader in 64k chunks.
pub fn freqs_from_reader<R: Read>(mut source: R) -> io::Result<FreqTable> {
    let mut counts = [0_u64; 256];
    let mut buf = vec![0_u8; CHUNK_SIZE];
    loop {
        let size = match source.read(&mut buf) {
            Ok(0) => break,
            Ok(size) => size,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        buf[..size].iter().for_each(|&el| counts[el as usize] += 1);
    }
    Ok(to_table(&counts))
}

/// Frequency table for the file at path.
pub fn build_frequency_table<P: AsRef<Path>>(path: P) -> io::Result<FreqTable> {
    freqs_from_reader(File::open(path)?)
}

fn to_table(counts: &[u64; 256]) -> FreqTable {
    let mut table: FreqTable = counts
        .iter()
        .enumerate()
        .filter(|(_, &count)| count > 0)
        .map(|(sym, &count)| (sym as u16, count))
        .collect();
    table.insert(EOF, 1);
    debug!("Counted {} distinct symbols (EOF included).", table.len());
    table
}
