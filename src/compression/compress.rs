use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;

use log::{debug, info};

use super::{write_atomically, Stats, BUFFER_SIZE, MAGIC};
use crate::bitstream::bitwriter::BitWriter;
use crate::error::Result;
use crate::huffman_coding::huffman::{HuffmanTree, EOF};
use crate::tools::freq_count::freqs_from_reader;

/*
    Encoding makes two passes over the input. The first pass only counts bytes. Once the
    tree is built and the header is out, the input is rewound to where it started and
    every byte is replaced by its code.
*/

/// Compress a seekable input into output. The input is read from its current position
/// to the end, twice.
pub fn encode_stream<R: Read + Seek, W: Write>(mut input: R, output: W) -> Result<Stats> {
    let start = input.stream_position()?;

    // First pass: count.
    let freqs = freqs_from_reader(&mut input)?;
    let bytes_in: u64 = freqs
        .iter()
        .filter(|(&sym, _)| sym != EOF)
        .map(|(_, &count)| count)
        .sum();
    let tree = HuffmanTree::from_freqs(&freqs);
    let codes = tree.codes();
    debug!(
        "{} symbols, longest code is {} bits, EOF code is {} bits.",
        codes.len(),
        tree.depth(),
        codes.get(&EOF).map_or(0, |code| code.len())
    );

    // Header: magic number, then the tree.
    let mut bw = BitWriter::new(output);
    bw.out_bits(MAGIC, 32)?;
    tree.serialize(&mut bw)?;
    debug!("Header written. Payload starts at {}.", bw.loc());

    // Second pass: emit the codes.
    input.seek(SeekFrom::Start(start))?;
    let mut buf = vec![0_u8; BUFFER_SIZE];
    let mut seen = 0_u64;
    loop {
        let size = match input.read(&mut buf) {
            Ok(0) => break,
            Ok(size) => size,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        for &byte in &buf[..size] {
            match codes.get(&(byte as u16)) {
                Some(code) => code.write_to(&mut bw)?,
                None => return Err(changed_input()),
            }
        }
        seen += size as u64;
    }
    if seen != bytes_in {
        return Err(changed_input());
    }
    if let Some(code) = codes.get(&EOF) {
        code.write_to(&mut bw)?;
    }

    let bits = bw.bits_written();
    bw.finish()?;
    let stats = Stats {
        bytes_in,
        bytes_out: (bits + 7) / 8,
    };
    info!(
        "Encoded {} bytes into {} bytes ({:.1}%).",
        stats.bytes_in,
        stats.bytes_out,
        stats.ratio()
    );
    Ok(stats)
}

fn changed_input() -> crate::error::GrinError {
    io::Error::new(
        io::ErrorKind::InvalidData,
        "input changed between the counting and encoding passes",
    )
    .into()
}

/// Compress a byte slice into a new GRIN buffer.
pub fn encode_slice(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len() / 2 + 8);
    encode_stream(Cursor::new(data), &mut out)?;
    Ok(out)
}

/// Compress the file at input into a GRIN file at output. Output only appears once
/// the whole file has been written.
pub fn encode<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<Stats> {
    let (input, output) = (input.as_ref(), output.as_ref());
    info!("Encoding {} into {}.", input.display(), output.display());
    let fin = File::open(input)?;
    write_atomically(output, |fout| encode_stream(fin, fout))
}
