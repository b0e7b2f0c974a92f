use log::{error, info};

use super::{write_atomically, Stats, BUFFER_SIZE, MAGIC};
use crate::bitstream::bitreader::BitReader;
use crate::error::{FormatError, GrinError, Result};
use crate::huffman_coding::huffman::{HuffmanTree, NodeData, EOF};

use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

/// Decompress GRIN data from input into output.
pub fn decode_stream<R: Read, W: Write>(input: R, mut output: W) -> Result<Stats> {
    let mut br = BitReader::new(input);

    // Look for a valid signature before touching anything else.
    let magic = br.bint(32)?.ok_or(FormatError::MissingMagic)?;
    if magic != MAGIC {
        error!("Fatal error: {:#010x} is not a grin signature.", magic);
        return Err(FormatError::BadMagic { found: magic }.into());
    }

    let tree = HuffmanTree::deserialize(&mut br)?;
    info!(
        "Read a tree of {} leaves. Payload starts at {}.",
        tree.leaf_count(),
        br.loc()
    );

    // Walk the tree a bit at a time. Every leaf but EOF is a byte of output.
    let root = tree.root();
    let mut node = root;
    let mut buf: Vec<u8> = Vec::with_capacity(BUFFER_SIZE);
    let mut bytes_out = 0_u64;
    loop {
        match &node.node_data {
            NodeData::Leaf(EOF) => break,
            NodeData::Leaf(sym) => {
                buf.push(*sym as u8);
                if buf.len() == BUFFER_SIZE {
                    output.write_all(&buf)?;
                    bytes_out += buf.len() as u64;
                    buf.clear();
                }
                node = root;
            }
            NodeData::Kids(left, right) => {
                node = match br.bool_bit()? {
                    Some(false) => &**left,
                    Some(true) => &**right,
                    None => {
                        // Hand over what we did decode before reporting the truncation.
                        output.write_all(&buf)?;
                        output.flush()?;
                        error!(
                            "Data ran out after {} bytes without an end-of-stream code.",
                            bytes_out + buf.len() as u64
                        );
                        return Err(GrinError::Truncated);
                    }
                };
            }
        }
    }
    output.write_all(&buf)?;
    output.flush()?;
    bytes_out += buf.len() as u64;

    let stats = Stats {
        bytes_in: (br.bits_read() + 7) / 8,
        bytes_out,
    };
    info!(
        "Decoded {} bytes into {} bytes.",
        stats.bytes_in, stats.bytes_out
    );
    Ok(stats)
}

/// Decompress a GRIN buffer.
pub fn decode_slice(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len() * 2);
    decode_stream(data, &mut out)?;
    Ok(out)
}

/// Decompress the GRIN file at input into output. Output only appears once the whole
/// file has been decoded.
pub fn decode<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<Stats> {
    let (input, output) = (input.as_ref(), output.as_ref());
    info!("Decoding {} into {}.", input.display(), output.display());
    let fin = File::open(input)?;
    write_atomically(output, |fout| decode_stream(fin, fout))
}
