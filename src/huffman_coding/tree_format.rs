//! Bit level layout of a huffman tree inside a GRIN file.
//!
//! The tree is written in preorder. A node with kids is a 1 bit followed by its left
//! and then its right subtree. A leaf is a 0 bit followed by its symbol in 9 bits.
//! There is no length field: a tree with L leaves has L-1 parents, so the reader
//! knows it is done when the recursion unwinds.

use std::io::{Read, Write};

use log::error;

use super::huffman::{HuffmanTree, Node, NodeData, EOF};
use crate::bitstream::{bitreader::BitReader, bitwriter::BitWriter};
use crate::error::{FormatError, Result};

/// Bits used for each leaf symbol.
pub const SYMBOL_BITS: u8 = 9;
/// No tree over 257 symbols can be deeper than this.
pub const MAX_TREE_DEPTH: usize = 256;

impl HuffmanTree {
    /// Write the tree onto the stream.
    pub fn serialize<W: Write>(&self, bw: &mut BitWriter<W>) -> std::io::Result<()> {
        write_node(self.root(), bw)
    }

    /// Read a tree back off the stream. Every symbol may appear in at most one leaf,
    /// and the tree must hold an EOF leaf.
    pub fn deserialize<R: Read>(br: &mut BitReader<R>) -> Result<HuffmanTree> {
        let start = br.loc();
        let mut seen = [false; EOF as usize + 1];
        let root = read_node(br, 0, &mut seen)?;
        let tree = HuffmanTree::from_root(root);
        if !seen[EOF as usize] {
            error!("Tree read at {} has no end-of-stream leaf.", start);
            return Err(FormatError::MissingEof.into());
        }
        Ok(tree)
    }
}

fn write_node<W: Write>(node: &Node, bw: &mut BitWriter<W>) -> std::io::Result<()> {
    match &node.node_data {
        NodeData::Kids(left, right) => {
            bw.out_bit(1)?;
            write_node(left, bw)?;
            write_node(right, bw)
        }
        NodeData::Leaf(sym) => {
            bw.out_bit(0)?;
            bw.out_bits(*sym as u32, SYMBOL_BITS)
        }
    }
}

fn read_node<R: Read>(
    br: &mut BitReader<R>,
    depth: usize,
    seen: &mut [bool; EOF as usize + 1],
) -> Result<Node> {
    if depth > MAX_TREE_DEPTH {
        error!("Tree is deeper than {} at {}.", MAX_TREE_DEPTH, br.loc());
        return Err(FormatError::TreeTooDeep.into());
    }
    match br.bool_bit()? {
        Some(true) => {
            let left = read_node(br, depth + 1, seen)?;
            let right = read_node(br, depth + 1, seen)?;
            Ok(Node::join(left, right))
        }
        Some(false) => {
            let sym = br
                .bint(SYMBOL_BITS as u32)?
                .ok_or(FormatError::TreeTruncated)? as u16;
            if sym > EOF {
                error!("Found symbol {} at {}.", sym, br.loc());
                return Err(FormatError::SymbolOutOfRange(sym).into());
            }
            if seen[sym as usize] {
                error!("Symbol {} has a second leaf at {}.", sym, br.loc());
                return Err(FormatError::DuplicateSymbol(sym).into());
            }
            seen[sym as usize] = true;
            // The weight of a leaf does not survive serialization.
            Ok(Node::leaf(sym, 1))
        }
        None => Err(FormatError::TreeTruncated.into()),
    }
}
