use log::{debug, trace, warn};
use rustc_hash::FxHashMap;

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::io::{self, Write};

use crate::bitstream::bitwriter::BitWriter;
use crate::tools::freq_count::FreqTable;

/// The end-of-stream symbol. It never appears in decoded output.
pub const EOF: u16 = 256;

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum NodeData {
    Kids(Box<Node>, Box<Node>),
    Leaf(u16),
}

/// A huffman tree node. The weight of a node with kids is the sum of its kids' weights.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Node {
    pub weight: u64,
    pub node_data: NodeData,
}

impl Node {
    /// Create a new leaf
    pub fn leaf(symbol: u16, weight: u64) -> Node {
        Node {
            weight,
            node_data: NodeData::Leaf(symbol),
        }
    }

    /// Join two nodes under a new parent
    pub fn join(left: Node, right: Node) -> Node {
        Node {
            weight: left.weight.saturating_add(right.weight),
            node_data: NodeData::Kids(Box::new(left), Box::new(right)),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.node_data, NodeData::Leaf(_))
    }

    /// Symbol held by a leaf, None for a node with kids.
    pub fn symbol(&self) -> Option<u16> {
        match self.node_data {
            NodeData::Leaf(sym) => Some(sym),
            NodeData::Kids(..) => None,
        }
    }
}

/// Entry in the construction queue. Ordered by weight, then nodes with kids before
/// leaves, then by creation order (kids) or symbol value (leaves). No two entries
/// ever compare equal, so the build is fully deterministic.
struct Queued {
    key: (u64, u8, u32),
    node: Node,
}

impl Queued {
    fn leaf(symbol: u16, weight: u64) -> Self {
        Queued {
            key: (weight, 1, symbol as u32),
            node: Node::leaf(symbol, weight),
        }
    }

    fn parent(node: Node, seq: u32) -> Self {
        Queued {
            key: (node.weight, 0, seq),
            node,
        }
    }
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}
impl Eq for Queued {}
impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

/// A huffman code: the root-to-leaf path, 0 for left and 1 for right.
/// Packed 32 bits to a word; the last word holds the leftover bits right aligned.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Code {
    words: Vec<u32>,
    len: usize,
}

impl Code {
    fn pushed(&self, bit: u32) -> Code {
        let mut code = self.clone();
        if code.len % 32 == 0 {
            code.words.push(0);
        }
        if let Some(last) = code.words.last_mut() {
            *last = (*last << 1) | (bit & 1);
        }
        code.len += 1;
        code
    }

    /// Number of bits in the code.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Only the root of a single leaf tree has an empty code.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn word_len(&self, i: usize) -> u8 {
        if i + 1 < self.words.len() {
            32
        } else {
            (self.len - 32 * i) as u8
        }
    }

    /// The code's bits, first bit first.
    pub fn bits(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.len).map(move |i| {
            let w = i / 32;
            let shift = self.word_len(w) as usize - 1 - i % 32;
            (self.words[w] >> shift) & 1
        })
    }

    /// Put the code on the stream.
    pub fn write_to<W: Write>(&self, bw: &mut BitWriter<W>) -> io::Result<()> {
        for (i, &word) in self.words.iter().enumerate() {
            bw.out_bits(word, self.word_len(i))?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.bits().try_for_each(|bit| write!(f, "{}", bit))
    }
}

/// Symbol -> code, derived from a tree for each encode.
pub type CodeTable = FxHashMap<u16, Code>;

/// A static huffman tree over the symbols 0..=256.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct HuffmanTree {
    root: Node,
}

impl HuffmanTree {
    /// Wrap an existing root node.
    pub fn from_root(root: Node) -> Self {
        HuffmanTree { root }
    }

    /// Build a tree from a frequency table. The table should already hold the EOF
    /// symbol; if it does not, EOF is added with a count of 1.
    pub fn from_freqs(freqs: &FreqTable) -> Self {
        let mut heap: BinaryHeap<Reverse<Queued>> = freqs
            .iter()
            .map(|(&sym, &weight)| Reverse(Queued::leaf(sym, weight)))
            .collect();
        if !freqs.contains_key(&EOF) {
            warn!("Frequency table had no EOF entry. Adding one.");
            heap.push(Reverse(Queued::leaf(EOF, 1)));
        }

        // Pull off the two lightest nodes and join them until only the root is left.
        let mut seq = 0_u32;
        while let Some(Reverse(first)) = heap.pop() {
            let second = match heap.pop() {
                Some(Reverse(second)) => second,
                None => {
                    let tree = HuffmanTree { root: first.node };
                    debug!(
                        "Built tree with {} leaves, depth {}.",
                        tree.leaf_count(),
                        tree.depth()
                    );
                    return tree;
                }
            };
            // A leaf always goes left of a node with kids. Otherwise keep draw order.
            let parent = if !first.node.is_leaf() && second.node.is_leaf() {
                Node::join(second.node, first.node)
            } else {
                Node::join(first.node, second.node)
            };
            heap.push(Reverse(Queued::parent(parent, seq)));
            seq += 1;
        }
        // EOF is always queued, so the loop above always returns.
        HuffmanTree {
            root: Node::leaf(EOF, 1),
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Derive the code for every leaf in the tree.
    pub fn codes(&self) -> CodeTable {
        let codes: CodeTable = codes_below(&self.root, Code::default()).into_iter().collect();
        for (sym, code) in codes.iter() {
            trace!("Symbol {:>3}: {}", sym, code);
        }
        codes
    }

    /// Leaf symbols in preorder, paired with their depth.
    pub fn leaves(&self) -> Vec<(u16, usize)> {
        leaves_below(&self.root, 0)
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }

    /// Length of the longest root-to-leaf path. Zero for a single leaf tree.
    pub fn depth(&self) -> usize {
        self.leaves().iter().map(|&(_, depth)| depth).max().unwrap_or(0)
    }

    /// True when both trees have the same shape and the same symbol in every leaf.
    /// Weights are ignored.
    pub fn same_shape(&self, other: &HuffmanTree) -> bool {
        fn walk(a: &Node, b: &Node) -> bool {
            match (&a.node_data, &b.node_data) {
                (NodeData::Leaf(x), NodeData::Leaf(y)) => x == y,
                (NodeData::Kids(al, ar), NodeData::Kids(bl, br)) => walk(al, bl) && walk(ar, br),
                _ => false,
            }
        }
        walk(&self.root, &other.root)
    }
}

/// Recursively walk the tree and return the code of every leaf below node.
fn codes_below(node: &Node, prefix: Code) -> Vec<(u16, Code)> {
    match &node.node_data {
        NodeData::Leaf(sym) => vec![(*sym, prefix)],
        NodeData::Kids(left, right) => {
            let mut codes = codes_below(left, prefix.pushed(0));
            codes.extend(codes_below(right, prefix.pushed(1)));
            codes
        }
    }
}

fn leaves_below(node: &Node, depth: usize) -> Vec<(u16, usize)> {
    match &node.node_data {
        NodeData::Leaf(sym) => vec![(*sym, depth)],
        NodeData::Kids(left, right) => {
            let mut leaves = leaves_below(left, depth + 1);
            leaves.extend(leaves_below(right, depth + 1));
            leaves
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tools::freq_count::freqs;

    fn table(entries: &[(u16, u64)]) -> FreqTable {
        entries.iter().copied().collect()
    }

    #[test]
    fn eof_only_tree_is_a_leaf_test() {
        let tree = HuffmanTree::from_freqs(&freqs(&[]));
        assert!(tree.root().is_leaf());
        assert_eq!(tree.root().symbol(), Some(EOF));
        assert_eq!(tree.depth(), 0);
        let codes = tree.codes();
        assert_eq!(codes.len(), 1);
        assert!(codes[&EOF].is_empty());
    }

    #[test]
    fn two_symbols_get_one_bit_codes_test() {
        let tree = HuffmanTree::from_freqs(&freqs(b"aaaa"));
        assert_eq!(tree.leaf_count(), 2);
        // EOF (1) is lighter than 'a' (4), so it is drawn first and goes left.
        assert_eq!(tree.leaves(), vec![(EOF, 1), (b'a' as u16, 1)]);
        let codes = tree.codes();
        assert_eq!(codes[&EOF].to_string(), "0");
        assert_eq!(codes[&(b'a' as u16)].to_string(), "1");
    }

    #[test]
    fn internal_node_weight_is_sum_test() {
        let tree = HuffmanTree::from_freqs(&freqs(b"a ab bza"));
        fn check(node: &Node) -> u64 {
            match &node.node_data {
                NodeData::Leaf(_) => node.weight,
                NodeData::Kids(l, r) => {
                    assert_eq!(node.weight, check(l) + check(r));
                    node.weight
                }
            }
        }
        assert_eq!(check(tree.root()), 9);
    }

    #[test]
    fn tie_break_shape_test() {
        // "a ab bza": a=3, ' '=2, b=2, z=1, EOF=1
        // z(1)+EOF(1) -> n0(2); ' '(2) vs n0(2): n0 first, leaf goes left -> n1(4)
        // b(2)+a(3) -> n2(5); n1(4)+n2(5) -> root(9)
        let tree = HuffmanTree::from_freqs(&freqs(b"a ab bza"));
        let leaves = tree.leaves();
        assert_eq!(
            leaves,
            vec![
                (b' ' as u16, 2),
                (b'z' as u16, 3),
                (EOF, 3),
                (b'b' as u16, 2),
                (b'a' as u16, 2),
            ]
        );
        let codes = tree.codes();
        assert_eq!(codes[&(b' ' as u16)].to_string(), "00");
        assert_eq!(codes[&(b'z' as u16)].to_string(), "010");
        assert_eq!(codes[&EOF].to_string(), "011");
        assert_eq!(codes[&(b'b' as u16)].to_string(), "10");
        assert_eq!(codes[&(b'a' as u16)].to_string(), "11");
    }

    #[test]
    fn equal_weight_parents_keep_creation_order_test() {
        // Four leaves of weight 1 make two parents of weight 2; the older one goes left.
        let tree = HuffmanTree::from_freqs(&table(&[(1, 1), (2, 1), (3, 1), (EOF, 1)]));
        assert_eq!(tree.leaves(), vec![(1, 2), (2, 2), (3, 2), (EOF, 2)]);
    }

    #[test]
    fn deterministic_build_test() {
        let data = b"the quick brown fox jumps over the lazy dog, again and again";
        let a = HuffmanTree::from_freqs(&freqs(data));
        let b = HuffmanTree::from_freqs(&freqs(data));
        assert_eq!(a, b);
        // Insertion order of the table does not matter either
        let mut entries: Vec<(u16, u64)> = freqs(data).into_iter().collect();
        entries.reverse();
        let c = HuffmanTree::from_freqs(&table(&entries));
        assert_eq!(a, c);
    }

    #[test]
    fn every_symbol_is_one_leaf_test() {
        let data: Vec<u8> = (0..5000_u32).map(|i| (i * i % 256) as u8).collect();
        let table = freqs(&data);
        let tree = HuffmanTree::from_freqs(&table);
        let mut syms: Vec<u16> = tree.leaves().iter().map(|&(sym, _)| sym).collect();
        syms.sort_unstable();
        let mut expected: Vec<u16> = table.keys().copied().collect();
        expected.sort_unstable();
        assert_eq!(syms, expected);
    }

    #[test]
    fn missing_eof_is_added_test() {
        let tree = HuffmanTree::from_freqs(&table(&[(7, 3)]));
        assert_eq!(tree.leaves(), vec![(EOF, 1), (7, 1)]);
    }

    #[test]
    fn codes_are_prefix_free_test() {
        let tree = HuffmanTree::from_freqs(&freqs(b"mississippi river banks"));
        let codes: Vec<String> = tree.codes().values().map(|c| c.to_string()).collect();
        for (i, a) in codes.iter().enumerate() {
            for (j, b) in codes.iter().enumerate() {
                if i != j {
                    assert!(!b.starts_with(a.as_str()), "{} is a prefix of {}", a, b);
                }
            }
        }
    }

    #[test]
    fn long_code_test() {
        // Fibonacci weights give a maximally lopsided tree, deeper than one code word.
        let mut entries = vec![(EOF, 1_u64)];
        let (mut a, mut b) = (1_u64, 1_u64);
        for sym in 0..40_u16 {
            entries.push((sym, b));
            let next = a + b;
            a = b;
            b = next;
        }
        let tree = HuffmanTree::from_freqs(&table(&entries));
        assert_eq!(tree.depth(), 40);
        let codes = tree.codes();
        let longest = codes.values().max_by_key(|c| c.len()).unwrap();
        assert_eq!(longest.len(), 40);
        assert_eq!(longest.bits().count(), 40);

        let mut bw = BitWriter::new(Vec::new());
        longest.write_to(&mut bw).unwrap();
        assert_eq!(bw.bits_written(), 40);
    }
}
