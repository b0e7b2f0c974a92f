use std::io::{self, Write};

const BUFFER_SIZE: usize = 64 * 1024;

/// Writes a most-significant-bit-first bitstream to any sink that supports write().
/// Call finish() to pad and push out the last partial byte; dropping a BitWriter
/// without finishing discards whatever is still queued.
pub struct BitWriter<W: Write> {
    /// Output buffer of packed bytes waiting to be written to the sink.
    output: Vec<u8>,
    /// Private queue to hold bits that are waiting to be put as bytes into the output buffer.
    queue: u64,
    /// Count of valid bits in the queue.
    q_bits: u8,
    /// Total bits accepted so far, for reporting.
    bits_written: u64,
    /// Handle to the output stream
    writer: W,
}

impl<W: Write> BitWriter<W> {
    /// Create a new BitWriter over the sink.
    pub fn new(writer: W) -> Self {
        Self {
            output: Vec::with_capacity(BUFFER_SIZE),
            queue: 0,
            q_bits: 0,
            bits_written: 0,
            writer,
        }
    }

    /// Move all whole bytes from the queue into the output buffer, and hand the buffer
    /// to the sink once it fills up.
    fn push_queue(&mut self) -> io::Result<()> {
        while self.q_bits > 7 {
            let byte = (self.queue >> (self.q_bits - 8)) as u8;
            self.output.push(byte);
            self.q_bits -= 8;
        }
        if self.output.len() >= BUFFER_SIZE {
            self.writer.write_all(&self.output)?;
            self.output.clear();
        }
        Ok(())
    }

    /// Put a single bit (0 or 1) on the stream.
    pub fn out_bit(&mut self, bit: u32) -> io::Result<()> {
        self.queue = (self.queue << 1) | (bit & 1) as u64;
        self.q_bits += 1;
        self.bits_written += 1;
        self.push_queue()
    }

    /// Put the low n bits (1..=32) of value on the stream, most significant first.
    pub fn out_bits(&mut self, value: u32, n: u8) -> io::Result<()> {
        debug_assert!((1..=32).contains(&n), "out_bits writes 1 to 32 bits");
        // The queue never holds more than 7 bits between calls, so 32 more always fit.
        self.queue <<= n;
        self.queue |= value as u64 & (u64::MAX >> (64 - n));
        self.q_bits += n;
        self.bits_written += n as u64;
        self.push_queue()
    }

    /// Total bits written so far, padding excluded.
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Debugging function to return the number of bytes.bits output so far
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.bits_written / 8, self.bits_written % 8)
    }

    /// Flushes the remaining bits (1-7) from the queue, padding with 0s in the least
    /// significant bits, writes everything to the sink and hands the sink back.
    pub fn finish(mut self) -> io::Result<W> {
        if self.q_bits > 0 {
            let pad = 8 - self.q_bits;
            self.queue <<= pad;
            self.q_bits += pad;
        }
        while self.q_bits > 7 {
            let byte = (self.queue >> (self.q_bits - 8)) as u8;
            self.output.push(byte);
            self.q_bits -= 8;
        }
        self.writer.write_all(&self.output)?;
        self.output.clear();
        self.writer.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod test {
    use super::BitWriter;

    #[test]
    fn out_bits_byte_test() {
        let mut bw = BitWriter::new(Vec::new());
        bw.out_bits(b'x' as u32, 8).unwrap();
        assert_eq!(bw.finish().unwrap(), "x".as_bytes());
    }

    #[test]
    fn out_bits_32_test() {
        let mut bw = BitWriter::new(Vec::new());
        bw.out_bits(0b00100001_00100000_00100001_00100000, 32).unwrap();
        assert_eq!(bw.finish().unwrap(), [33, 32, 33, 32]);
    }

    #[test]
    fn padding_test() {
        let mut bw = BitWriter::new(Vec::new());
        bw.out_bits(0xff, 8).unwrap();
        bw.out_bit(1).unwrap();
        bw.out_bit(1).unwrap();
        bw.out_bit(0).unwrap();
        assert_eq!(bw.bits_written(), 11);
        assert_eq!(bw.loc(), "[1.3]");
        assert_eq!(bw.finish().unwrap(), vec![0b1111_1111, 0b1100_0000]);
    }

    #[test]
    fn masks_high_bits_test() {
        let mut bw = BitWriter::new(Vec::new());
        // Only the low 9 bits belong on the stream
        bw.out_bits(0xffff_ff00 | 256, 9).unwrap();
        assert_eq!(bw.finish().unwrap(), vec![0b1000_0000, 0b0000_0000]);
    }

    #[test]
    fn nothing_written_test() {
        let bw = BitWriter::new(Vec::new());
        assert!(bw.finish().unwrap().is_empty());
    }

    #[test]
    fn large_output_test() {
        let mut bw = BitWriter::new(Vec::new());
        for i in 0..100_000_u32 {
            bw.out_bits(i & 0xff, 8).unwrap();
        }
        let out = bw.finish().unwrap();
        assert_eq!(out.len(), 100_000);
        assert_eq!(out[70_000], (70_000 & 0xff) as u8);
    }
}
