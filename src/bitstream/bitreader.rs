//! BitReader: the input half of the GRIN bit I/O subsystem.
//!
//! Reads a packed, most-significant-bit-first bitstream from any source that
//! supports read(). Running out of data is reported as `Ok(None)`, never as an error.
//!

use std::io::{self, Read};

const BUFFER_SIZE: usize = 64 * 1024;

/// Reads bits from a byte source.
#[derive(Debug)]
pub struct BitReader<R> {
    buffer: Vec<u8>,
    cursor: usize,
    bit_index: usize,
    bits_read: u64,
    source: R,
}

impl<R: Read> BitReader<R> {
    /// Creates a new BitReader (with a 64k buffer).
    pub fn new(source: R) -> Self {
        Self {
            buffer: vec![0; BUFFER_SIZE],
            cursor: BUFFER_SIZE,
            bit_index: 0,
            bits_read: 0,
            source,
        }
    }

    /// Check (and refill) buffer. Returns true if we have data, false if there is no more.
    fn have_data(&mut self) -> io::Result<bool> {
        // Only try to read more data when the cursor has run off the end of the buffer
        if self.cursor == self.buffer.len() {
            self.buffer.resize(BUFFER_SIZE, 0);
            let size = loop {
                match self.source.read(&mut self.buffer) {
                    Ok(size) => break size,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            };
            // If nothing came back from our read attempt, then we have no more data.
            if size == 0 {
                self.buffer.clear();
                self.cursor = 0;
                return Ok(false);
            }
            self.buffer.truncate(size);
            self.cursor = 0;
            self.bit_index = 0;
        }
        Ok(true)
    }

    /// Return the next bit (1 or 0), or None if there is no more data to read.
    pub fn bit(&mut self) -> io::Result<Option<u32>> {
        if self.bit_index == 0 && !self.have_data()? {
            return Ok(None);
        }
        let bit = (self.buffer[self.cursor] >> (7 - self.bit_index)) & 1;
        self.bit_index += 1;
        if self.bit_index == 8 {
            self.bit_index = 0;
            self.cursor += 1;
        }
        self.bits_read += 1;
        Ok(Some(bit as u32))
    }

    /// Return the next bit as a bool (*true* if 1), or None if there is no more data.
    pub fn bool_bit(&mut self) -> io::Result<Option<bool>> {
        Ok(self.bit()?.map(|bit| bit == 1))
    }

    /// Return the next n bits (1..=32), most significant first, or None if fewer
    /// than n bits remain. Bits consumed before running dry are lost.
    pub fn bint(&mut self, n: u32) -> io::Result<Option<u32>> {
        debug_assert!((1..=32).contains(&n), "bint reads 1 to 32 bits");
        let mut result = 0_u64;
        let mut needed = n;
        while needed > 0 {
            // Take whole bytes when we are byte aligned
            if self.bit_index == 0 && needed >= 8 {
                if !self.have_data()? {
                    return Ok(None);
                }
                result = (result << 8) | self.buffer[self.cursor] as u64;
                self.cursor += 1;
                self.bits_read += 8;
                needed -= 8;
                continue;
            }
            match self.bit()? {
                Some(bit) => result = (result << 1) | bit as u64,
                None => return Ok(None),
            }
            needed -= 1;
        }
        Ok(Some(result as u32))
    }

    /// Count of bits handed out so far.
    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }

    /// Debugging function. Report current position as [bytes.bits].
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.bits_read / 8, self.bits_read % 8)
    }
}

#[cfg(test)]
mod test {
    use super::BitReader;

    #[test]
    fn basic_test() {
        let x = [0b10000001_u8].as_slice();
        let mut br = BitReader::new(x);
        assert_eq!(br.bit().unwrap(), Some(1));
        for _ in 0..6 {
            assert_eq!(br.bit().unwrap(), Some(0));
        }
        assert_eq!(br.bit().unwrap(), Some(1));
        assert_eq!(br.bit().unwrap(), None);
        assert_eq!(br.bit().unwrap(), None);
    }

    #[test]
    fn bint_test() {
        let x = [0b00011011].as_slice();
        let mut br = BitReader::new(x);
        assert_eq!(br.bint(5).unwrap(), Some(3));
        assert_eq!(br.bint(1).unwrap(), Some(0));
        assert_eq!(br.bint(2).unwrap(), Some(3));
        assert_eq!(br.bint(1).unwrap(), None);
    }

    #[test]
    fn bint_across_bytes_test() {
        let x = [0b1010_1010, 0b1100_0000, 0xff].as_slice();
        let mut br = BitReader::new(x);
        assert_eq!(br.bit().unwrap(), Some(1));
        // 9 bits straddling the first byte boundary: 0101010 11
        assert_eq!(br.bint(9).unwrap(), Some(0b0_1010_1011));
        assert_eq!(br.bint(14).unwrap(), Some(0b00_0000_1111_1111));
        assert_eq!(br.bit().unwrap(), None);
    }

    #[test]
    fn bint_32_test() {
        let x = [0x00, 0x00, 0x07, 0x36, 0x80].as_slice();
        let mut br = BitReader::new(x);
        assert_eq!(br.bint(32).unwrap(), Some(0x736));
        assert_eq!(br.bit().unwrap(), Some(1));
    }

    #[test]
    fn short_read_is_none_test() {
        let x = [0xab, 0xcd].as_slice();
        let mut br = BitReader::new(x);
        assert_eq!(br.bint(32).unwrap(), None);
    }

    #[test]
    fn loc_test() {
        let x = "Hello, world!".as_bytes();
        let mut br = BitReader::new(x);
        assert_eq!(br.bint(8).unwrap(), Some(b'H' as u32));
        assert_eq!(br.bint(32).unwrap(), Some(u32::from_be_bytes(*b"ello")));
        br.bit().unwrap();
        assert_eq!(br.loc(), "[5.1]");
        assert_eq!(br.bits_read(), 41);
    }

    #[test]
    fn bool_bit_test() {
        let x = [0b01010000].as_slice();
        let mut br = BitReader::new(x);
        assert_eq!(br.bool_bit().unwrap(), Some(false));
        assert_eq!(br.bool_bit().unwrap(), Some(true));
        assert_eq!(br.bool_bit().unwrap(), Some(false));
        assert_eq!(br.bool_bit().unwrap(), Some(true));
    }
}
