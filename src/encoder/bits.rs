use crate::error::{QrError, Result};

/// Append-only bit buffer, most significant bit first within each byte
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitBuffer {
    bytes: Vec<u8>,
    bit_len: usize,
}

impl BitBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bits.div_ceil(8)),
            bit_len: 0,
        }
    }

    /// Number of bits written
    pub fn len(&self) -> usize {
        self.bit_len
    }

    pub fn is_empty(&self) -> bool {
        self.bit_len == 0
    }

    pub fn push_bit(&mut self, bit: bool) {
        let offset = self.bit_len % 8;
        if offset == 0 {
            self.bytes.push(0);
        }
        if bit {
            if let Some(last) = self.bytes.last_mut() {
                *last |= 0x80 >> offset;
            }
        }
        self.bit_len += 1;
    }

    /// Append the low `width` bits of `value`, high bit first.
    ///
    /// `value` must fit in `width` bits and `width` may not exceed 32.
    pub fn write_bits(&mut self, value: u32, width: u8) -> Result<()> {
        if width > 32 || (width < 32 && value >> width != 0) {
            return Err(QrError::ValueOutOfRange { value, width });
        }
        for i in (0..width).rev() {
            self.push_bit((value >> i) & 1 == 1);
        }
        Ok(())
    }

    /// Append `count` zero bits
    pub fn write_zeros(&mut self, count: usize) {
        self.bit_len += count;
        self.bytes.resize(self.bit_len.div_ceil(8), 0);
    }

    pub fn append(&mut self, other: &BitBuffer) {
        for i in 0..other.len() {
            self.push_bit(other.bit(i));
        }
    }

    /// Bit at `index`; false past the end
    pub fn bit(&self, index: usize) -> bool {
        if index >= self.bit_len {
            return false;
        }
        (self.bytes[index / 8] >> (7 - index % 8)) & 1 == 1
    }

    /// Packed bytes; a trailing partial byte is zero-padded
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_bits_msb_first() {
        let mut bb = BitBuffer::new();
        bb.write_bits(0b0010, 4).unwrap();
        bb.write_bits(0b000001011, 9).unwrap();
        assert_eq!(bb.len(), 13);
        assert_eq!(bb.as_bytes(), &[0b0010_0000, 0b0101_1000]);
        assert!(bb.bit(2));
        assert!(!bb.bit(3));
        assert!(!bb.bit(100));
    }

    #[test]
    fn test_write_bits_range_contract() {
        let mut bb = BitBuffer::new();
        assert_eq!(
            bb.write_bits(16, 4),
            Err(QrError::ValueOutOfRange { value: 16, width: 4 })
        );
        assert!(bb.write_bits(u32::MAX, 32).is_ok());
        assert!(bb.write_bits(0, 33).is_err());
        assert!(bb.write_bits(0, 0).is_ok());
        assert_eq!(bb.len(), 32);
    }

    #[test]
    fn test_write_zeros_and_append() {
        let mut bb = BitBuffer::new();
        bb.push_bit(true);
        bb.write_zeros(10);
        assert_eq!(bb.len(), 11);
        assert_eq!(bb.as_bytes(), &[0x80, 0x00]);

        let mut other = BitBuffer::new();
        other.write_bits(0b101, 3).unwrap();
        bb.append(&other);
        assert_eq!(bb.len(), 14);
        assert_eq!(bb.into_bytes(), vec![0x80, 0b0001_0100]);
    }
}
