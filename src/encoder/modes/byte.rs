use crate::encoder::bits::BitBuffer;
use crate::error::Result;

/// Byte mode encoder (Mode 0100) for 8-bit data
/// Every UTF-8 byte of the text is written as-is
pub struct ByteEncoder;

impl ByteEncoder {
    pub fn encode(text: &str, out: &mut BitBuffer) -> Result<()> {
        for &byte in text.as_bytes() {
            out.write_bits(byte as u32, 8)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_encode() {
        // "HI" in ASCII = 72, 73
        let mut out = BitBuffer::new();
        ByteEncoder::encode("HI", &mut out).unwrap();
        assert_eq!(out.into_bytes(), vec![0x48, 0x49]);
    }

    #[test]
    fn test_multibyte_characters() {
        let mut out = BitBuffer::new();
        ByteEncoder::encode("é", &mut out).unwrap();
        assert_eq!(out.into_bytes(), vec![0xC3, 0xA9]);
    }
}
