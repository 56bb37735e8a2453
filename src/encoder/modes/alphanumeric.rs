use crate::encoder::bits::BitBuffer;
use crate::error::Result;

/// Alphanumeric mode encoder (Mode 0010)
/// Alphanumeric character set: 0-9, A-Z, space, $%*+-./:
const ALPHANUMERIC_TABLE: [char; 45] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I',
    'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', ' ', '$',
    '%', '*', '+', '-', '.', '/', ':',
];

/// Encode alphanumeric data
/// Pairs = 11 bits, single = 6 bits
pub struct AlphanumericEncoder;

impl AlphanumericEncoder {
    /// Position of `c` in the 45-character set
    pub fn index_of(c: char) -> Option<u32> {
        ALPHANUMERIC_TABLE
            .iter()
            .position(|&t| t == c)
            .map(|i| i as u32)
    }

    pub fn encode(text: &str, out: &mut BitBuffer) -> Result<()> {
        let indices: Vec<u32> = text.chars().filter_map(Self::index_of).collect();
        for pair in indices.chunks(2) {
            match *pair {
                [first, second] => out.write_bits(first * 45 + second, 11)?,
                [single] => out.write_bits(single, 6)?,
                _ => {}
            }
        }
        Ok(())
    }
}
