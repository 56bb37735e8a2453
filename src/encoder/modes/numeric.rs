use crate::encoder::bits::BitBuffer;
use crate::error::Result;

/// Numeric mode encoder (Mode 0001)
/// Groups of 3 digits = 10 bits, 2 digits = 7 bits, 1 digit = 4 bits
pub struct NumericEncoder;

impl NumericEncoder {
    /// Append digits to `out`; the caller guarantees every char is 0-9
    pub fn encode(digits: &str, out: &mut BitBuffer) -> Result<()> {
        for group in digits.as_bytes().chunks(3) {
            let value = group
                .iter()
                .fold(0u32, |acc, &d| acc * 10 + (d - b'0') as u32);
            let width = group.len() as u8 * 3 + 1;
            out.write_bits(value, width)?;
        }
        Ok(())
    }
}
