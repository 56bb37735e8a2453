//! BCH codes protecting the format and version information

use crate::models::{ECLevel, MaskPattern, Version};

const FORMAT_GENERATOR: u32 = 0x537;
const FORMAT_MASK: u16 = 0x5412;
const VERSION_GENERATOR: u32 = 0x1F25;

/// 15-bit format information: BCH(15,5) over ECL indicator and mask index,
/// XORed with 0x5412
pub fn format_bits(ec_level: ECLevel, mask: MaskPattern) -> u16 {
    let data = ((ec_level.format_bits() as u32) << 3) | mask.index() as u32;
    let mut rem = data;
    for _ in 0..10 {
        rem = (rem << 1) ^ ((rem >> 9) * FORMAT_GENERATOR);
    }
    (((data << 10) | rem) as u16) ^ FORMAT_MASK
}

/// 18-bit version information: BCH(18,6) over the version number
pub fn version_bits(version: Version) -> u32 {
    let data = version.number() as u32;
    let mut rem = data;
    for _ in 0..12 {
        rem = (rem << 1) ^ ((rem >> 11) * VERSION_GENERATOR);
    }
    (data << 12) | rem
}

/// Recover (ECL, mask) from a read-back format word, tolerating up to
/// three flipped bits
pub fn decode_format(bits: u16) -> Option<(ECLevel, MaskPattern)> {
    let mut best = None;
    let mut best_distance = u32::MAX;
    for ec_level in ECLevel::ALL {
        for mask in MaskPattern::ALL {
            let distance = (format_bits(ec_level, mask) ^ bits).count_ones();
            if distance < best_distance {
                best_distance = distance;
                best = Some((ec_level, mask));
            }
        }
    }
    best.filter(|_| best_distance <= 3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_format_words() {
        assert_eq!(format_bits(ECLevel::L, MaskPattern::Pattern0), 0b111011111000100);
        assert_eq!(format_bits(ECLevel::M, MaskPattern::Pattern0), 0x5412);
        assert_eq!(format_bits(ECLevel::H, MaskPattern::Pattern0), 0b001011010001001);
    }

    #[test]
    fn test_known_version_words() {
        assert_eq!(version_bits(Version::new(7).unwrap()), 0x07C94);
        assert_eq!(version_bits(Version::new(7).unwrap()) >> 12, 7);
        assert!(version_bits(Version::MAX) < 1 << 18);
    }

    #[test]
    fn test_format_words_are_distinct() {
        let mut words: Vec<u16> = ECLevel::ALL
            .iter()
            .flat_map(|&e| MaskPattern::ALL.iter().map(move |&m| format_bits(e, m)))
            .collect();
        words.sort_unstable();
        words.dedup();
        assert_eq!(words.len(), 32);
    }

    #[test]
    fn test_format_decode() {
        let word = format_bits(ECLevel::Q, MaskPattern::Pattern5);
        assert_eq!(decode_format(word), Some((ECLevel::Q, MaskPattern::Pattern5)));
        // Single and triple bit errors still decode
        assert_eq!(
            decode_format(word ^ 0b100),
            Some((ECLevel::Q, MaskPattern::Pattern5))
        );
        assert_eq!(
            decode_format(word ^ 0b1_0000_0100_0001),
            Some((ECLevel::Q, MaskPattern::Pattern5))
        );
    }
}
