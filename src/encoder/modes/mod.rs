//! QR code data mode encoders
//!
//! This module contains encoders for the supported data modes:
//! - Numeric: Efficient encoding for digits (0-9)
//! - Alphanumeric: Digits, upper-case letters, and nine symbols
//! - Byte: UTF-8 bytes of any character

pub mod alphanumeric;
pub mod byte;
pub mod numeric;

use std::fmt;

use crate::encoder::bits::BitBuffer;
use crate::error::{QrError, Result};
use crate::models::Version;

use alphanumeric::AlphanumericEncoder;
use byte::ByteEncoder;
use numeric::NumericEncoder;

/// Data mode of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Mode 0001
    Numeric,
    /// Mode 0010
    Alphanumeric,
    /// Mode 0100
    Byte,
}

impl Mode {
    /// All modes in enumeration order
    pub const ALL: [Mode; 3] = [Mode::Numeric, Mode::Alphanumeric, Mode::Byte];

    /// 4-bit mode indicator
    pub fn mode_bits(&self) -> u32 {
        match self {
            Mode::Numeric => 0b0001,
            Mode::Alphanumeric => 0b0010,
            Mode::Byte => 0b0100,
        }
    }

    /// Width of the character count field at `version`
    pub fn char_count_bits(&self, version: Version) -> u8 {
        let widths = match self {
            Mode::Numeric => [10, 12, 14],
            Mode::Alphanumeric => [9, 11, 13],
            Mode::Byte => [8, 16, 16],
        };
        widths[version.tier()]
    }

    /// Mode indicator plus count field
    pub fn header_bits(&self, version: Version) -> u32 {
        4 + self.char_count_bits(version) as u32
    }

    /// Characters packed into one field (3 digits, 2 alphanumerics, 1 char)
    pub fn group_size(&self) -> usize {
        match self {
            Mode::Numeric => 3,
            Mode::Alphanumeric => 2,
            Mode::Byte => 1,
        }
    }

    pub fn can_encode(&self, c: char) -> bool {
        match self {
            Mode::Numeric => c.is_ascii_digit(),
            Mode::Alphanumeric => AlphanumericEncoder::index_of(c).is_some(),
            Mode::Byte => true,
        }
    }

    /// Average bits per character, or `None` if `c` is not representable
    pub fn amortized_cost(&self, c: char) -> Option<f64> {
        if !self.can_encode(c) {
            return None;
        }
        Some(match self {
            Mode::Numeric => 10.0 / 3.0,
            Mode::Alphanumeric => 5.5,
            Mode::Byte => 8.0 * c.len_utf8() as f64,
        })
    }

    /// Exact bits added by `c` when it lands at `phase` within its group.
    ///
    /// Summing these over a segment yields exactly its payload length: a
    /// numeric group of 1/2/3 digits costs 4/7/10 bits, an alphanumeric
    /// single/pair 6/11 bits.
    pub fn marginal_bits(&self, c: char, phase: usize) -> Option<u32> {
        if !self.can_encode(c) {
            return None;
        }
        Some(match self {
            Mode::Numeric => {
                if phase % 3 == 0 {
                    4
                } else {
                    3
                }
            }
            Mode::Alphanumeric => {
                if phase % 2 == 0 {
                    6
                } else {
                    5
                }
            }
            Mode::Byte => 8 * c.len_utf8() as u32,
        })
    }

    /// Number of characters the count field reports for `text`
    pub fn char_count(&self, text: &str) -> usize {
        match self {
            Mode::Byte => text.len(),
            _ => text.chars().count(),
        }
    }

    /// Append the payload bits of `text` (no header)
    pub fn encode(&self, text: &str, out: &mut BitBuffer) -> Result<()> {
        if let Some(ch) = text.chars().find(|&c| !self.can_encode(c)) {
            return Err(QrError::UnencodableCharacter { ch, mode: *self });
        }
        match self {
            Mode::Numeric => NumericEncoder::encode(text, out),
            Mode::Alphanumeric => AlphanumericEncoder::encode(text, out),
            Mode::Byte => ByteEncoder::encode(text, out),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Numeric => "numeric",
            Mode::Alphanumeric => "alphanumeric",
            Mode::Byte => "byte",
        };
        f.write_str(name)
    }
}
