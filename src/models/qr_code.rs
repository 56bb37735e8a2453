use std::fmt;
use std::str::FromStr;

use crate::error::{QrError, Result};

/// QR Code version (1-40, Model 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(u8);

impl Version {
    /// Smallest symbol (21x21)
    pub const MIN: Version = Version(1);
    /// Largest symbol (177x177)
    pub const MAX: Version = Version(40);

    /// Validate a version number
    pub fn new(number: u8) -> Result<Self> {
        if (1..=40).contains(&number) {
            Ok(Self(number))
        } else {
            Err(QrError::InvalidVersion(number))
        }
    }

    /// Get the version number
    pub fn number(&self) -> u8 {
        self.0
    }

    /// Get the size in modules (width = height)
    pub fn size(&self) -> usize {
        4 * self.0 as usize + 17
    }

    /// Character-count header widths change at versions 10 and 27
    pub fn tier(&self) -> usize {
        (self.0 as usize + 7) / 17
    }

    /// Next larger version, if any
    pub fn next(&self) -> Option<Version> {
        (self.0 < 40).then(|| Version(self.0 + 1))
    }

    /// All versions from `self` to `last`, inclusive
    pub fn range_to(self, last: Version) -> impl Iterator<Item = Version> {
        (self.0..=last.0).map(Version)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error correction level, ordered by increasing redundancy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ECLevel {
    /// Low (~7% recovery capacity)
    L = 0,
    /// Medium (~15% recovery capacity)
    M = 1,
    /// Quartile (~25% recovery capacity)
    Q = 2,
    /// High (~30% recovery capacity)
    H = 3,
}

impl ECLevel {
    /// All levels from lowest to highest redundancy
    pub const ALL: [ECLevel; 4] = [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H];

    /// Get error correction level from its ordinal (0=L, 1=M, 2=Q, 3=H)
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits & 0x03 {
            0 => Some(ECLevel::L),
            1 => Some(ECLevel::M),
            2 => Some(ECLevel::Q),
            3 => Some(ECLevel::H),
            _ => None,
        }
    }

    /// Ordinal used for table lookups and the symbol byte layout
    pub fn ordinal(&self) -> usize {
        *self as usize
    }

    /// 2-bit indicator written into the format information (01=L, 00=M, 11=Q, 10=H)
    pub fn format_bits(&self) -> u8 {
        match self {
            ECLevel::L => 1,
            ECLevel::M => 0,
            ECLevel::Q => 3,
            ECLevel::H => 2,
        }
    }

    /// Next higher level, if any
    pub fn next(&self) -> Option<ECLevel> {
        ECLevel::from_bits(self.ordinal() as u8 + 1).filter(|next| next > self)
    }
}

impl FromStr for ECLevel {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "l" | "low" => Ok(ECLevel::L),
            "m" | "medium" => Ok(ECLevel::M),
            "q" | "quartile" => Ok(ECLevel::Q),
            "h" | "high" => Ok(ECLevel::H),
            _ => Err(QrError::InvalidEcLevel(s.to_string())),
        }
    }
}

/// Mask pattern (0-7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MaskPattern {
    /// (i + j) % 2 == 0
    #[default]
    Pattern0 = 0,
    /// i % 2 == 0
    Pattern1 = 1,
    /// j % 3 == 0
    Pattern2 = 2,
    /// (i + j) % 3 == 0
    Pattern3 = 3,
    /// (i/2 + j/3) % 2 == 0
    Pattern4 = 4,
    /// (i*j)%2 + (i*j)%3 == 0
    Pattern5 = 5,
    /// ((i*j)%2 + (i*j)%3) % 2 == 0
    Pattern6 = 6,
    /// ((i+j)%2 + (i*j)%3) % 2 == 0
    Pattern7 = 7,
}

impl MaskPattern {
    /// All eight patterns in index order
    pub const ALL: [MaskPattern; 8] = [
        MaskPattern::Pattern0,
        MaskPattern::Pattern1,
        MaskPattern::Pattern2,
        MaskPattern::Pattern3,
        MaskPattern::Pattern4,
        MaskPattern::Pattern5,
        MaskPattern::Pattern6,
        MaskPattern::Pattern7,
    ];

    /// Get mask pattern from bits
    pub fn from_bits(bits: u8) -> Option<Self> {
        Self::ALL.get(bits as usize).copied()
    }

    /// Like [`MaskPattern::from_bits`] but reports the bad index
    pub fn new(index: u8) -> Result<Self> {
        Self::from_bits(index).ok_or(QrError::InvalidMask(index))
    }

    /// Pattern index 0-7
    pub fn index(&self) -> u8 {
        *self as u8
    }

    /// Check if module at row `i`, column `j` should be flipped
    pub fn is_masked(&self, i: usize, j: usize) -> bool {
        match self {
            MaskPattern::Pattern0 => (i + j) % 2 == 0,
            MaskPattern::Pattern1 => i % 2 == 0,
            MaskPattern::Pattern2 => j % 3 == 0,
            MaskPattern::Pattern3 => (i + j) % 3 == 0,
            MaskPattern::Pattern4 => (i / 2 + j / 3) % 2 == 0,
            MaskPattern::Pattern5 => ((i * j) % 2 + (i * j) % 3) == 0,
            MaskPattern::Pattern6 => (((i * j) % 2) + ((i * j) % 3)) % 2 == 0,
            MaskPattern::Pattern7 => (((i + j) % 2) + ((i * j) % 3)) % 2 == 0,
        }
    }
}

/// An encoded QR symbol: the immutable state every module grid is derived from.
///
/// Pattern grids (finder, timing, data, ...) are recomputed on demand by the
/// methods in `encoder::matrix`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QRCode {
    /// QR code version
    pub version: Version,
    /// Error correction level
    pub error_correction: ECLevel,
    /// Mask pattern used
    pub mask_pattern: MaskPattern,
    /// Final interleaved data + parity codewords
    pub codewords: Vec<u8>,
}

impl QRCode {
    /// Create a new QR code from already assembled codewords
    pub fn new(
        version: Version,
        error_correction: ECLevel,
        mask_pattern: MaskPattern,
        codewords: Vec<u8>,
    ) -> Self {
        Self {
            version,
            error_correction,
            mask_pattern,
            codewords,
        }
    }

    /// Side length in modules
    pub fn size(&self) -> usize {
        self.version.size()
    }

    /// Same symbol with a different mask
    pub fn with_mask(&self, mask_pattern: MaskPattern) -> Self {
        Self {
            mask_pattern,
            ..self.clone()
        }
    }

    /// Serialize as `[version, (ecl << 3) | (mask << 5), codewords...]`
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.codewords.len() + 2);
        bytes.push(self.version.number());
        bytes.push(
            ((self.error_correction.ordinal() as u8 & 0b11) << 3)
                | ((self.mask_pattern.index() & 0b111) << 5),
        );
        bytes.extend_from_slice(&self.codewords);
        bytes
    }

    /// Inverse of [`QRCode::to_bytes`]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let [version, header, codewords @ ..] = bytes else {
            return Err(QrError::TruncatedSymbol(bytes.len()));
        };
        let version = Version::new(*version)?;
        let ecl = ECLevel::from_bits((header >> 3) & 0b11)
            .ok_or_else(|| QrError::InvalidEcLevel(format!("{header:#04x}")))?;
        let mask = MaskPattern::new((header >> 5) & 0b111)?;
        Ok(Self::new(version, ecl, mask, codewords.to_vec()))
    }
}

impl fmt::Display for QRCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(QRCode) version:{}, ecl:{:?}, mask:{}",
            self.version,
            self.error_correction,
            self.mask_pattern.index()
        )
    }
}
