use crate::encoder::modes::Mode;
use thiserror::Error;

/// Result alias used across the encoder.
pub type Result<T> = std::result::Result<T, QrError>;

/// Everything that can go wrong while building a symbol.
///
/// Only [`QrError::DataTooLong`] is a user-correctable condition. The rest
/// indicate a caller bug or a defect in the static tables and should be
/// treated as assertion failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QrError {
    /// GF(256) operand outside 0..=255
    #[error("byte out of range: {0}")]
    InvalidByte(u32),

    /// Reed-Solomon generator degree outside 1..=255
    #[error("Reed-Solomon degree out of range: {0}")]
    InvalidDegree(usize),

    /// Value written to the bit buffer does not fit its field width
    #[error("value {value} does not fit in {width} bits")]
    ValueOutOfRange {
        /// Value that was written
        value: u32,
        /// Field width in bits
        width: u8,
    },

    /// No (version, ECL) combination inside the requested bounds fits the input
    #[error("data too long: needs {needed_bits} bits, largest allowed symbol holds {capacity_bits}")]
    DataTooLong {
        /// Bits needed at the largest version, or a lower bound from the length pre-check
        needed_bits: usize,
        /// Data capacity of the largest allowed symbol
        capacity_bits: usize,
    },

    /// Internal length mismatch between the capacity tables and the layout
    #[error("encoding invariant violated: {0}")]
    EncodingInvariantViolation(String),

    /// Version number outside 1..=40
    #[error("version {0} outside 1..=40")]
    InvalidVersion(u8),

    /// Mask index outside 0..=7
    #[error("mask {0} outside 0..=7")]
    InvalidMask(u8),

    /// Unparseable error correction level name
    #[error("invalid error correction level: {0:?}")]
    InvalidEcLevel(String),

    /// Inverted version or ECL range
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// A strategy assigned a character to a mode that cannot represent it
    #[error("character {ch:?} cannot be encoded in {mode:?} mode")]
    UnencodableCharacter {
        /// Offending character
        ch: char,
        /// Mode the strategy assigned to it
        mode: Mode,
    },

    /// Symbol byte layout shorter than its two header bytes
    #[error("symbol bytes too short: {0} bytes")]
    TruncatedSymbol(usize),

    /// Reed-Solomon verification decoder gave up
    #[error("uncorrectable codeword block: {0}")]
    Uncorrectable(&'static str),
}
