/// Bit-packed module grid
pub mod grid;
/// Symbol, version, error correction level and mask types
pub mod qr_code;

pub use grid::Grid;
pub use qr_code::{ECLevel, MaskPattern, QRCode, Version};
