//! rust_qr_encoder - QR code generation with optimal mode segmentation
//!
//! Text is split into numeric, alphanumeric and byte segments along the
//! cheapest path, the smallest fitting version and strongest fitting error
//! correction level are chosen, and the resulting codewords are drawn into a
//! bit-packed module grid.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// QR code encoding modules (segmentation, Reed-Solomon, symbol drawing)
#[allow(missing_docs)]
pub mod encoder;
/// Error taxonomy
pub mod error;
/// Tracing subscriber setup for binaries
pub mod logging;
/// Core data structures (QRCode, Grid, Version, ...)
pub mod models;
/// Helpers for command-line tools (text rendering, hex)
pub mod tools;

pub use encoder::modes::Mode;
pub use encoder::optimizer::{Bounds, Plan, Strategy};
pub use error::{QrError, Result};
pub use models::{ECLevel, Grid, MaskPattern, QRCode, Version};

use rayon::prelude::*;
use tracing::{debug, instrument};

use encoder::codewords::construct_codewords;
use encoder::optimizer::optimal_strategy;

/// Encoding parameters
///
/// Fixing `version` or `ecl` collapses the corresponding min/max pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Smallest version to consider
    pub min_version: Version,
    /// Largest version to consider
    pub max_version: Version,
    /// Lowest acceptable error correction level
    pub min_ecl: ECLevel,
    /// Highest error correction level to raise to
    pub max_ecl: ECLevel,
    /// Exact version, overriding the range
    pub version: Option<Version>,
    /// Exact error correction level, overriding the range
    pub ecl: Option<ECLevel>,
    /// Mask applied to the data modules
    pub mask: MaskPattern,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            min_version: Version::MIN,
            max_version: Version::MAX,
            min_ecl: ECLevel::L,
            max_ecl: ECLevel::H,
            version: None,
            ecl: None,
            mask: MaskPattern::default(),
        }
    }
}

impl EncodeOptions {
    /// Default options: any version, any level, mask 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the smallest version
    pub fn min_version(mut self, version: Version) -> Self {
        self.min_version = version;
        self
    }

    /// Set the largest version
    pub fn max_version(mut self, version: Version) -> Self {
        self.max_version = version;
        self
    }

    /// Set the lowest error correction level
    pub fn min_ecl(mut self, ecl: ECLevel) -> Self {
        self.min_ecl = ecl;
        self
    }

    /// Set the highest error correction level
    pub fn max_ecl(mut self, ecl: ECLevel) -> Self {
        self.max_ecl = ecl;
        self
    }

    /// Use exactly this version
    pub fn version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    /// Use exactly this error correction level
    pub fn ecl(mut self, ecl: ECLevel) -> Self {
        self.ecl = Some(ecl);
        self
    }

    /// Set the mask pattern
    pub fn mask(mut self, mask: MaskPattern) -> Self {
        self.mask = mask;
        self
    }

    /// Resolve fixed values and validate the ranges
    pub fn bounds(&self) -> Result<Bounds> {
        let (min_version, max_version) = match self.version {
            Some(v) => (v, v),
            None => (self.min_version, self.max_version),
        };
        let (min_ecl, max_ecl) = match self.ecl {
            Some(e) => (e, e),
            None => (self.min_ecl, self.max_ecl),
        };
        Bounds::new(min_version, max_version, min_ecl, max_ecl)
    }
}

/// Encode `data` into a QR symbol
///
/// # Arguments
/// * `data` - Text to encode
/// * `options` - Version/ECL bounds and mask
///
/// # Returns
/// The symbol, or [`QrError::DataTooLong`] if no allowed version holds the data
#[instrument(level = "debug", skip(data), fields(chars = data.chars().count()))]
pub fn encode(data: &str, options: &EncodeOptions) -> Result<QRCode> {
    let bounds = options.bounds()?;
    let plan = optimal_strategy(data, &bounds)?;
    let codewords = construct_codewords(data, &plan.strategy, plan.version, plan.ecl)?;
    debug!(
        version = %plan.version,
        ecl = ?plan.ecl,
        codewords = codewords.len(),
        "encoded symbol"
    );
    Ok(QRCode::new(plan.version, plan.ecl, options.mask, codewords))
}

/// Like [`encode`], then replace the mask with the lowest-penalty one
pub fn encode_with_best_mask(data: &str, options: &EncodeOptions) -> Result<QRCode> {
    Ok(encode(data, options)?.with_best_mask())
}

/// Encode many independent inputs in parallel, preserving input order
pub fn encode_batch<S>(inputs: &[S], options: &EncodeOptions) -> Vec<Result<QRCode>>
where
    S: AsRef<str> + Sync,
{
    inputs
        .par_iter()
        .map(|input| encode(input.as_ref(), options))
        .collect()
}
