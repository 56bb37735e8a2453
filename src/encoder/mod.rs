//! QR code encoding pipeline
//!
//! - `tables`: Reed-Solomon block layout and capacity per (version, ECL)
//! - `reed_solomon`: GF(256) arithmetic, generator and parity computation
//! - `bits` / `modes`: bit writer and numeric, alphanumeric, byte encoders
//! - `optimizer`: minimal mode segmentation, version/ECL selection, strategy enumeration
//! - `segment` / `codewords`: serialization, padding, block split and interleave
//! - `bch` / `function_patterns` / `placement` / `matrix`: symbol drawing
//! - `penalty`: mask scoring and automatic selection

pub mod bch;
pub mod bits;
pub mod codewords;
pub mod config;
pub mod function_patterns;
pub mod matrix;
pub mod modes;
pub mod optimizer;
pub mod penalty;
pub mod placement;
pub mod reed_solomon;
pub mod segment;
pub mod tables;
