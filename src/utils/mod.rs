//! Utility functions for short code derivation.
//!
//! - [`code_generator`] - SHA-256 based deterministic short codes
//! - [`base58`] - Base58 rendering of 64-bit values

pub mod base58;
pub mod code_generator;
