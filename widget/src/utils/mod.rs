//! # Utilities
//!
//! Display helpers for amounts, signatures and links.

pub mod format;

pub use format::*;
