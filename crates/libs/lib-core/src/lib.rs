//! # Core Library
//!
//! Error taxonomy and configuration shared by the donation and swap crates.

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::{Config, core_config, init_config};
pub use error::{AppError, Result, LAMPORTS_PER_SOL};
