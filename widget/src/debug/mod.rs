//! # Debug Module
//!
//! Logging setup for the host binary.

pub mod config;
pub mod logger;

pub use config::DebugConfig;
