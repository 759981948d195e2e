//! # Core Module
//!
//! Service traits the widgets depend on.

pub mod service;

pub use service::{NetworkFeed, QuoteService};
