//! # Async Tasks
//!
//! Background work for the widgets: scoped polling loops and the network
//! refresh functions they run.

pub mod network;
pub mod polling;

pub use polling::PollingTask;
