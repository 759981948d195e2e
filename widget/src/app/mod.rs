//! # Application Module
//!
//! Widget state, events and the background tasks that feed them.

pub mod donation;
pub mod events;
pub mod state;
pub mod swap;
pub mod tasks;

pub use donation::{DonationWidget, DonationWidgetSettings};
pub use events::{AppEvent, ToastLevel};
pub use state::{DonationState, SwapState};
pub use swap::SwapWidget;
