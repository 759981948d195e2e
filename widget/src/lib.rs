//! # Donation Widget - Library Root
//!
//! Headless Solana donation and token swap widgets for a portfolio site.
//! This library crate contains all modules used by the binary crate (`main.rs`);
//! a UI host renders [`app::DonationState`] / [`app::SwapState`] and reacts to
//! [`app::AppEvent`]s.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │              donation-widget (this crate)              │
//! ├────────────────────────────────────────────────────────┤
//! │  DonationWidget  - form state, fee estimate, donate    │
//! │  SwapWidget      - token selection, debounced quotes   │
//! │  PollingTask     - network stats / history loops       │
//! └────────────────────────────────────────────────────────┘
//!          │                              │
//!          │ lib-solana                   │ async-channel
//!          ▼                              ▼
//! ┌─────────────────────────┐   ┌─────────────────────────┐
//! │ Solana RPC / swap API / │   │  Host (renders state,   │
//! │ price feed              │   │  shows toasts)          │
//! └─────────────────────────┘   └─────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`app`]: widgets, their state, events and background tasks
//! - [`core`]: service traits the widgets depend on
//! - [`debug`]: logging setup
//! - [`utils`]: display formatting

pub mod app;
pub mod core;
pub mod debug;
pub mod utils;

pub use app::{AppEvent, DonationWidget, DonationWidgetSettings, SwapWidget, ToastLevel};
