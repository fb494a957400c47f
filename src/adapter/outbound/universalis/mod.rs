//! Universalis-style market board REST adapter.

pub mod client;
pub mod settings;

pub use client::MarketDataClient;
pub use settings::MarketConfig;
