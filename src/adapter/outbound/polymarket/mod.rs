//! Polymarket Gamma API integration (market data).

pub mod candidate;
pub mod client;
pub mod response;
pub mod settings;

pub use client::GammaClient;
pub use settings::PolymarketSettings;
