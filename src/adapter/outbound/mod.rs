//! Outbound adapters (driven side).

pub mod http;
pub mod json;
pub mod opinion;
pub mod polymarket;
