//! Opinion OpenAPI integration (outcome registry).

pub mod client;
pub mod dto;
pub mod settings;

pub use client::{ApiKeyRing, OpinionClient};
pub use settings::OpinionSettings;
