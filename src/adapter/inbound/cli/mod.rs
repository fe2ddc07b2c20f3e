//! CLI module graph.

pub mod build;
pub mod command;
