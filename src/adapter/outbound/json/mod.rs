//! JSON file persistence.

pub mod store;

pub use store::JsonFileStore;
