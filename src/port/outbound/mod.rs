//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the infrastructure the engine depends on: the
//! HTTP transport, the two outcome providers, and registry persistence.

pub mod http;
pub mod market_data;
pub mod registry;
pub mod store;

pub use http::{HttpRequest, HttpResponse, HttpTransport};
pub use market_data::{EventData, MarketDataSource};
pub use registry::OutcomeRegistry;
pub use store::RegistryStore;
