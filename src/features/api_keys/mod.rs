//! API keys, served by the portal itself rather than the gateway.

pub mod client;
pub mod types;
