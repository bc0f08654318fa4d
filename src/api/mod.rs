//! Gateway access: the typed client and the response envelope it produces.
//!
//! Feature modules call the gateway through [`ApiClient`] only, so header
//! handling, timeouts and error normalization live in one place.

pub mod client;
pub mod envelope;

pub use client::{create_api_client, http_client, ApiClient, ClientOptions};
pub use envelope::{normalize_response, ApiError, ApiResponse, ResponseMetadata};

/// Marker payload for endpoints that answer with an empty or irrelevant body.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct NoContent {}
