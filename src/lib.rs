//! # Portal
//!
//! Client-side communication layer of the enrichment portal: a typed gateway
//! client, generic integration-status polling, the LinkedIn live-session
//! connect flow and the scripted enrichment demo.
//!
//! ## Response envelope
//!
//! Every gateway call resolves to an [`api::ApiResponse`] of the shape
//! `{success, data, error, metadata}`. Transport failures, non-2xx statuses
//! and malformed bodies are all folded into that envelope, so callers branch
//! on `success` instead of handling transport errors:
//!
//! - no response: `NETWORK_ERROR`
//! - non-2xx without a structured error body: `HTTP_<status>`
//! - a body that already carries a boolean `success` is passed through, anything
//!   else is wrapped as `data`
//!
//! A body whose own top-level `success` field is not part of the envelope
//! contract is indistinguishable from an envelope and is passed through as one.
//!
//! ## Status polling
//!
//! [`polling::StatusPoller`] drives one provider's health resource and keeps
//! refetching while the mapped status is `pending`. Providers plug in through
//! [`polling::StatusMapper`]; [`integrations`] holds the LinkedIn, `HubSpot`,
//! Salesforce and Dynamics mappers. An error carrying `details.configured =
//! false` is reported as `disconnected`, not as a failure.
//!
//! ## Resources
//!
//! [`resource::ResourceController`] loads teams, workspaces, members or
//! invites once and refetches on demand. Query parameters are passed in
//! explicitly with `set_query`.

pub mod api;
pub mod cli;
pub mod config;
pub mod features;
pub mod integrations;
pub mod playground;
pub mod polling;
pub mod resource;
