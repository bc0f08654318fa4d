//! Typed wrappers for the gateway resources the portal manages.

pub mod api_keys;
pub mod enrichments;
pub mod teams;
pub mod users;
pub mod workspaces;
