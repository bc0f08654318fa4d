//! Current user, organization members and pending invites.

pub mod client;
pub mod types;
