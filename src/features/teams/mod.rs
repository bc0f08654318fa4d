//! Teams inside an organization and their membership.

pub mod client;
pub mod types;
