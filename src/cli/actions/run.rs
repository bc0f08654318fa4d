use crate::cli::actions::{linkedin, playground, resources, status, Action};
use anyhow::Result;

/// Execute the provided action.
// This is the single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Resource(args) => resources::execute(args).await,
        Action::Status(args) => status::execute(args).await,
        Action::LinkedInConnect(args) => linkedin::execute(args).await,
        Action::Playground(args) => playground::execute(args).await,
    }
}
