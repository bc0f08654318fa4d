pub mod linkedin;
pub mod playground;
pub mod resources;
pub mod status;

// Internal "interpreter" for `Action`.
// We keep the match in a separate module so `mod.rs` stays small as more actions are added.
mod run;

use anyhow::Result;
use serde::Serialize;

#[derive(Debug)]
pub enum Action {
    Resource(resources::Args),
    Status(status::Args),
    LinkedInConnect(linkedin::Args),
    Playground(playground::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> Result<()> {
        run::execute(self).await
    }
}

/// Writes `value` to stdout as pretty JSON.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
