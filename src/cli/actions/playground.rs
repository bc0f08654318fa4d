//! Replays the scripted enrichment demo, one JSON action per line.

use crate::cli::actions::print_json;
use crate::playground::{play, playback_steps, total_duration};
use anyhow::Result;
use rand::{rngs::StdRng, SeedableRng};
use tracing::{info, warn};

#[derive(Debug)]
pub struct Args {
    pub input: String,
    pub seed: Option<u64>,
    /// Print the whole script at once instead of replaying it.
    pub no_delay: bool,
}

/// # Errors
/// Returns an error if the script cannot be serialized.
pub async fn execute(args: Args) -> Result<()> {
    let mut rng = args.seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
    let steps = playback_steps(&mut rng, &args.input);

    if args.no_delay {
        return print_json(&steps);
    }

    info!(steps = steps.len(), duration_ms = total_duration(&steps).as_millis(), "replaying demo");
    play(steps, |action| match serde_json::to_string(&action) {
        Ok(line) => println!("{line}"),
        Err(err) => warn!("failed to serialize playback action: {err}"),
    })
    .await;
    Ok(())
}
