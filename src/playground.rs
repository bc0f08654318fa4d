//! Scripted enrichment demo for first-time users.
//!
//! Nothing here talks to the gateway. [`playback_steps`] produces an ordered
//! list of timed steps (source state changes, log lines, and a final mock
//! result) and [`play`] replays them on the tokio clock.

use rand::Rng;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::sleep;

pub const SOURCES: [&str; 4] = ["linkedin", "hunter", "perplexity", "tavily"];

pub const MIN_STEP_DELAY_MS: u64 = 500;
pub const MAX_STEP_DELAY_MS: u64 = 1_500;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceState {
    Pending,
    Processing,
    Complete,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaybackAction {
    Source {
        source: &'static str,
        state: SourceState,
    },
    Log {
        message: String,
    },
    Result {
        result: Value,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlaybackStep {
    /// Wait before applying the action.
    #[serde(rename = "delayMs", serialize_with = "as_millis")]
    pub delay: Duration,
    #[serde(flatten)]
    pub action: PlaybackAction,
}

fn as_millis<S: serde::Serializer>(delay: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(delay.as_millis()).unwrap_or(u64::MAX))
}

/// Builds the demo script for `input` (an email address or profile URL).
pub fn playback_steps<R: Rng + ?Sized>(rng: &mut R, input: &str) -> Vec<PlaybackStep> {
    let input = input.trim();
    let mut steps = Vec::with_capacity(SOURCES.len() * 4 + 2);

    steps.push(PlaybackStep {
        delay: Duration::ZERO,
        action: PlaybackAction::Log {
            message: format!("Starting enrichment for {input}"),
        },
    });
    for source in SOURCES {
        steps.push(PlaybackStep {
            delay: Duration::ZERO,
            action: PlaybackAction::Source {
                source,
                state: SourceState::Pending,
            },
        });
    }

    for source in SOURCES {
        for (state, verb) in [
            (SourceState::Processing, "Querying"),
            (SourceState::Complete, "Received data from"),
        ] {
            let delay = Duration::from_millis(rng.gen_range(MIN_STEP_DELAY_MS..=MAX_STEP_DELAY_MS));
            steps.push(PlaybackStep {
                delay,
                action: PlaybackAction::Source { source, state },
            });
            steps.push(PlaybackStep {
                delay: Duration::ZERO,
                action: PlaybackAction::Log {
                    message: format!("{verb} {source}"),
                },
            });
        }
    }

    steps.push(PlaybackStep {
        delay: Duration::ZERO,
        action: PlaybackAction::Result {
            result: mock_result(input),
        },
    });
    steps
}

/// Total wall time the script takes to replay.
#[must_use]
pub fn total_duration(steps: &[PlaybackStep]) -> Duration {
    steps.iter().map(|step| step.delay).sum()
}

/// Replays `steps`, handing each action to `sink` once its delay elapsed.
pub async fn play(steps: Vec<PlaybackStep>, mut sink: impl FnMut(PlaybackAction)) {
    for step in steps {
        if !step.delay.is_zero() {
            sleep(step.delay).await;
        }
        sink(step.action);
    }
}

/// Canned result; only the echoed input varies.
#[must_use]
pub fn mock_result(input: &str) -> Value {
    let email = if input.contains('@') {
        input.to_string()
    } else {
        "jordan.lee@example.com".to_string()
    };
    let linkedin_url = if input.contains("linkedin.com") {
        input.to_string()
    } else {
        "https://www.linkedin.com/in/jordan-lee-example".to_string()
    };

    json!({
        "input": input,
        "person": {
            "fullName": "Jordan Lee",
            "title": "VP of Revenue Operations",
            "email": email,
            "phone": "+1 415 555 0142",
            "linkedinUrl": linkedin_url,
            "location": "San Francisco, CA"
        },
        "company": {
            "name": "Example Corp",
            "domain": "example.com",
            "industry": "Software",
            "employeeRange": "201-500"
        },
        "confidence": {
            "overall": 0.92,
            "email": 0.95,
            "phone": 0.78,
            "title": 0.9,
            "company": 0.97
        },
        "sources": SOURCES,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashMap;

    fn source_transitions(steps: &[PlaybackStep]) -> HashMap<&'static str, Vec<SourceState>> {
        let mut transitions: HashMap<&'static str, Vec<SourceState>> = HashMap::new();
        for step in steps {
            if let PlaybackAction::Source { source, state } = step.action {
                transitions.entry(source).or_default().push(state);
            }
        }
        transitions
    }

    #[test]
    fn every_source_goes_pending_processing_complete() {
        let mut rng = StdRng::seed_from_u64(7);
        let steps = playback_steps(&mut rng, "dana@example.com");
        let transitions = source_transitions(&steps);

        assert_eq!(transitions.len(), SOURCES.len());
        for source in SOURCES {
            assert_eq!(
                transitions[source],
                vec![
                    SourceState::Pending,
                    SourceState::Processing,
                    SourceState::Complete
                ]
            );
        }
    }

    #[test]
    fn delays_stay_in_range_and_result_comes_last() {
        let mut rng = StdRng::seed_from_u64(42);
        let steps = playback_steps(&mut rng, "https://www.linkedin.com/in/dana");

        for step in &steps {
            let ms = u64::try_from(step.delay.as_millis()).unwrap();
            assert!(ms == 0 || (MIN_STEP_DELAY_MS..=MAX_STEP_DELAY_MS).contains(&ms));
        }
        let timed = steps.iter().filter(|step| !step.delay.is_zero()).count();
        assert_eq!(timed, SOURCES.len() * 2);

        match &steps.last().unwrap().action {
            PlaybackAction::Result { result } => {
                assert_eq!(result["person"]["linkedinUrl"], "https://www.linkedin.com/in/dana");
                assert_eq!(result["confidence"]["overall"], 0.92);
            }
            other => panic!("unexpected final action {other:?}"),
        }
    }

    #[test]
    fn one_log_line_per_transition() {
        let mut rng = StdRng::seed_from_u64(1);
        let steps = playback_steps(&mut rng, "dana@example.com");
        let logs = steps
            .iter()
            .filter(|step| matches!(step.action, PlaybackAction::Log { .. }))
            .count();
        // Start line plus processing/complete for each source.
        assert_eq!(logs, 1 + SOURCES.len() * 2);
    }

    #[test]
    fn step_serializes_for_the_ui() {
        let step = PlaybackStep {
            delay: Duration::from_millis(750),
            action: PlaybackAction::Source {
                source: "hunter",
                state: SourceState::Processing,
            },
        };
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["delayMs"], 750);
        assert_eq!(json["type"], "source");
        assert_eq!(json["state"], "processing");
    }

    #[tokio::test(start_paused = true)]
    async fn play_waits_for_each_delay() {
        let mut rng = StdRng::seed_from_u64(9);
        let steps = playback_steps(&mut rng, "dana@example.com");
        let expected = total_duration(&steps);
        let count = steps.len();

        let started = tokio::time::Instant::now();
        let mut seen = Vec::new();
        play(steps, |action| seen.push(action)).await;

        assert_eq!(seen.len(), count);
        assert_eq!(started.elapsed(), expected);
        assert!(matches!(seen.last(), Some(PlaybackAction::Result { .. })));
    }
}
