//! Deterministic step-by-step replay of an episode.

use crate::core::types::Step;
use crate::kinematics::{KinematicsConverter, WheelDuty};

/// A step paired with its recovered duty cycles.
#[derive(Debug, Clone, Copy)]
pub struct ReplayStep<'a> {
    /// Position within the episode
    pub index: usize,
    /// The recorded step
    pub step: &'a Step,
    /// Linear command
    pub linear: f64,
    /// Angular command
    pub angular: f64,
    /// Clamped duty cycles for the command
    pub duty: WheelDuty,
}

/// Replay steps through the converter without touching them.
///
/// Steps whose action does not have two components are skipped; they
/// cannot reach a buffer or a decoded log record.
pub fn replay<'a>(
    steps: &'a [Step],
    converter: &'a KinematicsConverter,
) -> impl Iterator<Item = ReplayStep<'a>> + 'a {
    steps.iter().enumerate().filter_map(move |(index, step)| {
        let (linear, angular) = step.command()?;
        Some(ReplayStep {
            index,
            step,
            linear,
            angular,
            duty: converter.convert(linear, angular),
        })
    })
}

/// One human-readable telemetry line.
pub fn telemetry_line(replay: &ReplayStep<'_>) -> String {
    format!(
        "Linear: {:.2} Angular: {:.2} Left PWM: {:.3} Right PWM: {:.3} Reward: {:.2}",
        replay.linear, replay.angular, replay.duty.left, replay.duty.right, replay.step.reward
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::episode_log::LogTestFixture;

    #[test]
    fn test_replay_matches_converter() {
        let episode = LogTestFixture::episode(5);
        let converter = KinematicsConverter::default();

        let replayed: Vec<_> = replay(&episode.steps, &converter).collect();
        assert_eq!(replayed.len(), 5);
        for (i, r) in replayed.iter().enumerate() {
            assert_eq!(r.index, i);
            let (v, w) = episode.steps[i].command().unwrap();
            assert_eq!(r.duty, converter.convert(v, w));
        }
    }

    #[test]
    fn test_replay_is_repeatable() {
        let episode = LogTestFixture::episode(3);
        let converter = KinematicsConverter::default();

        let first: Vec<_> = replay(&episode.steps, &converter).map(|r| r.duty).collect();
        let second: Vec<_> = replay(&episode.steps, &converter).map(|r| r.duty).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_telemetry_line_format() {
        let episode = LogTestFixture::episode(1);
        let converter = KinematicsConverter::default();
        let r = replay(&episode.steps, &converter).next().unwrap();

        let line = telemetry_line(&r);
        assert!(line.starts_with("Linear: 0.10 Angular: 0.50 Left PWM: "));
        assert!(line.ends_with("Reward: 1.00"));
    }
}
