//! Operator commands and control samples

/// Semantic operator commands, resolved at the input adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorCommand {
    /// End the current episode and review it
    Reset,
    /// Accept the episode under review
    Commit,
    /// Reject the episode under review
    Discard,
    /// Stop the session
    Quit,
}

impl OperatorCommand {
    /// Get command name as string
    pub fn name(&self) -> &'static str {
        match self {
            Self::Reset => "reset",
            Self::Commit => "commit",
            Self::Discard => "discard",
            Self::Quit => "quit",
        }
    }

    /// Check if this command only makes sense while reviewing
    pub fn is_review_decision(&self) -> bool {
        matches!(self, Self::Commit | Self::Discard)
    }
}

/// One poll of the driving input.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlInput {
    /// Linear command (forward positive)
    pub linear: f64,
    /// Angular command (counter-clockwise positive)
    pub angular: f64,
    /// Button press accompanying this sample, if any
    pub command: Option<OperatorCommand>,
}

impl ControlInput {
    /// Driving sample with no button pressed
    pub fn drive(linear: f64, angular: f64) -> Self {
        Self {
            linear,
            angular,
            command: None,
        }
    }

    /// Button press with the sticks centred
    pub fn command(command: OperatorCommand) -> Self {
        Self {
            linear: 0.0,
            angular: 0.0,
            command: Some(command),
        }
    }

    /// Both commands are zero after rounding to two decimals.
    pub fn is_idle(&self) -> bool {
        round2(self.linear) == 0.0 && round2(self.angular) == 0.0
    }

    /// Action vector handed to the simulator.
    pub fn action(&self) -> [f64; 2] {
        [self.linear, self.angular]
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_detection() {
        assert!(ControlInput::drive(0.0, 0.0).is_idle());
        assert!(ControlInput::drive(0.004, -0.003).is_idle());
        assert!(!ControlInput::drive(0.006, 0.0).is_idle());
        assert!(!ControlInput::drive(0.0, -0.3).is_idle());
        assert!(ControlInput::command(OperatorCommand::Reset).is_idle());
    }

    #[test]
    fn test_review_decisions() {
        assert!(OperatorCommand::Commit.is_review_decision());
        assert!(OperatorCommand::Discard.is_review_decision());
        assert!(!OperatorCommand::Reset.is_review_decision());
        assert!(!OperatorCommand::Quit.is_review_decision());
        assert_eq!(OperatorCommand::Quit.name(), "quit");
    }

    #[test]
    fn test_action_order() {
        assert_eq!(ControlInput::drive(0.4, -0.2).action(), [0.4, -0.2]);
    }
}
