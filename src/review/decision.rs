//! Operator commit/discard decisions.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use crate::error::Result;

/// Prompt shown while an episode awaits a decision.
pub const REVIEW_PROMPT: &str = "1 or commit to keep, 2 or discard to drop: ";

/// The two accepted review answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    /// Persist the episode to the log
    Commit,
    /// Drop the episode
    Discard,
}

impl ReviewDecision {
    /// Parse an operator answer; `None` means ask again.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "1" | "commit" => Some(Self::Commit),
            "2" | "discard" => Some(Self::Discard),
            _ => None,
        }
    }
}

/// Where review answers come from.
pub trait DecisionSource {
    /// Show `prompt` and return the raw answer.
    ///
    /// `Ok(None)` means the input is exhausted.
    fn prompt(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Line-oriented prompt over any reader/writer pair.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl TerminalPrompt<std::io::StdinLock<'static>, std::io::Stdout> {
    /// Prompt on the process terminal.
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> DecisionSource for TerminalPrompt<R, W> {
    fn prompt(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

/// Pre-recorded answers, consumed in order.
#[derive(Debug, Default)]
pub struct ScriptedDecisions {
    answers: VecDeque<String>,
    prompts_shown: usize,
}

impl ScriptedDecisions {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts_shown: 0,
        }
    }

    /// Append another answer.
    pub fn push(&mut self, answer: impl Into<String>) {
        self.answers.push_back(answer.into());
    }

    /// How many times a prompt was shown.
    pub fn prompts_shown(&self) -> usize {
        self.prompts_shown
    }

    /// Answers not yet consumed.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl DecisionSource for ScriptedDecisions {
    fn prompt(&mut self, _prompt: &str) -> Result<Option<String>> {
        self.prompts_shown += 1;
        Ok(self.answers.pop_front())
    }
}
