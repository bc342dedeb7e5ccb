//! Ordered sequence of steps from reset to termination.

use serde::{Deserialize, Serialize};

use super::step::Step;

/// One continuous driving session.
///
/// Step order is temporal and preserved through serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub steps: Vec<Step>,
}

impl Episode {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    /// Sum of rewards over all steps.
    pub fn total_reward(&self) -> f64 {
        self.steps.iter().map(|s| s.reward).sum()
    }

    /// Whether the last step reported termination.
    pub fn terminated(&self) -> bool {
        self.steps.last().is_some_and(|s| s.done)
    }
}

impl<'a> IntoIterator for &'a Episode {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
