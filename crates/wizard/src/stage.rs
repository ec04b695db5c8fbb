//! Stage calculation.
//!
//! The stage is never stored on its own; it is recomputed from the summary
//! after every update.

use std::fmt;

use serde::Serialize;

use crate::summary::{Field, Summary};

/// Fields that advance the stage. `Recommendation` does not count, so a fully
/// answered summary tops out at the Decision stage.
pub const COUNTED_FIELDS: [Field; 5] = [
    Field::Problem,
    Field::Users,
    Field::Competition,
    Field::Differentiation,
    Field::Complexity,
];

pub const MAX_STAGE: u8 = 5;

const LABELS: [(&str, &str); 6] = [
    ("💡", "Problem"),
    ("🔍", "Solutions"),
    ("👥", "Users"),
    ("✨", "Edge"),
    ("⚙️", "Feasibility"),
    ("🎯", "Decision"),
];

/// Progress through the ideation guide, 0 ..= 5. Always derived from a
/// [`Summary`], never set directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Stage(u8);

impl Stage {
    pub fn from_summary(summary: &Summary) -> Self {
        let set = COUNTED_FIELDS.iter().filter(|f| summary.is_set(**f)).count();
        Stage(set.min(MAX_STAGE as usize) as u8)
    }

    pub fn index(&self) -> u8 {
        self.0
    }

    pub fn label(&self) -> &'static str {
        LABELS[self.0 as usize].1
    }

    pub fn icon(&self) -> &'static str {
        LABELS[self.0 as usize].0
    }

    /// All stages in order, for rendering a progress rail.
    pub fn all() -> impl Iterator<Item = Stage> {
        (0..=MAX_STAGE).map(Stage)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({}/{})", self.icon(), self.label(), self.0, MAX_STAGE)
    }
}
