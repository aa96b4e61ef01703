//! Diff paths into a snapshot tree.
//!
//! Textual form is the differ notation: steps joined with `->`, index steps
//! written as `[n]`, e.g. `nodes->1:2->document->children->[0]`. That form
//! is for people; it cannot tell an empty or bracketed key from the root or
//! an index, so serde uses a JSON array of steps instead:
//! `["nodes", "1:2", "document", "children", 0]`.

use crate::errors::FigwatchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Text joining steps in the textual form.
pub const STEP_SEPARATOR: &str = "->";

/// One step through a snapshot tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathStep {
    /// Descend into a map under this key
    Key(String),
    /// Descend into a sequence at this position
    Index(usize),
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Key(k) => f.write_str(k),
            PathStep::Index(i) => write!(f, "[{}]", i),
        }
    }
}

/// Ordered sequence of steps, relative to the snapshot it was derived from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<PathStep>);

impl Path {
    /// The empty path (the tree root).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn from_steps(steps: Vec<PathStep>) -> Self {
        Self(steps)
    }

    /// Parse the differ's textual notation.
    ///
    /// # Errors
    ///
    /// `InvalidPath` when a segment is empty or an `[..]` segment is not a
    /// non-negative integer.
    pub fn parse(text: &str) -> Result<Self, FigwatchError> {
        if text.is_empty() {
            return Ok(Self::root());
        }
        let mut steps = Vec::new();
        for segment in text.split(STEP_SEPARATOR) {
            if segment.is_empty() {
                return Err(FigwatchError::InvalidPath {
                    path: text.to_string(),
                    reason: "empty step".to_string(),
                });
            }
            match segment.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
                Some(digits) => {
                    let index = digits.parse::<usize>().map_err(|_| FigwatchError::InvalidPath {
                        path: text.to_string(),
                        reason: format!("index step `{}` is not a position", segment),
                    })?;
                    steps.push(PathStep::Index(index));
                }
                None => steps.push(PathStep::Key(segment.to_string())),
            }
        }
        Ok(Self(steps))
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// This path extended by a key step.
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut steps = self.0.clone();
        steps.push(PathStep::Key(key.into()));
        Self(steps)
    }

    /// This path extended by an index step.
    pub fn index(&self, index: usize) -> Self {
        let mut steps = self.0.clone();
        steps.push(PathStep::Index(index));
        Self(steps)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(STEP_SEPARATOR)?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = FigwatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}
