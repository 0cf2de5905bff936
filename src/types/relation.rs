//! Answers to ordering queries.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Order of one point relative to another.
///
/// `Unknown` is a valid answer: the known facts do not order the two points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    /// The first point is before-or-at the second.
    Before,
    /// The first point is after-or-at the second.
    After,
    /// Both are the same point, or the same rank on one chain.
    Same,
    /// Neither point reaches the other.
    Unknown,
}

impl Relation {
    /// Relation seen from the other point.
    pub fn inverse(self) -> Self {
        match self {
            Self::Before => Self::After,
            Self::After => Self::Before,
            other => other,
        }
    }

    /// Whether the answer orders the two points.
    pub fn is_determined(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Relation implied by comparing two pseudotimes on one chain.
    pub fn from_ordering(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => Self::Before,
            Ordering::Greater => Self::After,
            Ordering::Equal => Self::Same,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Before => write!(f, "before"),
            Self::After => write!(f, "after"),
            Self::Same => write!(f, "same"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}
