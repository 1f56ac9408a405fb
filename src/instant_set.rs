//! Strictly increasing runs of instants without interpolation.

use crate::compute::validation::{validate_successor, validate_value};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tseq_types::{Instant, TimestampSet};

/// Discrete samples, the result of restricting a sequence to a timestamp set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Instant>", into = "Vec<Instant>")]
pub struct InstantSet {
    instants: Vec<Instant>,
}

impl InstantSet {
    /// Validates strictly increasing timestamps and one value frame.
    pub fn new(instants: Vec<Instant>) -> Result<Self> {
        if let Some(first) = instants.first() {
            validate_value(&first.value)?;
        }
        for pair in instants.windows(2) {
            validate_successor(&pair[0], &pair[1])?;
            validate_value(&pair[1].value)?;
        }
        Ok(Self { instants })
    }

    pub(crate) fn from_sorted(instants: Vec<Instant>) -> Self {
        Self { instants }
    }

    pub fn instants(&self) -> &[Instant] {
        &self.instants
    }

    pub fn len(&self) -> usize {
        self.instants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instants.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instant> {
        self.instants.iter()
    }

    pub fn timestamps(&self) -> TimestampSet {
        TimestampSet::new(self.instants.iter().map(|inst| inst.t))
    }
}

impl TryFrom<Vec<Instant>> for InstantSet {
    type Error = crate::error::TseqError;

    fn try_from(instants: Vec<Instant>) -> Result<Self> {
        Self::new(instants)
    }
}

impl From<InstantSet> for Vec<Instant> {
    fn from(set: InstantSet) -> Self {
        set.instants
    }
}

impl std::fmt::Display for InstantSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, inst) in self.instants.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", inst)?;
        }
        write!(f, "}}")
    }
}
