//! Engine-level enums shared by sequences, sequence sets and the codec.
use serde::{Deserialize, Serialize};

/// How a sequence is evaluated between two consecutive instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// The value holds until the next instant
    Step,
    /// The value moves linearly (or along the great circle) to the next instant
    #[default]
    Linear,
}

impl Interpolation {
    #[inline]
    pub fn is_linear(self) -> bool {
        self == Self::Linear
    }

    pub fn from_linear(linear: bool) -> Self {
        if linear { Self::Linear } else { Self::Step }
    }
}

impl std::fmt::Display for Interpolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Step => f.write_str("Stepwise"),
            Self::Linear => f.write_str("Linear"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolation_serde() {
        let json = serde_json::to_string(&Interpolation::Step).unwrap();
        assert_eq!(json, "\"step\"");
        let back: Interpolation = serde_json::from_str("\"linear\"").unwrap();
        assert_eq!(back, Interpolation::Linear);
        assert!(Interpolation::from_linear(true).is_linear());
    }
}
