//! Tagged analysis vocabulary shared by the indicator engine and the
//! signal synthesizer: closed enums rather than open strings so
//! exhaustiveness is compiler-checked.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Bullish,
    Bearish,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Weak,
    Moderate,
    Strong,
}

impl Strength {
    /// Numeric rank used in level scoring: weak 1, moderate 2, strong 3.
    pub fn rank(self) -> u32 {
        match self {
            Strength::Weak => 1,
            Strength::Moderate => 2,
            Strength::Strong => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Divergence {
    Bullish,
    Bearish,
    None,
}

/// Per-indicator analysis: a representative value plus the tagged read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorAnalysis {
    pub value: f64,
    pub signal: Signal,
    pub strength: Strength,
    pub divergence: Divergence,
}

impl IndicatorAnalysis {
    pub fn neutral(value: f64) -> Self {
        IndicatorAnalysis {
            value,
            signal: Signal::Neutral,
            strength: Strength::Weak,
            divergence: Divergence::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strength_rank_ordering() {
        assert!(Strength::Weak < Strength::Moderate);
        assert!(Strength::Moderate < Strength::Strong);
        assert_eq!(Strength::Weak.rank(), 1);
        assert_eq!(Strength::Strong.rank(), 3);
    }

    #[test]
    fn neutral_analysis_defaults() {
        let a = IndicatorAnalysis::neutral(50.0);
        assert_eq!(a.signal, Signal::Neutral);
        assert_eq!(a.strength, Strength::Weak);
        assert_eq!(a.divergence, Divergence::None);
    }
}
