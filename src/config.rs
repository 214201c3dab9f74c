//! Mining thresholds and their fallback ladders

use crate::error::Error;

/// Primary, secondary and minimum support tried in order
pub const SUPPORT_LADDER: [f64; 3] = [0.005, 0.002, 0.001];

/// Primary, secondary and minimum confidence tried in order
pub const CONFIDENCE_LADDER: [f64; 3] = [0.01, 0.005, 0.001];

/// Thresholds driving one mining run
#[derive(Debug, Clone, PartialEq)]
pub struct MiningConfig {
    pub support_ladder: Vec<f64>,
    pub confidence_ladder: Vec<f64>,
    pub min_lift: f64,
    /// Largest itemset the miner builds; unbounded when `None`
    pub max_len: Option<usize>,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            support_ladder: SUPPORT_LADDER.to_vec(),
            confidence_ladder: CONFIDENCE_LADDER.to_vec(),
            min_lift: 0.0,
            max_len: None,
        }
    }
}

impl MiningConfig {
    /// Replace the support ladder with a single fixed value
    pub fn with_min_support(mut self, min_support: f64) -> Self {
        self.support_ladder = vec![min_support];
        self
    }

    /// Replace the confidence ladder with a single fixed value
    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.confidence_ladder = vec![min_confidence];
        self
    }

    pub fn with_min_lift(mut self, min_lift: f64) -> Self {
        self.min_lift = min_lift;
        self
    }

    pub fn with_max_len(mut self, max_len: Option<usize>) -> Self {
        self.max_len = max_len;
        self
    }

    pub fn validate(&self) -> crate::Result<()> {
        let ladders = [
            ("min_support", &self.support_ladder),
            ("min_confidence", &self.confidence_ladder),
        ];
        for (name, ladder) in ladders {
            if ladder.is_empty() {
                return Err(Error::InvalidThreshold { name, value: f64::NAN });
            }
            if let Some(&value) = ladder.iter().find(|v| !(0.0..=1.0).contains(*v)) {
                return Err(Error::InvalidThreshold { name, value });
            }
        }
        if !(self.min_lift.is_finite() && self.min_lift >= 0.0) {
            return Err(Error::InvalidThreshold {
                name: "min_lift",
                value: self.min_lift,
            });
        }
        if self.max_len == Some(0) {
            return Err(Error::InvalidThreshold {
                name: "max_len",
                value: 0.0,
            });
        }
        Ok(())
    }
}
