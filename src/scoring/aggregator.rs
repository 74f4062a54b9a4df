//! Score aggregation and band thresholds.
//!
//! Band boundaries are inclusive on the lower side:
//!
//! - `score <  low_medium`                 -> LOW
//! - `low_medium <= score < medium_high`   -> MEDIUM
//! - `score >= medium_high`                -> HIGH

use serde::{Deserialize, Serialize};

use crate::domain::{BandScore, RiskBand, WeightedContribution};
use crate::error::ConfigError;

/// Two ascending score boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandThresholds {
    pub low_medium: f64,
    pub medium_high: f64,
}

impl BandThresholds {
    /// Check the thresholds; `label` names them in the error.
    pub fn validate(&self, label: &'static str) -> Result<(), ConfigError> {
        if !(self.low_medium.is_finite() && self.medium_high.is_finite()) {
            return Err(ConfigError::NonFiniteThreshold { scope: label });
        }
        if self.low_medium >= self.medium_high {
            return Err(ConfigError::ThresholdsOutOfOrder {
                scope: label,
                low_medium: self.low_medium,
                medium_high: self.medium_high,
            });
        }
        Ok(())
    }

    /// Map a score to a band. Assumes validated thresholds.
    pub fn band_for(&self, score: f64) -> RiskBand {
        if score >= self.medium_high {
            RiskBand::High
        } else if score >= self.low_medium {
            RiskBand::Medium
        } else {
            RiskBand::Low
        }
    }
}

/// Sum of contribution weights, in sequence order.
pub fn total_score(contributions: &[WeightedContribution]) -> f64 {
    contributions.iter().map(|c| c.weight).sum()
}

/// Sum contributions and map the score to a band.
pub fn aggregate(contributions: &[WeightedContribution], thresholds: &BandThresholds) -> Result<RiskBand, ConfigError> {
    aggregate_scored(contributions, thresholds).map(|s| s.band)
}

/// Like `aggregate`, but also returns the score for the audit trail.
pub fn aggregate_scored(
    contributions: &[WeightedContribution],
    thresholds: &BandThresholds,
) -> Result<BandScore, ConfigError> {
    thresholds.validate("band")?;
    let score = total_score(contributions);
    Ok(BandScore {
        score,
        band: thresholds.band_for(score),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Resolution, Scope};
    use rand::prelude::*;
    use rand::rngs::StdRng;

    fn contribution(weight: f64) -> WeightedContribution {
        WeightedContribution {
            scope: Scope::Client,
            factor: "f".to_string(),
            weight,
            source: None,
            resolved_key: None,
            resolution: Resolution::Lookup,
        }
    }

    fn thresholds() -> BandThresholds {
        BandThresholds {
            low_medium: 6.0,
            medium_high: 9.0,
        }
    }

    #[test]
    fn boundaries_are_lower_inclusive() {
        let t = thresholds();
        assert_eq!(aggregate(&[contribution(5.0)], &t).unwrap(), RiskBand::Low);
        assert_eq!(aggregate(&[contribution(6.0)], &t).unwrap(), RiskBand::Medium);
        assert_eq!(aggregate(&[contribution(8.0)], &t).unwrap(), RiskBand::Medium);
        assert_eq!(aggregate(&[contribution(9.0)], &t).unwrap(), RiskBand::High);
        assert_eq!(aggregate(&[], &t).unwrap(), RiskBand::Low);
    }

    #[test]
    fn sums_all_contributions() {
        let scored = aggregate_scored(&[contribution(2.0), contribution(3.0), contribution(1.0)], &thresholds()).unwrap();
        assert_eq!(scored.score, 6.0);
        assert_eq!(scored.band, RiskBand::Medium);
    }

    #[test]
    fn rejects_out_of_order_thresholds() {
        let equal = BandThresholds {
            low_medium: 5.0,
            medium_high: 5.0,
        };
        assert!(matches!(
            aggregate(&[contribution(1.0)], &equal),
            Err(ConfigError::ThresholdsOutOfOrder { .. })
        ));

        let nan = BandThresholds {
            low_medium: f64::NAN,
            medium_high: 5.0,
        };
        assert!(matches!(aggregate(&[], &nan), Err(ConfigError::NonFiniteThreshold { .. })));
    }

    #[test]
    fn adding_positive_weight_never_lowers_band() {
        let t = thresholds();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let n = rng.gen_range(0..6);
            let mut contributions: Vec<_> = (0..n).map(|_| contribution(rng.gen_range(0.0..4.0))).collect();
            let before = aggregate(&contributions, &t).unwrap();
            contributions.push(contribution(rng.gen_range(0.01..4.0)));
            let after = aggregate(&contributions, &t).unwrap();
            assert!(after >= before);

            contributions.pop();
            contributions.pop();
            let removed = aggregate(&contributions, &t).unwrap();
            assert!(removed <= before);
        }
    }
}
