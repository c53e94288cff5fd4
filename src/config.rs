//! Tuning knobs for search and matching.
//!
//! The two search bounds double as the latency budget: smaller values trade
//! recall for a hard cap on visited nodes and copied candidates.

use crate::error::{MatchError, Result};
use serde::{Deserialize, Serialize};

/// Scratch slots a selector reserves when not told otherwise.
pub const DEFAULT_SCRATCH_CAPACITY: usize = 1000;

/// Ratio between best and second-best distances below which a match is kept.
pub const DEFAULT_RATIO_THRESHOLD: f64 = 0.7;

/// Selector parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorParams {
    /// Capacity of the deferred-node priority list.
    pub max_nodes_to_pop: usize,

    /// Maximum number of reverse-index entries a query returns.
    pub max_results: usize,

    /// Number of `(node, distance)` slots available to one query.
    pub scratch_capacity: usize,
}

impl Default for SelectorParams {
    fn default() -> Self {
        Self {
            max_nodes_to_pop: 8,
            max_results: 512,
            scratch_capacity: DEFAULT_SCRATCH_CAPACITY,
        }
    }
}

/// Matcher parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherParams {
    /// First/second-best ratio threshold (strict).
    pub ratio_threshold: f64,
}

impl Default for MatcherParams {
    fn default() -> Self {
        Self {
            ratio_threshold: DEFAULT_RATIO_THRESHOLD,
        }
    }
}

/// Complete matching configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub selector: SelectorParams,
    pub matcher: MatcherParams,
}

impl MatchConfig {
    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let t = self.matcher.ratio_threshold;
        if !t.is_finite() || t <= 0.0 {
            return Err(MatchError::InvalidParameter(format!(
                "ratio_threshold must be finite and positive, got {t}"
            )));
        }
        if self.selector.scratch_capacity == 0 {
            return Err(MatchError::InvalidParameter(
                "scratch_capacity must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = MatchConfig::default();
        assert_eq!(c.selector.scratch_capacity, 1000);
        assert_eq!(c.matcher.ratio_threshold, 0.7);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c = MatchConfig::from_json(r#"{"selector": {"max_nodes_to_pop": 16}}"#).unwrap();
        assert_eq!(c.selector.max_nodes_to_pop, 16);
        assert_eq!(c.selector.max_results, 512);
        assert_eq!(c.matcher, MatcherParams::default());
    }

    #[test]
    fn rejects_bad_threshold() {
        let err = MatchConfig::from_json(r#"{"matcher": {"ratio_threshold": 0.0}}"#).unwrap_err();
        assert!(matches!(err, MatchError::InvalidParameter(_)));
    }

    #[test]
    fn rejects_zero_scratch() {
        let err = MatchConfig::from_json(r#"{"selector": {"scratch_capacity": 0}}"#).unwrap_err();
        assert!(matches!(err, MatchError::InvalidParameter(_)));
    }

    #[test]
    fn malformed_json_is_config_error() {
        let err = MatchConfig::from_json("{").unwrap_err();
        assert!(matches!(err, MatchError::Config(_)));
    }
}
