//! Best-first move selection for 2048.
//!
//! One call to [`BestFirst::select_move`] builds a search tree from the
//! current board, always expanding the pending node with the highest
//! immediate merge score. Every accepted child immediately pushes its score
//! up towards the root's children, using either the best child
//! ([`Propagation::Max`]) or a running average of children
//! ([`Propagation::Average`]). Once the frontier is drained, the four
//! root-level scores decide the move.
//!
//! The frontier, the node arena and the four direction scores all live inside
//! one call, so independent games can run their own [`BestFirst`] on
//! different threads.
//!
//! Quick start
//! ```
//! use bestfirst_2048::engine::{self as GameEngine, Board};
//! use bestfirst_2048::bestfirst::{BestFirst, BestFirstConfig, Propagation};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! GameEngine::new();
//! let mut rng = StdRng::seed_from_u64(123);
//! let b0 = Board::EMPTY
//!     .with_random_tile(&mut rng)
//!     .with_random_tile(&mut rng);
//!
//! let cfg = BestFirstConfig { max_depth: 3, propagation: Propagation::Average, ..Default::default() };
//! let mut bf = BestFirst::with_config(cfg).unwrap();
//! let _dir = bf.select_move(b0);
//! assert!(bf.last_stats().expanded > 0);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

mod frontier;
mod propagate;
mod search;
mod select;
mod tree;

pub use frontier::Frontier;
pub use propagate::propagate;
pub use search::{BestFirst, Exploration};
pub use select::{choose_max, pick_direction, DirectionScores, TieBreak};
pub use tree::{NodeId, SearchNode, SearchTree, ROOT_PRIORITY};

/// Hard ceiling on the depth bound. The tree grows as 4^depth.
pub const MAX_DEPTH_CAP: u32 = 12;

/// How a child's score is folded into its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Propagation {
    /// Parent keeps the best child score seen so far.
    #[default]
    Max,
    /// Parent keeps a running average of reported child scores.
    Average,
}

/// Arithmetic used by [`Propagation::Average`] for the running mean.
///
/// `n` is the parent's accepted child count at the time of the report and
/// `x` the reporting child's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AverageRule {
    /// `(old * (n - 1) + x) / n`.
    #[default]
    Incremental,
    /// `(old * (n + 1) + x) / n`. Overweights the old mean; kept so older
    /// results can be reproduced.
    Legacy,
}

impl AverageRule {
    #[inline]
    pub fn update(self, old: f64, sample: f64, count: u32) -> f64 {
        let n = f64::from(count.max(1));
        match self {
            AverageRule::Incremental => (old * (n - 1.0) + sample) / n,
            AverageRule::Legacy => (old * (n + 1.0) + sample) / n,
        }
    }
}

/// Configurable knobs for best-first search.
///
/// - `max_depth`: depth bound; 0 disables search and picks a random direction.
/// - `propagation`: max-of-children or average-of-children.
/// - `average_rule`: running-mean arithmetic, only read under `Average`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestFirstConfig {
    pub max_depth: u32,
    pub propagation: Propagation,
    pub average_rule: AverageRule,
}

impl Default for BestFirstConfig {
    fn default() -> Self {
        Self { max_depth: 3, propagation: Propagation::Max, average_rule: AverageRule::Incremental }
    }
}

impl BestFirstConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth > MAX_DEPTH_CAP {
            return Err(ConfigError::DepthTooLarge { depth: self.max_depth, cap: MAX_DEPTH_CAP });
        }
        Ok(())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max depth {depth} exceeds the cap of {cap}")]
    DepthTooLarge { depth: u32, cap: u32 },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} policy: {value:?}")]
pub struct ParsePolicyError {
    kind: &'static str,
    value: String,
}

impl FromStr for Propagation {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "max" => Ok(Propagation::Max),
            "avg" | "average" => Ok(Propagation::Average),
            _ => Err(ParsePolicyError { kind: "propagation", value: s.to_string() }),
        }
    }
}

impl fmt::Display for Propagation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self { Propagation::Max => "max", Propagation::Average => "avg" })
    }
}

impl FromStr for AverageRule {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "incremental" => Ok(AverageRule::Incremental),
            "legacy" => Ok(AverageRule::Legacy),
            _ => Err(ParsePolicyError { kind: "average rule", value: s.to_string() }),
        }
    }
}

impl fmt::Display for AverageRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self { AverageRule::Incremental => "incremental", AverageRule::Legacy => "legacy" })
    }
}

/// Node counters for a single search.
///
/// `generated` counts every child attempt; each attempt is either
/// `accepted` into the tree or `rejected` because the move changed nothing.
/// `expanded` counts frontier pops, the root included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub generated: u64,
    pub expanded: u64,
    pub accepted: u64,
    pub rejected: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incremental_average_is_textbook_mean() {
        let rule = AverageRule::Incremental;
        let a = rule.update(0.0, 4.0, 1);
        assert_eq!(a, 4.0);
        let b = rule.update(a, 6.0, 2);
        assert_eq!(b, 5.0);
    }

    #[test]
    fn legacy_average_multiplies_by_next_count() {
        let rule = AverageRule::Legacy;
        let a = rule.update(0.0, 4.0, 1);
        assert_eq!(a, 4.0);
        // (4 * 3 + 6) / 2
        assert_eq!(rule.update(a, 6.0, 2), 9.0);
    }

    #[test]
    fn parse_policies() {
        assert_eq!("max".parse::<Propagation>(), Ok(Propagation::Max));
        assert_eq!("AVG".parse::<Propagation>(), Ok(Propagation::Average));
        assert_eq!("legacy".parse::<AverageRule>(), Ok(AverageRule::Legacy));
        let err = "median".parse::<Propagation>().unwrap_err();
        assert_eq!(err.to_string(), "unknown propagation policy: \"median\"");
    }

    #[test]
    fn depth_cap_is_enforced() {
        let cfg = BestFirstConfig { max_depth: MAX_DEPTH_CAP + 1, ..Default::default() };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::DepthTooLarge { depth: MAX_DEPTH_CAP + 1, cap: MAX_DEPTH_CAP })
        );
        assert!(BestFirstConfig::default().validate().is_ok());
    }
}
