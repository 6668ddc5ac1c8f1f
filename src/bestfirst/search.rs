use log::{debug, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engine::{Board, Move};

use super::frontier::Frontier;
use super::propagate::propagate;
use super::select::{pick_direction, random_direction, DirectionScores};
use super::tree::SearchTree;
use super::{BestFirstConfig, ConfigError, SearchStats};

/// Best-first move selector.
///
/// Holds only configuration, the RNG for the depth-0 fallback and the stats
/// of the last call. Every search builds and drops its own tree and frontier.
pub struct BestFirst {
    cfg: BestFirstConfig,
    stats: SearchStats,
    rng: StdRng,
}

/// Everything one search produced, for inspection.
#[derive(Debug, Clone)]
pub struct Exploration {
    pub tree: SearchTree,
    pub scores: DirectionScores,
    pub stats: SearchStats,
}

impl Exploration {
    /// Direction the selector would play for this tree.
    pub fn best_move(&self) -> Move { pick_direction(&self.scores) }
}

impl BestFirst {
    pub fn new() -> Self {
        Self { cfg: BestFirstConfig::default(), stats: SearchStats::default(), rng: StdRng::from_entropy() }
    }

    pub fn with_config(cfg: BestFirstConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self { cfg, stats: SearchStats::default(), rng: StdRng::from_entropy() })
    }

    /// Like [`Self::with_config`] with a seeded fallback RNG, for reproducible runs.
    pub fn with_seed(cfg: BestFirstConfig, seed: u64) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self { cfg, stats: SearchStats::default(), rng: StdRng::seed_from_u64(seed) })
    }

    #[inline]
    pub fn config(&self) -> &BestFirstConfig { &self.cfg }

    /// Back-compat shim.
    ///
    /// Equivalent to [`Self::select_move`].
    #[inline]
    pub fn get_next_move(&mut self, board: Board) -> Move { self.select_move(board) }

    /// Search from `board` and return the direction to play.
    ///
    /// With `max_depth == 0` no search runs and a uniformly random direction
    /// is returned. The returned direction may be illegal when every
    /// direction is blocked.
    ///
    /// ```
    /// use bestfirst_2048::engine::{Board, Move};
    /// use bestfirst_2048::bestfirst::{BestFirst, BestFirstConfig};
    /// // Only a slide towards the empty bottom row changes this board.
    /// let b = Board::from_exponents([[1, 2, 1, 2], [2, 1, 2, 1], [1, 2, 1, 2], [0, 0, 0, 0]]);
    /// let mut bf = BestFirst::with_config(BestFirstConfig { max_depth: 2, ..Default::default() }).unwrap();
    /// assert_eq!(bf.select_move(b), Move::Down);
    /// ```
    pub fn select_move(&mut self, board: Board) -> Move {
        if self.cfg.max_depth == 0 {
            self.stats = SearchStats::default();
            return random_direction(&mut self.rng);
        }
        self.explore(board).best_move()
    }

    /// Run the search and hand back the finished tree and scores.
    ///
    /// With `max_depth == 0` the tree holds only the root.
    pub fn explore(&mut self, board: Board) -> Exploration {
        let (mut tree, root) = SearchTree::with_root(board);
        let mut scores = DirectionScores::new();
        let mut stats = SearchStats::default();

        if self.cfg.max_depth > 0 {
            let mut frontier = Frontier::new();
            frontier.push(root, tree.get(root).priority);

            while let Some(id) = frontier.pop() {
                stats.expanded += 1;
                let node = *tree.get(id);
                if node.depth >= self.cfg.max_depth {
                    continue;
                }
                trace!("expand depth={} priority={} frontier={}", node.depth, node.priority, frontier.len());

                for mv in Move::EXPANSION_ORDER {
                    let mut child = node.candidate(id, mv);
                    stats.generated += 1;
                    tree.get_mut(id).child_count += 1;

                    let outcome = child.board.execute(mv);
                    child.board = outcome.board;
                    child.priority = outcome.delta;
                    child.prop_score = outcome.delta as f64;

                    if outcome.changed {
                        let child_id = tree.insert(child);
                        frontier.push(child_id, child.priority);
                        stats.accepted += 1;
                        propagate(&mut tree, child_id, &self.cfg, &mut scores);
                    } else {
                        tree.get_mut(id).child_count -= 1;
                        stats.rejected += 1;
                    }
                }
            }
        }

        debug!(
            "best-first search depth={} policy={} generated={} expanded={} scores={:?}",
            self.cfg.max_depth, self.cfg.propagation, stats.generated, stats.expanded, scores
        );
        self.stats = stats;
        Exploration { tree, scores, stats }
    }

    /// Statistics collected from the last call to [`Self::select_move`] or
    /// [`Self::explore`].
    #[inline]
    pub fn last_stats(&self) -> SearchStats { self.stats }
}

impl Default for BestFirst { fn default() -> Self { Self::new() } }
