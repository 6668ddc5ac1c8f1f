//! Whole-game driver shared by the binaries.

use std::time::Instant;

use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::bestfirst::{BestFirst, BestFirstConfig};
use crate::engine::{Board, Move};

/// Summary of one finished (or move-capped) game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameReport {
    pub config: BestFirstConfig,
    pub moves: u64,
    pub score: u64,
    pub highest_tile: u64,
    pub final_board: u64,
    /// Child attempts summed over every search of the game.
    pub generated: u64,
    /// Frontier pops summed over every search of the game.
    pub expanded: u64,
    pub elapsed_s: f64,
}

impl GameReport {
    pub fn generated_per_move(&self) -> f64 { per(self.generated as f64, self.moves as f64) }

    pub fn expanded_per_move(&self) -> f64 { per(self.expanded as f64, self.moves as f64) }

    pub fn expanded_per_second(&self) -> f64 { per(self.expanded as f64, self.elapsed_s) }
}

fn per(total: f64, n: f64) -> f64 { if n > 0.0 { total / n } else { 0.0 } }

/// Play from two random tiles until no move is left or `max_moves` is reached.
///
/// `on_move` sees each applied direction and the board after the spawned tile.
/// A chosen direction that changes nothing (possible at depth 0) is not
/// counted as a move; the policy is simply asked again.
///
/// ```
/// use bestfirst_2048::bestfirst::{BestFirst, BestFirstConfig};
/// use bestfirst_2048::runner::play_game;
/// use rand::{rngs::StdRng, SeedableRng};
/// let mut policy = BestFirst::with_config(BestFirstConfig { max_depth: 1, ..Default::default() }).unwrap();
/// let mut rng = StdRng::seed_from_u64(3);
/// let report = play_game(&mut policy, &mut rng, Some(10), |_, _| {});
/// assert_eq!(report.moves, 10);
/// ```
pub fn play_game<R, F>(policy: &mut BestFirst, rng: &mut R, max_moves: Option<u64>, mut on_move: F) -> GameReport
where
    R: Rng + ?Sized,
    F: FnMut(Move, Board),
{
    let start = Instant::now();
    let mut board = Board::EMPTY.with_random_tile(rng).with_random_tile(rng);
    let mut moves = 0u64;
    let mut generated = 0u64;
    let mut expanded = 0u64;

    while !board.is_game_over() && max_moves.map_or(true, |cap| moves < cap) {
        let dir = policy.select_move(board);
        let stats = policy.last_stats();
        generated += stats.generated;
        expanded += stats.expanded;

        let next = board.make_move(dir, rng);
        if next == board {
            continue;
        }
        board = next;
        moves += 1;
        on_move(dir, board);
    }

    let report = GameReport {
        config: *policy.config(),
        moves,
        score: board.score(),
        highest_tile: board.highest_tile(),
        final_board: board.raw(),
        generated,
        expanded,
        elapsed_s: start.elapsed().as_secs_f64(),
    };
    info!(
        "game over: moves={} score={} highest_tile={} expanded={}",
        report.moves, report.score, report.highest_tile, report.expanded
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bestfirst::Propagation;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn game_runs_to_completion() {
        let cfg = BestFirstConfig { max_depth: 2, propagation: Propagation::Average, ..Default::default() };
        let mut policy = BestFirst::with_config(cfg).unwrap();
        let mut rng = StdRng::seed_from_u64(17);
        let mut seen = 0u64;
        let report = play_game(&mut policy, &mut rng, None, |_, _| seen += 1);
        assert!(Board::from_raw(report.final_board).is_game_over());
        assert_eq!(seen, report.moves);
        assert!(report.highest_tile >= 16);
        assert!(report.expanded >= report.moves);
    }

    #[test]
    fn depth_zero_still_finishes() {
        let cfg = BestFirstConfig { max_depth: 0, ..Default::default() };
        let mut policy = BestFirst::with_seed(cfg, 1).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let report = play_game(&mut policy, &mut rng, Some(50), |_, _| {});
        assert_eq!(report.generated, 0);
        assert_eq!(report.expanded, 0);
        assert!(report.moves > 0);
    }

    #[test]
    fn seeded_games_repeat() {
        let cfg = BestFirstConfig { max_depth: 3, ..Default::default() };
        let run = || {
            let mut policy = BestFirst::with_config(cfg).unwrap();
            let mut rng = StdRng::seed_from_u64(99);
            let r = play_game(&mut policy, &mut rng, Some(40), |_, _| {});
            (r.moves, r.score, r.final_board, r.generated)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn report_rates_handle_zero() {
        let report = GameReport {
            config: BestFirstConfig::default(),
            moves: 0,
            score: 0,
            highest_tile: 0,
            final_board: 0,
            generated: 0,
            expanded: 0,
            elapsed_s: 0.0,
        };
        assert_eq!(report.generated_per_move(), 0.0);
        assert_eq!(report.expanded_per_second(), 0.0);
    }
}
