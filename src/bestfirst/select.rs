use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::engine::Move;

/// Propagated score per root direction, indexed `[Up, Down, Left, Right]`.
///
/// A direction stays `None` until one of its depth-1 nodes reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectionScores([Option<f64>; 4]);

impl DirectionScores {
    pub fn new() -> Self { Self::default() }

    /// Overwrite the accumulator for `mv`.
    #[inline]
    pub fn record(&mut self, mv: Move, score: f64) { self.0[mv.index()] = Some(score); }

    #[inline]
    pub fn get(&self, mv: Move) -> Option<f64> { self.0[mv.index()] }

    // Unreached directions lose every comparison against a reached one.
    #[inline]
    fn value(&self, mv: Move) -> f64 { self.get(mv).unwrap_or(f64::NEG_INFINITY) }
}

/// Alternating signal deciding which operand an exact tie returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieBreak {
    PreferFirst,
    PreferSecond,
}

impl TieBreak {
    pub const START: TieBreak = TieBreak::PreferSecond;

    #[inline]
    pub fn flip(self) -> Self {
        match self {
            TieBreak::PreferFirst => TieBreak::PreferSecond,
            TieBreak::PreferSecond => TieBreak::PreferFirst,
        }
    }
}

/// Larger of `x1` and `x2`, and the signal for the next comparison.
///
/// The signal flips after every comparison, tie or not.
#[inline]
pub fn choose_max(x1: f64, x2: f64, tie: TieBreak) -> (f64, TieBreak) {
    let picked = if x1 == x2 {
        match tie {
            TieBreak::PreferFirst => x1,
            TieBreak::PreferSecond => x2,
        }
    } else if x2 > x1 {
        x2
    } else {
        x1
    };
    (picked, tie.flip())
}

/// Direction with the highest propagated score.
///
/// The maximum is taken pairwise (Up/Down, Left/Right, then the winners) and
/// matched back in `Up, Down, Left, Right` order, so tied directions resolve
/// to the earliest in that order.
pub fn pick_direction(scores: &DirectionScores) -> Move {
    let tie = TieBreak::START;
    let (vertical, tie) = choose_max(scores.value(Move::Up), scores.value(Move::Down), tie);
    let (horizontal, tie) = choose_max(scores.value(Move::Left), scores.value(Move::Right), tie);
    let (best, _) = choose_max(vertical, horizontal, tie);
    // `best` is one of the four values, so the scan always matches; the
    // fallback only guards against a NaN score, which merge sums never produce.
    Move::DECISION_ORDER
        .into_iter()
        .find(|&mv| scores.value(mv) == best)
        .unwrap_or(Move::Right)
}

/// Uniform choice among the four directions; the board is not consulted.
pub fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Move {
    Move::DECISION_ORDER[rng.gen_range(0..4)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn scores(up: f64, down: f64, left: f64, right: f64) -> DirectionScores {
        let mut s = DirectionScores::new();
        s.record(Move::Up, up);
        s.record(Move::Down, down);
        s.record(Move::Left, left);
        s.record(Move::Right, right);
        s
    }

    #[test]
    fn choose_max_flips_on_every_comparison() {
        assert_eq!(choose_max(1.0, 2.0, TieBreak::START), (2.0, TieBreak::PreferFirst));
        assert_eq!(choose_max(3.0, 2.0, TieBreak::PreferFirst), (3.0, TieBreak::PreferSecond));
        assert_eq!(choose_max(2.0, 2.0, TieBreak::PreferSecond), (2.0, TieBreak::PreferFirst));
    }

    #[test]
    fn tie_picks_operand_by_signal() {
        // -0.0 == 0.0, so the sign shows which operand came back.
        let (a, _) = choose_max(-0.0, 0.0, TieBreak::PreferFirst);
        assert!(a.is_sign_negative());
        let (b, _) = choose_max(-0.0, 0.0, TieBreak::PreferSecond);
        assert!(b.is_sign_positive());
    }

    #[test]
    fn strict_maximum_wins() {
        assert_eq!(pick_direction(&scores(1.0, 2.0, 3.0, 4.0)), Move::Right);
        assert_eq!(pick_direction(&scores(1.0, 7.0, 3.0, 4.0)), Move::Down);
        assert_eq!(pick_direction(&scores(1.0, 2.0, 9.0, 4.0)), Move::Left);
    }

    #[test]
    fn ties_resolve_in_up_down_left_right_order() {
        assert_eq!(pick_direction(&scores(5.0, 1.0, 5.0, 2.0)), Move::Up);
        assert_eq!(pick_direction(&scores(1.0, 5.0, 2.0, 5.0)), Move::Down);
        assert_eq!(pick_direction(&scores(1.0, 2.0, 5.0, 5.0)), Move::Left);
        assert_eq!(pick_direction(&scores(5.0, 5.0, 1.0, 2.0)), Move::Up);
        assert_eq!(pick_direction(&scores(3.0, 1.0, 2.0, 3.0)), Move::Up);
    }

    #[test]
    fn unreached_directions_never_beat_reached_ones() {
        let mut s = DirectionScores::new();
        s.record(Move::Right, 0.0);
        assert_eq!(pick_direction(&s), Move::Right);
        // Nothing reached: first in order.
        assert_eq!(pick_direction(&DirectionScores::new()), Move::Up);
    }

    #[test]
    fn random_direction_is_roughly_uniform() {
        let mut rng = StdRng::seed_from_u64(2024);
        let mut counts = [0u32; 4];
        for _ in 0..8000 {
            counts[random_direction(&mut rng).index()] += 1;
        }
        for c in counts {
            assert!((1700..2300).contains(&c), "skewed counts: {counts:?}");
        }
    }
}
