//! bestfirst-2048: a 2048 board engine + best-first search move selection
//!
//! This crate provides:
//! - A compact `Board` type with a move executor (`execute`) reporting whether a
//!   direction changed the board and the merge score it earned
//! - A best-first search policy (`bestfirst` module) with max or average
//!   score propagation and a deterministic tie-break over the four directions
//!
//! Quick start:
//! ```
//! use bestfirst_2048::engine::{self as GameEngine, Board, Move};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Optional: build the line tables up front
//! GameEngine::new();
//!
//! // A pair of 2s next to a 4: Left merges the pair for 4 points.
//! let b0 = Board::from_exponents([[1, 1, 2, 0], [0; 4], [0; 4], [0; 4]]);
//! let out = b0.execute(Move::Left);
//! assert!(out.changed);
//! assert_eq!(out.delta, 4);
//! assert_eq!(out.board, Board::from_exponents([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]));
//!
//! // Spawning a tile fills exactly one empty cell.
//! let mut rng = StdRng::seed_from_u64(42);
//! assert_eq!(out.board.with_random_tile(&mut rng).count_empty(), 13);
//! ```
//!
//! Full loop
//! ```
//! use bestfirst_2048::engine::Board;
//! use bestfirst_2048::bestfirst::{BestFirst, BestFirstConfig, Propagation};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let cfg = BestFirstConfig { max_depth: 2, propagation: Propagation::Max, ..Default::default() };
//! let mut policy = BestFirst::with_seed(cfg, 7).unwrap();
//! let mut rng = StdRng::seed_from_u64(123);
//! let mut b = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
//! let mut moves = 0u32;
//! while !b.is_game_over() && moves < 4 {
//!     b = b.make_move(policy.select_move(b), &mut rng);
//!     moves += 1;
//! }
//! assert!(moves > 0);
//! ```
//!
pub mod bestfirst;
pub mod engine;
pub mod runner;
