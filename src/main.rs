use bestfirst_2048::bestfirst::{AverageRule, BestFirst, BestFirstConfig, Propagation};
use bestfirst_2048::engine::{self as GameEngine, Board, Move};
use bestfirst_2048::runner::{play_game, GameReport};
use clap::{Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};

#[derive(Debug, Parser)]
#[command(name = "bestfirst-2048", version, about = "2048 player driven by best-first tree search")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Debug, clap::Args)]
struct SearchArgs {
    /// Depth bound of the search (0 plays random directions)
    #[arg(short, long, default_value_t = 3)]
    depth: u32,
    /// Score propagation policy: max | avg
    #[arg(short, long, default_value = "max")]
    propagation: Propagation,
    /// Running-mean arithmetic for avg: incremental | legacy
    #[arg(long, default_value = "incremental")]
    average_rule: AverageRule,
}

impl SearchArgs {
    fn config(&self) -> BestFirstConfig {
        BestFirstConfig { max_depth: self.depth, propagation: self.propagation, average_rule: self.average_rule }
    }
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Play one game until no move is left
    Play {
        #[command(flatten)]
        search: SearchArgs,
        /// Seed for tile spawns and the depth-0 fallback
        #[arg(long)]
        seed: Option<u64>,
        /// Stop after this many moves
        #[arg(long)]
        steps: Option<u64>,
        /// Do not print the board after every move
        #[arg(long)]
        quiet: bool,
        /// Print the final report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search once from a hex board and print the chosen move
    Suggest {
        #[command(flatten)]
        search: SearchArgs,
        /// Packed board, 16 hex nibbles of tile exponents (e.g. 0x1100_0000_0000_0002)
        board: Board,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    GameEngine::new();

    match cli.cmd {
        Cmd::Play { search, seed, steps, quiet, json } => {
            let cfg = search.config();
            let (mut policy, mut rng) = match seed {
                Some(s) => (BestFirst::with_seed(cfg, s)?, StdRng::seed_from_u64(s)),
                None => (BestFirst::with_config(cfg)?, StdRng::from_entropy()),
            };
            let report = play_game(&mut policy, &mut rng, steps, |dir, board| {
                if !quiet {
                    println!("{}{}", dir, board);
                }
            });
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        Cmd::Suggest { search, board } => {
            let mut policy = BestFirst::with_config(search.config())?;
            println!("{}", board);
            if search.depth == 0 {
                println!("Move: {} (random, depth 0)", policy.select_move(board));
                return Ok(());
            }
            let exploration = policy.explore(board);
            for mv in Move::DECISION_ORDER {
                match exploration.scores.get(mv) {
                    Some(score) => println!("{:>5}: {:.2}", mv.to_string(), score),
                    None => println!("{:>5}: -", mv.to_string()),
                }
            }
            let stats = exploration.stats;
            println!(
                "Move: {} | generated: {} | expanded: {}",
                exploration.best_move(),
                stats.generated,
                stats.expanded
            );
        }
    }
    Ok(())
}

fn print_report(report: &GameReport) {
    println!("MaxDepth: {}", report.config.max_depth);
    println!("Propagation: {}", report.config.propagation);
    println!("Moves: {}", report.moves);
    println!("Generated: {} ({:.1}/move)", report.generated, report.generated_per_move());
    println!("Expanded: {} ({:.1}/move)", report.expanded, report.expanded_per_move());
    println!("Time: {:.3}s", report.elapsed_s);
    println!("Expanded/Second: {:.0}", report.expanded_per_second());
    println!("Max tile: {}", report.highest_tile);
    println!("Score: {}", report.score);
}
