use bestfirst_2048::bestfirst::{AverageRule, BestFirst, BestFirstConfig, Propagation};
use bestfirst_2048::engine as GameEngine;
use bestfirst_2048::runner::{play_game, GameReport};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "parallel", about = "Play many independent best-first 2048 games in parallel")]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 16)]
    games: u64,

    /// Depth bound of each search
    #[arg(short, long, default_value_t = 3)]
    depth: u32,

    /// Score propagation policy: max | avg
    #[arg(short, long, default_value = "max")]
    propagation: Propagation,

    /// Running-mean arithmetic for avg: incremental | legacy
    #[arg(long, default_value = "incremental")]
    average_rule: AverageRule,

    /// Base seed; game i uses seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// Per-game: stop after this many moves
    #[arg(long)]
    steps: Option<u64>,

    /// Worker threads (default: rayon's choice)
    #[arg(long)]
    threads: Option<usize>,

    /// Suppress the progress bar
    #[arg(long)]
    quiet: bool,

    /// Print every game report as JSON lines
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    GameEngine::new();

    let cfg = BestFirstConfig { max_depth: args.depth, propagation: args.propagation, average_rule: args.average_rule };
    cfg.validate()?;

    if let Some(n) = args.threads {
        rayon::ThreadPoolBuilder::new().num_threads(n).build_global()?;
    }

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(args.games);
        pb.set_style(
            ProgressStyle::with_template("{spinner} {elapsed_precise} [{bar:30}] {pos}/{len} games | {msg}")?
                .tick_chars("⠁⠃⠇⠧⠷⠿⠻⠟⠯⠷⠧⠇⠃"),
        );
        pb
    };

    let start = Instant::now();
    let reports = (0..args.games)
        .into_par_iter()
        .map(|i| -> anyhow::Result<GameReport> {
            // Each game owns its searcher; nothing is shared between searches.
            let (mut policy, mut rng) = match args.seed {
                Some(s) => (BestFirst::with_seed(cfg, s.wrapping_add(i))?, StdRng::seed_from_u64(s.wrapping_add(i))),
                None => (BestFirst::with_config(cfg)?, StdRng::from_entropy()),
            };
            let report = play_game(&mut policy, &mut rng, args.steps, |_, _| {});
            pb.inc(1);
            pb.set_message(format!("last score: {}", report.score));
            Ok(report)
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    pb.finish_and_clear();

    if args.json {
        for r in &reports {
            println!("{}", serde_json::to_string(r)?);
        }
    }
    print_summary(&reports, start.elapsed().as_secs_f64());
    Ok(())
}

fn print_summary(reports: &[GameReport], wall_s: f64) {
    if reports.is_empty() {
        println!("No games played.");
        return;
    }
    let n = reports.len() as f64;
    let mean_score = reports.iter().map(|r| r.score as f64).sum::<f64>() / n;
    let best_score = reports.iter().map(|r| r.score).max().unwrap_or(0);
    let mean_moves = reports.iter().map(|r| r.moves as f64).sum::<f64>() / n;
    let expanded: u64 = reports.iter().map(|r| r.expanded).sum();
    let generated: u64 = reports.iter().map(|r| r.generated).sum();
    println!(
        "Games: {} | mean score: {:.1} | best score: {} | mean moves: {:.1}",
        reports.len(),
        mean_score,
        best_score,
        mean_moves
    );
    println!(
        "Generated: {} | Expanded: {} | Expanded/second: {:.0} | wall: {:.2}s",
        generated,
        expanded,
        expanded as f64 / wall_s.max(1e-6),
        wall_s
    );
    let mut tiles: Vec<u64> = reports.iter().map(|r| r.highest_tile).collect();
    tiles.sort_unstable();
    tiles.dedup();
    for tile in tiles.into_iter().rev() {
        let reached = reports.iter().filter(|r| r.highest_tile >= tile).count();
        println!("{:>6}: {:5.1}%", tile, 100.0 * reached as f64 / n);
    }
}
