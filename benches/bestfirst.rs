use bestfirst_2048::bestfirst::{AverageRule, BestFirst, BestFirstConfig, Propagation};
use bestfirst_2048::engine::{self as GameEngine, Board, Move};
use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;

fn warm() { GameEngine::new(); }

fn corpus() -> Vec<Board> {
    let mut rng = StdRng::seed_from_u64(4242);
    let mut boards = Vec::new();
    let mut b = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    boards.push(b);
    let seq = [Move::Left, Move::Up, Move::Right, Move::Down];
    for i in 0..64 {
        let dir = seq[i % seq.len()];
        let nb = b.shift(dir);
        if nb != b { b = nb.with_random_tile(&mut rng); }
        boards.push(b);
    }
    boards
}

fn bench_select_move(c: &mut Criterion) {
    warm();
    let boards = corpus();
    for (name, propagation) in [("max", Propagation::Max), ("avg", Propagation::Average)] {
        let cfg = BestFirstConfig { max_depth: 4, propagation, average_rule: AverageRule::Incremental };
        let mut bf = BestFirst::with_config(cfg).unwrap();
        c.bench_function(&format!("bestfirst/select_move_d4_{name}"), |bch| {
            bch.iter(|| {
                let mut acc = 0usize;
                for &bd in &boards { acc ^= bf.select_move(bd).index(); }
                black_box(acc)
            })
        });
    }
}

fn bench_explore_depth(c: &mut Criterion) {
    warm();
    let boards = corpus();
    for depth in [2u32, 4, 6] {
        let cfg = BestFirstConfig { max_depth: depth, ..Default::default() };
        let mut bf = BestFirst::with_config(cfg).unwrap();
        c.bench_function(&format!("bestfirst/explore_d{depth}"), |bch| {
            bch.iter(|| {
                let mut nodes = 0u64;
                for &bd in &boards { nodes += bf.explore(bd).stats.accepted; }
                black_box(nodes)
            })
        });
    }
}

fn bench_e2e(c: &mut Criterion) {
    warm();
    let cfg = BestFirstConfig { max_depth: 4, ..Default::default() };
    let mut bf = BestFirst::with_config(cfg).unwrap();
    c.bench_function("e2e_bestfirst/64_moves", |bch| {
        bch.iter(|| {
            let mut rng = StdRng::seed_from_u64(7);
            let mut b = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
            let mut steps = 0;
            while steps < 64 && !b.is_game_over() {
                b = b.make_move(bf.get_next_move(b), &mut rng);
                steps += 1;
            }
            black_box((b.raw(), steps))
        })
    });
}

criterion_group!(bestfirst, bench_select_move, bench_explore_depth, bench_e2e);
criterion_main!(bestfirst);
