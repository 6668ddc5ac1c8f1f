use bestfirst_2048::engine::{self as GameEngine, Board, Move, get_score, count_empty};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;

fn warm() { GameEngine::new(); }

fn corpus() -> Vec<Board> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut boards = vec![Board::EMPTY];
    let mut b = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    boards.push(b);
    let seq = [Move::Left, Move::Up, Move::Right, Move::Down];
    for i in 0..20 {
        let dir = seq[i % seq.len()];
        let nb = b.shift(dir);
        if nb != b { b = nb.with_random_tile(&mut rng); }
        boards.push(b);
    }
    boards
}

fn bench_execute(c: &mut Criterion) {
    warm();
    let boards = corpus();
    for dir in Move::EXPANSION_ORDER {
        c.bench_function(&format!("execute/{dir}"), |bch| {
            bch.iter(|| {
                let mut acc = 0u64;
                for &bd in &boards {
                    let out = bd.execute(dir);
                    acc ^= out.board.raw().wrapping_add(out.delta);
                }
                black_box(acc)
            })
        });
    }
}

fn bench_make_move_and_insert(c: &mut Criterion) {
    warm();
    c.bench_function("board/with_random_tile", |bch| {
        bch.iter_batched(
            || (Board::EMPTY, StdRng::seed_from_u64(7)),
            |(mut bd, mut rng)| {
                for _ in 0..16 { bd = bd.with_random_tile(&mut rng); }
                black_box(bd)
            },
            BatchSize::SmallInput,
        )
    });
    c.bench_function("board/make_move_left", |bch| {
        bch.iter_batched(
            || {
                let mut rng = StdRng::seed_from_u64(9);
                let bd = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
                (bd, rng)
            },
            |(mut bd, mut rng)| {
                for _ in 0..64 { bd = bd.make_move(Move::Left, &mut rng); }
                black_box(bd)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_score_and_queries(c: &mut Criterion) {
    warm();
    let boards = corpus();
    c.bench_function("score/get_score", |bch| {
        bch.iter(|| {
            let mut acc = 0u64;
            for &bd in &boards { acc = acc.wrapping_add(get_score(bd)); }
            black_box(acc)
        })
    });
    c.bench_function("query/count_empty", |bch| {
        bch.iter(|| {
            let mut acc = 0u64;
            for &bd in &boards { acc ^= count_empty(bd); }
            black_box(acc)
        })
    });
    c.bench_function("query/is_game_over", |bch| {
        bch.iter(|| {
            let mut over = 0usize;
            for &bd in &boards { over += bd.is_game_over() as usize; }
            black_box(over)
        })
    });
}

criterion_group!(engine_ops, bench_execute, bench_make_move_and_insert, bench_score_and_queries);
criterion_main!(engine_ops);
