//! Benchmarks for tick resolution.
//!
//! The hot path is `Board::next` on a board crowded with fleets.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use kore::mapgen::generate_board;
use kore::replay::{TickActions, apply_actions};
use kore::{Board, Configuration};

fn orders(board: &Board) -> Vec<TickActions> {
    board
        .players()
        .iter()
        .map(|player| {
            let mut actions = BTreeMap::new();
            for id in &player.shipyard_ids {
                let shipyard = board.shipyard(id).unwrap();
                let text = match shipyard.ship_count {
                    n if n >= 60 => "LAUNCH_50_E3N4C".to_string(),
                    n if n >= 8 => "LAUNCH_8_N2W1S2E".to_string(),
                    _ => "SPAWN_5".to_string(),
                };
                actions.insert(id.clone(), text);
            }
            actions
        })
        .collect()
}

fn advance(board: &Board) -> Board {
    let mut board = board.clone();
    for (player_id, actions) in orders(&board).iter().enumerate() {
        apply_actions(&mut board, player_id, actions).unwrap();
    }
    board.next().unwrap()
}

/// A 4-player board after 150 scripted ticks.
fn busy_board() -> Board {
    let configuration = Configuration {
        random_seed: 42,
        ..Configuration::default()
    };
    let mut board = generate_board(configuration, 4).unwrap();
    for _ in 0..150 {
        board = advance(&board);
    }
    board
}

fn bench_single_tick(c: &mut Criterion) {
    let board = busy_board();

    c.bench_function("single_tick_4p", |b| {
        b.iter(|| black_box(black_box(&board).next()));
    });
}

fn bench_full_match(c: &mut Criterion) {
    let configuration = Configuration {
        random_seed: 7,
        ..Configuration::default()
    };
    let start = generate_board(configuration, 2).unwrap();

    c.bench_function("full_match_2p", |b| {
        b.iter(|| {
            let mut board = start.clone();
            while !board.is_game_over() {
                board = advance(&board);
            }
            black_box(board)
        });
    });
}

criterion_group!(benches, bench_single_tick, bench_full_match);
criterion_main!(benches);
