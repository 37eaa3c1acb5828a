#![no_main]

//! Tick resolution fuzzer.
//!
//! Builds a board from a fuzzer-generated observation, attaches arbitrary
//! shipyard actions and steps it a few ticks, checking board invariants
//! after every tick. Observations the board rejects are skipped.

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use kore::game::invariants::check_invariants;
use kore::game::{RawFleet, RawPlayer, RawShipyard};
use kore::{Board, Configuration, Observation, ShipyardAction};
use libfuzzer_sys::fuzz_target;

const ALPHABET: &[u8] = b"NESWC0123456789";

#[derive(Arbitrary, Debug)]
struct FuzzFleet {
    cell: u16,
    kore: u16,
    ships: u16,
    direction: u8,
    plan: Vec<u8>,
}

#[derive(Arbitrary, Debug)]
struct FuzzShipyard {
    cell: u16,
    ships: u16,
    turns: u16,
}

#[derive(Arbitrary, Debug)]
struct FuzzPlayer {
    kore: u16,
    shipyards: Vec<FuzzShipyard>,
    fleets: Vec<FuzzFleet>,
}

#[derive(Arbitrary, Debug)]
enum FuzzAction {
    Spawn(u8),
    Launch(u16, Vec<u8>),
}

#[derive(Arbitrary, Debug)]
struct BoardInput {
    size: u8,
    cell_kore: Vec<u16>,
    players: Vec<FuzzPlayer>,
    actions: Vec<FuzzAction>,
    num_ticks: u8,
}

fn plan(bytes: &[u8]) -> String {
    bytes
        .iter()
        .take(12)
        .map(|b| char::from(ALPHABET[usize::from(*b) % ALPHABET.len()]))
        .collect()
}

fn observation(input: &BoardInput, size: i32) -> Observation {
    let cells = (size * size) as usize;
    let cell = |raw: u16| usize::from(raw) % cells;

    let kore = (0..cells)
        .map(|i| {
            input
                .cell_kore
                .get(i % input.cell_kore.len().max(1))
                .map_or(0.0, |k| f64::from(*k % 600))
        })
        .collect();

    let players = input
        .players
        .iter()
        .take(4)
        .enumerate()
        .map(|(p, player)| {
            let shipyards: BTreeMap<_, _> = player
                .shipyards
                .iter()
                .take(4)
                .enumerate()
                .map(|(i, s)| {
                    let raw = RawShipyard(
                        cell(s.cell),
                        u32::from(s.ships % 1000),
                        u32::from(s.turns % 500),
                    );
                    (format!("s{p}-{i}"), raw)
                })
                .collect();
            let fleets: BTreeMap<_, _> = player
                .fleets
                .iter()
                .take(8)
                .enumerate()
                .map(|(i, f)| {
                    let raw = RawFleet(
                        cell(f.cell),
                        f64::from(f.kore),
                        u32::from(f.ships % 1000).max(1),
                        f.direction % 4,
                        plan(&f.plan),
                    );
                    (format!("f{p}-{i}"), raw)
                })
                .collect();
            RawPlayer(f64::from(player.kore), shipyards, fleets)
        })
        .collect();

    Observation {
        kore,
        players,
        player: 0,
        step: 0,
        remaining_overage_time: 60.0,
    }
}

fn attach_actions(board: &mut Board, actions: &[FuzzAction], tick: usize) {
    let ids: Vec<String> = board.shipyards().map(|s| s.id.clone()).collect();
    if actions.is_empty() {
        return;
    }
    for (i, id) in ids.iter().enumerate() {
        let action = match &actions[(tick + i) % actions.len()] {
            FuzzAction::Spawn(count) => ShipyardAction::spawn_ships(u32::from(*count % 12)),
            FuzzAction::Launch(count, bytes) => {
                ShipyardAction::launch_fleet_with_flight_plan(u32::from(*count % 1000), plan(bytes))
            }
        };
        assert!(board.set_next_action(id, action).is_ok());
    }
}

fuzz_target!(|input: BoardInput| {
    let size = i32::from(input.size % 12) + 3;
    let configuration = Configuration {
        size,
        ..Configuration::default()
    };
    if input.players.is_empty() {
        return;
    }

    let Ok(mut board) = Board::from_observation(&observation(&input, size), configuration) else {
        return;
    };
    let violations = check_invariants(&board);
    assert!(violations.is_empty(), "invariants violated at start: {violations:?}");

    for tick in 0..usize::from(input.num_ticks % 16) {
        attach_actions(&mut board, &input.actions, tick);
        let next = board.next().expect("a consistent board always steps");
        let violations = check_invariants(&next);
        assert!(violations.is_empty(), "invariants violated after tick {tick}: {violations:?}");
        board = next;
    }
});
