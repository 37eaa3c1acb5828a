//! Deterministic match setup.
//!
//! Kore is seeded in one quadrant and mirrored into the other three so that
//! every starting shipyard faces the same field.

// Map generation uses intentional casts for coordinate/RNG operations
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]

use thiserror::Error;

use crate::error::BoardError;
use crate::game::{Board, Configuration, Point, Shipyard, round_kore};

/// Smallest board that fits four separated shipyards.
pub const MIN_SIZE: i32 = 5;

/// Average kore per cell on a freshly generated board.
pub const MEAN_CELL_KORE: f64 = 25.0;

/// Deterministic PRNG using xorshift64.
#[derive(Debug, Clone, Copy)]
struct Rng {
    state: u64,
}

impl Rng {
    /// Create a new RNG with the given seed.
    const fn new(seed: u64) -> Self {
        // Ensure non-zero state
        let state = if seed == 0 { 0x5555_5555_5555_5555 } else { seed };
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Random value in `[0, max)`.
    fn next_i32(&mut self, max: i32) -> i32 {
        if max <= 0 {
            return 0;
        }
        (self.next_u64() % max as u64) as i32
    }

    /// Random value in `[0, 1)`.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Error type for match setup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapGenError {
    /// Only 1, 2 or 4 players have symmetric starting positions.
    #[error("unsupported player count {0}, expected 1, 2 or 4")]
    UnsupportedPlayerCount(usize),
    /// The board cannot hold separated starting positions.
    #[error("board size {size} is below the minimum of {MIN_SIZE}")]
    BoardTooSmall {
        /// Requested side length.
        size: i32,
    },
    /// Building the board failed.
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Build the tick-0 board for a new match.
///
/// The layout depends only on `configuration` (including its
/// `random_seed`) and `num_players`. Each player starts with
/// `starting_kore` and one empty shipyard.
///
/// # Errors
///
/// Returns an error for an unsupported player count, a board that is too
/// small, or an invalid configuration.
pub fn generate_board(
    configuration: Configuration,
    num_players: usize,
) -> Result<Board, MapGenError> {
    if !matches!(num_players, 1 | 2 | 4) {
        return Err(MapGenError::UnsupportedPlayerCount(num_players));
    }
    configuration.validate().map_err(BoardError::from)?;
    if configuration.size < MIN_SIZE {
        return Err(MapGenError::BoardTooSmall {
            size: configuration.size,
        });
    }

    let mut rng = Rng::new(configuration.random_seed);
    let kore = generate_kore(&configuration, &mut rng);
    let mut board = Board::new(configuration, kore, num_players)?;

    for (player_id, position) in starting_positions(configuration.size, num_players)
        .into_iter()
        .enumerate()
    {
        let id = format!("0-{}", player_id + 1);
        board.add_shipyard(Shipyard::new(id, 0, position, player_id, 0))?;
    }

    tracing::info!(
        size = configuration.size,
        seed = configuration.random_seed,
        num_players,
        "match generated"
    );
    Ok(board)
}

/// Shipyard positions, symmetric under the board's mirror axes.
fn starting_positions(size: i32, num_players: usize) -> Vec<Point> {
    let near = size / 4;
    let far = size - 1 - near;
    match num_players {
        1 => vec![Point::new(near, far)],
        2 => vec![Point::new(near, far), Point::new(far, near)],
        _ => vec![
            Point::new(near, far),
            Point::new(far, near),
            Point::new(far, far),
            Point::new(near, near),
        ],
    }
}

/// Kore for every cell in index order.
fn generate_kore(configuration: &Configuration, rng: &mut Rng) -> Vec<f64> {
    let size = configuration.size;
    let half = (size + 1) / 2;

    // Radial deposits in the south-west quadrant
    let mut quadrant = vec![0.0; (half * half) as usize];
    let deposits = half.max(1);
    for _ in 0..deposits {
        let cx = rng.next_i32(half);
        let cy = rng.next_i32(half);
        let strength = 0.5 + rng.next_f64();
        let radius = 1 + rng.next_i32(half / 2 + 1);
        for y in 0..half {
            for x in 0..half {
                let distance = (x - cx).abs() + (y - cy).abs();
                if distance <= radius {
                    let falloff = f64::from(radius - distance + 1) / f64::from(radius + 1);
                    quadrant[(y * half + x) as usize] += strength * falloff * falloff;
                }
            }
        }
    }

    let total: f64 = quadrant.iter().sum();
    let scale = if total > 0.0 {
        MEAN_CELL_KORE * quadrant.len() as f64 / total
    } else {
        0.0
    };

    (0..configuration.cell_count())
        .map(|index| {
            let point = Point::from_index(index, size);
            let qx = point.x.min(size - 1 - point.x);
            let qy = point.y.min(size - 1 - point.y);
            let raw = quadrant[(qy * half + qx) as usize] * scale;
            round_kore(raw.min(configuration.max_regen_cell_kore))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::invariants::check_invariants;

    #[test]
    fn test_rng_determinism() {
        let mut a = Rng::new(42);
        let mut b = Rng::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_rng_ranges() {
        let mut rng = Rng::new(7);
        for _ in 0..1000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
            assert!((0..9).contains(&rng.next_i32(9)));
        }
        assert_eq!(rng.next_i32(0), 0);
    }

    #[test]
    fn test_generation_determinism() {
        let config = Configuration {
            random_seed: 12345,
            ..Configuration::default()
        };
        let a = generate_board(config, 2).unwrap();
        let b = generate_board(config, 2).unwrap();
        assert_eq!(a, b);

        let other = Configuration {
            random_seed: 54321,
            ..config
        };
        assert_ne!(a.cells(), generate_board(other, 2).unwrap().cells());
    }

    #[test]
    fn test_kore_is_mirrored() {
        let config = Configuration {
            random_seed: 9,
            ..Configuration::default()
        };
        let board = generate_board(config, 4).unwrap();
        let size = config.size;
        for cell in board.cells() {
            let Point { x, y } = cell.position;
            let mirrored = Point::new(size - 1 - x, size - 1 - y);
            let other = board.cell_at(mirrored).unwrap();
            assert!((cell.kore - other.kore).abs() < 1e-9, "{} vs {}", cell.position, mirrored);
        }
    }

    #[test]
    fn test_starting_shipyards() {
        let board = generate_board(Configuration::default(), 2).unwrap();
        assert!(check_invariants(&board).is_empty());
        assert_eq!(board.shipyard("0-1").unwrap().position, Point::new(5, 15));
        assert_eq!(board.shipyard("0-2").unwrap().position, Point::new(15, 5));
        for player in board.players() {
            assert_eq!(player.shipyard_ids.len(), 1);
            assert!((player.kore - 500.0).abs() < f64::EPSILON);
        }
        assert!(!board.is_game_over());
    }

    #[test]
    fn test_kore_budget() {
        let board = generate_board(Configuration::default(), 2).unwrap();
        let total: f64 = board.cells().iter().map(|c| c.kore).sum();
        let mean = total / board.cells().len() as f64;
        assert!(mean > MEAN_CELL_KORE * 0.5 && mean < MEAN_CELL_KORE * 1.5, "mean {mean}");
    }

    #[test]
    fn test_rejects_bad_requests() {
        assert_eq!(
            generate_board(Configuration::default(), 3),
            Err(MapGenError::UnsupportedPlayerCount(3))
        );
        let tiny = Configuration {
            size: 3,
            ..Configuration::default()
        };
        assert_eq!(
            generate_board(tiny, 2),
            Err(MapGenError::BoardTooSmall { size: 3 })
        );
    }
}
