//! Flight plan grammar.
//!
//! A plan is a string over `N E S W C 0-9` read from the front, one token per
//! tick. A letter sets the heading, `C` asks to convert into a shipyard, and a
//! decimal run is a repeat counter that counts down by one each tick.

use crate::game::Direction;

/// Every character a flight plan may contain.
pub const FLIGHT_PLAN_ALPHABET: &str = "NESWC0123456789";

/// Token requesting conversion into a shipyard.
pub const CONVERT: char = 'C';

/// Whether every character of `plan` belongs to [`FLIGHT_PLAN_ALPHABET`].
#[must_use]
pub fn is_valid(plan: &str) -> bool {
    plan.chars().all(|c| FLIGHT_PLAN_ALPHABET.contains(c))
}

/// Longest plan a fleet of `ship_count` ships may carry.
///
/// `floor(2 * ln(ship_count)) + 1`, so 1 ship flies a single token, 2 ships
/// two, 3 ships three, 5 ships four, 8 ships five, 13 ships six, 21 ships
/// seven and so on. Never decreases as the fleet grows.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn max_flight_plan_len(ship_count: u32) -> usize {
    if ship_count == 0 {
        return 0;
    }
    (2.0 * f64::from(ship_count).ln()).floor() as usize + 1
}

/// Cut `plan` down to what a fleet of `ship_count` ships may carry.
#[must_use]
pub fn truncate(plan: &str, ship_count: u32) -> &str {
    let max_len = max_flight_plan_len(ship_count);
    // The alphabet is ASCII, so byte offsets are char offsets.
    match plan.char_indices().nth(max_len) {
        Some((cut, _)) => &plan[..cut],
        None => plan,
    }
}

/// Drop a leading run of `'0'` characters.
#[must_use]
pub fn strip_leading_zeros(plan: &str) -> &str {
    plan.trim_start_matches('0')
}

/// Whether the next token asks the fleet to convert.
#[must_use]
pub fn starts_with_convert(plan: &str) -> bool {
    plan.starts_with(CONVERT)
}

/// Consume one heading or repeat token from the front of `plan`.
///
/// Returns the new heading if a letter was consumed, and the remaining plan.
/// A plan that starts with anything else is returned unchanged.
#[must_use]
pub fn advance(plan: &str) -> (Option<Direction>, String) {
    let Some(first) = plan.chars().next() else {
        return (None, String::new());
    };

    if let Some(direction) = Direction::from_char(first) {
        return (Some(direction), plan[first.len_utf8()..].to_string());
    }

    if first.is_ascii_digit() {
        let run_len = plan
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(plan.len());
        let (digits, rest) = plan.split_at(run_len);
        // Absurdly long runs saturate rather than fail.
        let repeats = digits.parse::<u64>().unwrap_or(u64::MAX);
        let remaining = repeats.saturating_sub(1);
        if remaining > 0 {
            return (None, format!("{remaining}{rest}"));
        }
        return (None, rest.to_string());
    }

    (None, plan.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity() {
        assert!(is_valid("N2SC"));
        assert!(is_valid(""));
        assert!(!is_valid("N2X"));
        assert!(!is_valid("n"));
    }

    #[test]
    fn test_max_len_values() {
        assert_eq!(max_flight_plan_len(0), 0);
        assert_eq!(max_flight_plan_len(1), 1);
        assert_eq!(max_flight_plan_len(2), 2);
        assert_eq!(max_flight_plan_len(3), 3);
        assert_eq!(max_flight_plan_len(10), 5);
        assert_eq!(max_flight_plan_len(21), 7);
        assert_eq!(max_flight_plan_len(100), 10);
    }

    #[test]
    fn test_max_len_monotone() {
        let mut previous = 0;
        for ships in 0..5_000 {
            let len = max_flight_plan_len(ships);
            assert!(len >= previous, "cap shrank at {ships} ships");
            previous = len;
        }
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("N10E10S10W", 1), "N");
        assert_eq!(truncate("N10E10S10W", 10), "N10E1");
        assert_eq!(truncate("N", 100), "N");
    }

    #[test]
    fn test_strip_zeros() {
        assert_eq!(strip_leading_zeros("007N"), "7N");
        assert_eq!(strip_leading_zeros("000"), "");
        assert_eq!(strip_leading_zeros("N0"), "N0");
    }

    #[test]
    fn test_advance_letter() {
        assert_eq!(advance("S"), (Some(Direction::South), String::new()));
        assert_eq!(advance("E3N"), (Some(Direction::East), "3N".to_string()));
    }

    #[test]
    fn test_advance_counts_down() {
        assert_eq!(advance("8N"), (None, "7N".to_string()));
        assert_eq!(advance("10S"), (None, "9S".to_string()));
        assert_eq!(advance("1N"), (None, "N".to_string()));
        assert_eq!(advance("2"), (None, "1".to_string()));
    }

    #[test]
    fn test_advance_saturates_long_runs() {
        let (heading, rest) = advance("99999999999999999999999N");
        assert_eq!(heading, None);
        assert!(rest.ends_with('N'));
    }

    #[test]
    fn test_advance_leaves_convert() {
        assert_eq!(advance("C"), (None, "C".to_string()));
        assert_eq!(advance(""), (None, String::new()));
    }
}
