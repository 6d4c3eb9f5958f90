//! Tests for the game-start eligibility gate.

use crate::game::can_start_game;

#[test]
fn too_few_players() {
    for count in 0..5 {
        let check = can_start_game(count);
        assert!(!check.can_start, "{} players", count);
        assert_eq!(check.reason, Some("Need at least 5 players to start"));
    }
}

#[test]
fn too_many_players() {
    for count in [11, 12, 20] {
        let check = can_start_game(count);
        assert!(!check.can_start, "{} players", count);
        assert_eq!(check.reason, Some("Maximum 10 players allowed"));
    }
}

#[test]
fn valid_counts_can_start() {
    for count in 5..=10 {
        let check = can_start_game(count);
        assert!(check.can_start, "{} players", count);
        assert_eq!(check.reason, None);
    }
}
