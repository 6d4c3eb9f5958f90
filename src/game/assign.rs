use std::collections::HashMap;

use rand::Rng;

use super::player::Player;
use super::role::{distribution_for, Role};
use crate::error::GameError;

/// A mapping from player id to secret role.
pub type RoleAssignment = HashMap<String, Role>;

/// Deals secret roles to the given players.
///
/// The role multiset is taken from the distribution table for the player
/// count, uniformly shuffled, and zipped against the players in order.
/// Randomness is injected so games draw from a freshly seeded generator
/// while tests can substitute a deterministic one.
pub fn assign_roles(players: &[Player], rng: &mut impl Rng) -> Result<RoleAssignment, GameError> {
    let player_count = players.len();
    let Some(distribution) = distribution_for(player_count) else {
        return Err(GameError::InvalidPlayerCount { count: player_count });
    };

    let mut roles = Vec::with_capacity(player_count);
    roles.extend(std::iter::repeat(Role::Liberal).take(distribution.liberals));
    roles.extend(std::iter::repeat(Role::Fascist).take(distribution.fascists));
    roles.push(Role::Hitler);

    // Fisher-Yates
    for i in (1..roles.len()).rev() {
        let j = rng.gen_range(0..=i);
        roles.swap(i, j);
    }

    Ok(players
        .iter()
        .zip(roles)
        .map(|(player, role)| (player.id.clone(), role))
        .collect())
}

/// The outcome of a role-assignment integrity check. Failures are reported
/// as data rather than errors so callers can re-validate after persistence
/// round trips without exception handling.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Validation {
    pub valid: bool,
    pub error: Option<String>,
}

impl Validation {
    fn ok() -> Self {
        Self { valid: true, error: None }
    }

    fn fail(error: String) -> Self {
        Self { valid: false, error: Some(error) }
    }
}

/// Checks that an assignment's role counts match the distribution table
/// entry for the given player count.
pub fn validate_role_assignment(assignment: &RoleAssignment, player_count: usize) -> Validation {
    let Some(distribution) = distribution_for(player_count) else {
        return Validation::fail(format!("Invalid player count: {}", player_count));
    };

    let count = |role: Role| assignment.values().filter(|r| **r == role).count();

    let liberals = count(Role::Liberal);
    if liberals != distribution.liberals {
        return Validation::fail(format!(
            "Expected {} liberals, got {}",
            distribution.liberals, liberals
        ));
    }

    let fascists = count(Role::Fascist);
    if fascists != distribution.fascists {
        return Validation::fail(format!(
            "Expected {} fascists, got {}",
            distribution.fascists, fascists
        ));
    }

    let hitler = count(Role::Hitler);
    if hitler != distribution.hitler {
        return Validation::fail(format!(
            "Expected {} Hitler, got {}",
            distribution.hitler, hitler
        ));
    }

    Validation::ok()
}

/// Whether a lobby of the given size may start a game, with a user-facing
/// reason when it may not.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct StartCheck {
    pub can_start: bool,
    pub reason: Option<&'static str>,
}

/// The gate the lobby checks before starting a game. `assign_roles` rejects
/// bad counts on its own, but callers pre-check here for a friendlier
/// message.
pub fn can_start_game(player_count: usize) -> StartCheck {
    if player_count < 5 {
        return StartCheck {
            can_start: false,
            reason: Some("Need at least 5 players to start"),
        };
    }
    if player_count > 10 {
        return StartCheck {
            can_start: false,
            reason: Some("Maximum 10 players allowed"),
        };
    }
    StartCheck { can_start: true, reason: None }
}
