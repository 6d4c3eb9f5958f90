//! Helpers shared by the engine tests.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::game::{assign_roles, GamePlayer, Player, Role, RoleAssignment};

/// Creates `n` players named P0..Pn-1, seated in join order.
pub fn make_players(n: usize) -> Vec<Player> {
    (0..n)
        .map(|i| Player::new(format!("p{}", i), format!("Player{}", i), 1000 + i as u64))
        .collect()
}

/// Deals roles to `n` players from a seeded generator.
pub fn assignment_for(n: usize, seed: u64) -> (Vec<Player>, RoleAssignment) {
    let players = make_players(n);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let roles = assign_roles(&players, &mut rng).unwrap();
    (players, roles)
}

/// Builds the full roster with roles attached, as the visibility engine
/// consumes it.
pub fn roster(players: &[Player], roles: &RoleAssignment) -> Vec<GamePlayer> {
    players
        .iter()
        .map(|p| GamePlayer::new(p, roles.get(&p.id).copied()))
        .collect()
}

/// Finds the id of the player holding the given role.
pub fn player_with_role(roles: &RoleAssignment, role: Role) -> String {
    roles
        .iter()
        .find(|(_, r)| **r == role)
        .map(|(id, _)| id.clone())
        .unwrap()
}
