use std::collections::HashMap;

use super::player::GamePlayer;
use super::role::{Party, Role};

/// The subset of the role assignment an observer is permitted to see.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct VisibleInformation {
    pub roles: HashMap<String, Role>,
    pub parties: HashMap<String, Party>,
}

/// Computes which players' roles and parties an observer may know.
///
/// Every observer sees themselves. Fascists see the whole fascist team
/// including Hitler. Hitler sees the fascists only when the table has
/// fewer than seven players; at seven or more he plays blind by design.
/// Liberals see nobody else.
pub fn visible_information(
    observer_id: &str,
    observer_role: Role,
    players: &[GamePlayer],
    player_count: usize,
) -> VisibleInformation {
    let mut visible = VisibleInformation::default();
    visible.roles.insert(observer_id.to_string(), observer_role);
    visible
        .parties
        .insert(observer_id.to_string(), observer_role.party());

    let mut reveal = |player: &GamePlayer, role: Role| {
        visible.roles.insert(player.id.clone(), role);
        visible.parties.insert(player.id.clone(), role.party());
    };

    if observer_role == Role::Fascist {
        for player in players {
            if let Some(role @ (Role::Fascist | Role::Hitler)) = player.role {
                reveal(player, role);
            }
        }
    }

    if observer_role == Role::Hitler && player_count < 7 {
        for player in players {
            if let Some(role @ Role::Fascist) = player.role {
                reveal(player, role);
            }
        }
    }

    visible
}
