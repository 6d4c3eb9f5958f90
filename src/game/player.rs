use serde::{Deserialize, Serialize};

use super::role::{Party, Role};

/// A player as recorded in the room document. Owned by the lobby; the
/// game engine treats it as read-only input.
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,
    pub is_ready: bool,
    /// Unix millis at which the player joined the room.
    pub joined_at: u64,
}

impl Player {
    pub fn new(id: String, name: String, joined_at: u64) -> Self {
        Self {
            id,
            name,
            is_ready: false,
            joined_at,
        }
    }
}

/// A player enriched with their assigned role, as used when computing
/// visibility. The role is `None` until the game has started.
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GamePlayer {
    pub id: String,
    pub name: String,
    pub role: Option<Role>,
    pub party: Option<Party>,
    pub is_alive: bool,
}

impl GamePlayer {
    pub fn new(player: &Player, role: Option<Role>) -> Self {
        Self {
            id: player.id.clone(),
            name: player.name.clone(),
            role,
            party: role.map(Role::party),
            is_alive: true,
        }
    }
}
