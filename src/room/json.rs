use serde_json::{json, Value};

use super::Room;
use crate::game::{visible_information, VisibleInformation};

impl Room {
    /// Builds the state document shipped to one player.
    ///
    /// Roles are filtered server-side through the visibility engine, so a
    /// client only ever receives the subset it is permitted to know, plus
    /// the investigation results it performed itself.
    pub fn get_player_json(&self, viewer_id: &str) -> Value {
        let visible = match self.roles.get(viewer_id) {
            Some(role) => visible_information(
                viewer_id,
                *role,
                &self.game_players(),
                self.num_players(),
            ),
            None => VisibleInformation::default(),
        };

        let players: Vec<Value> = self
            .ordered_players()
            .iter()
            .map(|player| {
                json!({
                    "id": player.id,
                    "name": player.name,
                    "isReady": player.is_ready,
                    "joinedAt": player.joined_at,
                    "role": visible.roles.get(&player.id),
                    "party": visible.parties.get(&player.id),
                })
            })
            .collect();

        let investigations: Vec<Value> = self
            .investigations
            .values()
            .filter(|record| record.investigated_by == viewer_id)
            .map(|record| json!(record))
            .collect();

        json!({
            "id": self.id,
            "metadata": self.metadata,
            "players": players,
            "visibleRoles": visible.roles,
            "visibleParties": visible.parties,
            "investigations": investigations,
        })
    }

    /// The state document for a spectator: public information only.
    pub fn get_public_json(&self) -> Value {
        let players: Vec<Value> = self
            .ordered_players()
            .iter()
            .map(|player| {
                json!({
                    "id": player.id,
                    "name": player.name,
                    "isReady": player.is_ready,
                    "joinedAt": player.joined_at,
                })
            })
            .collect();

        json!({
            "id": self.id,
            "metadata": self.metadata,
            "players": players,
        })
    }
}
