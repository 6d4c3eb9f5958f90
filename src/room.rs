use std::collections::{BTreeMap, HashMap};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::game::{
    assign_roles, can_start_game, investigate, validate_role_assignment, GamePlayer,
    InvestigationRecord, Player, RoleAssignment,
};

mod json;
mod test;

/// The phases a room moves through. Only the lobby and role-reveal phases
/// are driven by this crate; the rest belong to the turn-management layer
/// but are part of the shared document schema.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    Lobby,
    RoleReveal,
    Voting,
    Legislative,
    ExecutiveAction,
    GameOver,
}

impl GameStatus {
    /// Whether the game may move from this status to `to`.
    pub fn can_transition_to(self, to: GameStatus) -> bool {
        use GameStatus::*;
        match self {
            Lobby => matches!(to, RoleReveal),
            RoleReveal => matches!(to, Voting),
            // An election can fail and stay in voting
            Voting => matches!(to, Legislative | Voting),
            Legislative => matches!(to, ExecutiveAction | Voting),
            ExecutiveAction => matches!(to, Voting | GameOver),
            GameOver => matches!(to, Lobby),
        }
    }
}

/// Why a game was reset back to the lobby.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResetReason {
    GameOver,
    AdminRequest,
    Consensus,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RoomMetadata {
    pub status: GameStatus,
    pub admin_id: String,
    pub created_at: u64,
    pub started_at: Option<u64>,
    pub ended_at: Option<u64>,
    pub starting_player_id: Option<String>,
    pub current_president_id: Option<String>,
    pub current_chancellor_id: Option<String>,
    pub enacted_liberal_policies: usize,
    pub enacted_fascist_policies: usize,
    pub election_tracker: usize,
}

/// A single game room: the authoritative document for one session, keyed
/// by its short room code. Secret state (roles, investigations) lives here
/// and is only ever shipped to clients through per-viewer filtering.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Room {
    pub id: String,
    pub metadata: RoomMetadata,
    pub players: BTreeMap<String, Player>,
    #[serde(default)]
    pub roles: RoleAssignment,
    #[serde(default)]
    pub investigations: HashMap<String, InvestigationRecord>,
}

impl Room {
    /// Creates a room with its creator as admin and first player.
    pub fn new(id: String, admin: Player, now: u64) -> Self {
        let mut players = BTreeMap::new();
        let admin_id = admin.id.clone();
        players.insert(admin_id.clone(), admin);
        Self {
            id,
            metadata: RoomMetadata {
                status: GameStatus::Lobby,
                admin_id,
                created_at: now,
                started_at: None,
                ended_at: None,
                starting_player_id: None,
                current_president_id: None,
                current_chancellor_id: None,
                enacted_liberal_policies: 0,
                enacted_fascist_policies: 0,
                election_tracker: 0,
            },
            players,
            roles: RoleAssignment::new(),
            investigations: HashMap::new(),
        }
    }

    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    /// Whether a game is in progress (anything past the lobby).
    pub fn started(&self) -> bool {
        self.metadata.status != GameStatus::Lobby
    }

    /// Players in seating order: by join time, ties broken by id.
    pub fn ordered_players(&self) -> Vec<&Player> {
        let mut players: Vec<&Player> = self.players.values().collect();
        players.sort_by(|a, b| a.joined_at.cmp(&b.joined_at).then(a.id.cmp(&b.id)));
        players
    }

    /// The full roster with roles attached, for visibility computations.
    pub fn game_players(&self) -> Vec<GamePlayer> {
        self.ordered_players()
            .into_iter()
            .map(|p| GamePlayer::new(p, self.roles.get(&p.id).copied()))
            .collect()
    }

    /// Adds a player, or returns quietly if they are already seated
    /// (a reconnecting client). Joining a started game is not allowed.
    pub fn add_player(&mut self, player: Player) -> Result<(), GameError> {
        if self.players.contains_key(&player.id) {
            return Ok(());
        }
        if self.started() {
            return Err(GameError::CannotJoinStartedGame);
        }
        self.players.insert(player.id.clone(), player);
        Ok(())
    }

    /// Removes a player from the room. Admin leaving hands the room to the
    /// longest-seated remaining player.
    pub fn remove_player(&mut self, player_id: &str) -> Result<(), GameError> {
        if self.players.remove(player_id).is_none() {
            return Err(GameError::PlayerNotFound);
        }
        if self.metadata.admin_id == player_id {
            if let Some(next) = self.ordered_players().first() {
                self.metadata.admin_id = next.id.clone();
            }
        }
        Ok(())
    }

    pub fn set_ready(&mut self, player_id: &str, ready: bool) -> Result<(), GameError> {
        let player = self
            .players
            .get_mut(player_id)
            .ok_or(GameError::PlayerNotFound)?;
        player.is_ready = ready;
        Ok(())
    }

    pub fn rename_player(&mut self, player_id: &str, name: String) -> Result<(), GameError> {
        let player = self
            .players
            .get_mut(player_id)
            .ok_or(GameError::PlayerNotFound)?;
        player.name = name;
        Ok(())
    }

    pub fn transfer_admin(&mut self, actor_id: &str, player_id: &str) -> Result<(), GameError> {
        if self.metadata.admin_id != actor_id {
            return Err(GameError::NotAdmin);
        }
        if !self.players.contains_key(player_id) {
            return Err(GameError::PlayerNotFound);
        }
        self.metadata.admin_id = player_id.to_string();
        Ok(())
    }

    /// Starts the game: deals roles and seats the first president.
    ///
    /// Only the admin may start; player count is gated by `can_start_game`
    /// before `assign_roles` ever sees it.
    pub fn start_game(
        &mut self,
        actor_id: &str,
        rng: &mut impl Rng,
        now: u64,
    ) -> Result<(), GameError> {
        if self.metadata.admin_id != actor_id {
            return Err(GameError::NotAdmin);
        }
        if !self.metadata.status.can_transition_to(GameStatus::RoleReveal) {
            return Err(GameError::InvalidAction);
        }

        let players = self.ordered_players();
        let check = can_start_game(players.len());
        if !check.can_start {
            return Err(if players.len() < 5 {
                GameError::TooFewPlayers
            } else {
                GameError::TooManyPlayers
            });
        }

        let ordered: Vec<Player> = players.into_iter().cloned().collect();
        let roles = assign_roles(&ordered, rng)?;
        debug_assert!(validate_role_assignment(&roles, ordered.len()).valid);

        let first = ordered[0].id.clone();
        self.roles = roles;
        self.metadata.status = GameStatus::RoleReveal;
        self.metadata.started_at = Some(now);
        self.metadata.ended_at = None;
        self.metadata.starting_player_id = Some(first.clone());
        self.metadata.current_president_id = Some(first);
        Ok(())
    }

    /// Performs the president's one-shot investigation of `target_id`.
    ///
    /// The engine enforces the target-side invariants; this layer enforces
    /// that the actor currently holds the presidency. Callers hold the room
    /// lock, so the single-use check and the write are one atomic step.
    pub fn investigate(
        &mut self,
        actor_id: &str,
        target_id: &str,
        now: u64,
    ) -> Result<InvestigationRecord, GameError> {
        if self.metadata.current_president_id.as_deref() != Some(actor_id) {
            return Err(GameError::NotPresident);
        }
        let record = investigate(
            actor_id,
            target_id,
            &self.players,
            &self.roles,
            &self.investigations,
            now,
        )?;
        self.investigations
            .insert(target_id.to_string(), record.clone());
        Ok(record)
    }

    /// Whether `actor_id` may reset the game right now.
    pub fn can_reset(&self, actor_id: &str) -> bool {
        self.metadata.admin_id == actor_id || self.metadata.status == GameStatus::GameOver
    }

    /// Resets the room to a fresh lobby: roles and investigations are
    /// cleared, the players keep their seats.
    pub fn reset(&mut self, actor_id: &str, reason: ResetReason) -> Result<(), GameError> {
        if !self.can_reset(actor_id) {
            return Err(GameError::ResetNotAllowed);
        }
        log::info!("Room {} reset by {} ({:?})", self.id, actor_id, reason);
        self.metadata.status = GameStatus::Lobby;
        self.metadata.started_at = None;
        self.metadata.ended_at = None;
        self.metadata.starting_player_id = None;
        self.metadata.current_president_id = None;
        self.metadata.current_chancellor_id = None;
        self.metadata.enacted_liberal_policies = 0;
        self.metadata.enacted_fascist_policies = 0;
        self.metadata.election_tracker = 0;
        self.roles.clear();
        self.investigations.clear();
        for player in self.players.values_mut() {
            player.is_ready = false;
        }
        Ok(())
    }

    /// The player who takes the presidency after `current_id`, in seating
    /// order, wrapping around the table.
    pub fn next_president(&self, current_id: &str) -> Result<String, GameError> {
        let players = self.ordered_players();
        let current = players
            .iter()
            .position(|p| p.id == current_id)
            .ok_or(GameError::PlayerNotFound)?;
        let next = (current + 1) % players.len();
        Ok(players[next].id.clone())
    }
}
