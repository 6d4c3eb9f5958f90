use crate::{
    error::GameError,
    room::ResetReason,
    session::{SessionHandle, SessionManager},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::watch;

/// A single connected client, either a seated player or a spectator.
pub struct Client<'a> {
    manager: &'a SessionManager,
    session: Option<SessionHandle>,
    user: Option<String>,
    room_id: Option<String>,
    updates: Option<watch::Receiver<Value>>,
}

/// An action performed by a player on their room.
#[derive(Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerAction {
    StartGame,
    SetReady { ready: bool },
    Rename { name: String },
    Investigate { target_id: String },
    TransferAdmin { player_id: String },
    RemovePlayer { player_id: String },
    ResetGame { reason: ResetReason },
}

impl<'a> Client<'a> {
    /// Creates a new client with no room attached.
    pub fn new(manager: &'a SessionManager) -> Self {
        Self {
            manager,
            session: None,
            user: None,
            room_id: None,
            updates: None,
        }
    }

    /// Creates a new room with this user as admin, returning its code.
    pub fn create_room(&mut self, user_id: &str, name: &str) -> Result<String, GameError> {
        let session = self.manager.create_room(user_id, name);
        let (id, updates) = {
            let mut session = session.lock().unwrap();
            let updates = session.join_player(user_id, name)?;
            (session.id().to_owned(), updates)
        };
        self.user = Some(user_id.to_string());
        self.room_id = Some(id.clone());
        self.updates = Some(updates);
        self.session = Some(session);
        Ok(id)
    }

    /// Joins a room as a player.
    pub fn join_room(&mut self, room_id: &str, user_id: &str, name: &str) -> Result<(), GameError> {
        let session = self.manager.find_room(room_id)?;
        {
            let mut session = session.lock().unwrap();
            self.updates = Some(session.join_player(user_id, name)?);
        }
        self.user = Some(user_id.to_string());
        self.room_id = Some(room_id.to_string());
        self.session = Some(session);
        Ok(())
    }

    /// Joins a room as a spectator.
    pub fn join_spectator(&mut self, room_id: &str) -> Result<(), GameError> {
        let session = self.manager.find_room(room_id)?;
        self.user = None;
        self.room_id = Some(room_id.to_string());
        self.updates = Some(session.lock().unwrap().join_spectator());
        self.session = Some(session);
        Ok(())
    }

    /// Waits until there is an update to the room state, then returns the
    /// latest state for this viewer.
    pub async fn next_state(&mut self) -> Value {
        let Some(updates) = &mut self.updates else {
            return std::future::pending().await;
        };

        updates.changed().await.ok();
        let state = updates.borrow().clone();

        json!({
            "room_id": self.room_id,
            "user_id": self.user,
            "state": state,
        })
    }

    /// Leaves the room without giving up the seat, so the player can
    /// reconnect later.
    pub fn disconnect(&mut self) {
        self.user = None;
        self.room_id = None;
        self.updates = None;
        self.session = None;
    }

    /// Leaves the room and gives up the seat.
    pub fn leave_room(&mut self) -> Result<(), GameError> {
        let (session, user) = self.context()?;
        session.lock().unwrap().leave(&user)?;
        self.disconnect();
        Ok(())
    }

    /// Called when a player performs an action on their room. Investigation
    /// returns the created record; other actions return nothing.
    pub fn player_action(&self, action: PlayerAction) -> Result<Option<Value>, GameError> {
        let (session, user) = self.context()?;
        let mut session = session.lock().unwrap();
        match action {
            PlayerAction::StartGame => session.start_game(&user)?,
            PlayerAction::SetReady { ready } => session.set_ready(&user, ready)?,
            PlayerAction::Rename { name } => session.rename_player(&user, &name)?,
            PlayerAction::Investigate { target_id } => {
                let record = session.investigate(&user, &target_id)?;
                return Ok(Some(json!(record)));
            }
            PlayerAction::TransferAdmin { player_id } => {
                session.transfer_admin(&user, &player_id)?
            }
            PlayerAction::RemovePlayer { player_id } => session.remove_player(&user, &player_id)?,
            PlayerAction::ResetGame { reason } => session.reset_game(&user, reason)?,
        }
        Ok(None)
    }

    /// Keeps the room session alive.
    pub fn heartbeat(&self) {
        let Some(session) = &self.session else {
            return;
        };
        let mut session = session.lock().unwrap();
        session.heartbeat();
    }

    fn context(&self) -> Result<(&SessionHandle, String), GameError> {
        let (Some(session), Some(user)) = (&self.session, &self.user) else {
            return Err(GameError::NoContext);
        };
        Ok((session, user.clone()))
    }
}
