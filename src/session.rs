use crate::error::GameError;
use crate::room::{ResetReason, Room};
use crate::time::{iso8601, now_millis};
use dashmap::{mapref::entry::Entry, DashMap};
use rand::{Rng, RngCore, SeedableRng};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::watch;

/// Manages all the rooms running on the server.
pub struct SessionManager {
    sessions: DashMap<String, SessionHandle>,
    dbs: Dbs,
}

/// The databases that rooms are persisted to.
#[derive(Clone)]
struct Dbs {
    db: sled::Db,
    rooms: sled::Tree,
    archive: sled::Tree,
}

/// A single room session. All mutations go through the session lock, so
/// precondition checks and writes are one atomic step per room.
pub struct Session {
    /// The room document.
    room: Room,
    /// Channel for sending public state updates to spectators.
    public_state: watch::Sender<Value>,
    /// Channels for sending per-viewer filtered state to players.
    player_states: HashMap<String, watch::Sender<Value>>,
    /// The databases.
    dbs: Dbs,
    /// Timestamp of the last time this session was interacted with.
    last_ts: Instant,
}

pub type SessionHandle = Arc<Mutex<Session>>;

impl SessionManager {
    pub fn new(db: sled::Db) -> Result<Self, Box<dyn Error>> {
        let sessions = DashMap::new();
        let dbs = Dbs {
            db: db.clone(),
            rooms: db.open_tree("rooms")?,
            archive: db.open_tree("archive")?,
        };
        for entry in dbs.rooms.iter() {
            let (id, room) = entry?;
            let id = String::from_utf8(id.to_vec())?;
            let Ok(room) = serde_json::from_slice::<Room>(&room) else {
                continue;
            };
            let session = Session::hydrate(dbs.clone(), room);
            sessions.insert(id, Arc::new(Mutex::new(session)));
        }
        Ok(Self { sessions, dbs })
    }

    /// Creates a room with the given user as its admin, retrying room codes
    /// until an unused one is found.
    pub fn create_room(&self, admin_id: &str, admin_name: &str) -> SessionHandle {
        loop {
            let code = Self::random_code();
            let entry = self.sessions.entry(code);
            if let Entry::Occupied(_) = entry {
                continue;
            }
            let session = Session::new(entry.key().clone(), self.dbs.clone(), admin_id, admin_name);
            let session = Arc::new(Mutex::new(session));
            entry.or_insert(session.clone());
            break session;
        }
    }

    pub fn find_room(&self, room_id: &str) -> Result<SessionHandle, GameError> {
        self.sessions
            .get(room_id)
            .map(|session| session.clone())
            .ok_or(GameError::RoomNotFound)
    }

    pub fn num_rooms(&self) -> usize {
        self.sessions.len()
    }

    /// Reads the archived games back out of the database.
    pub fn past_games(&self) -> Vec<Value> {
        self.dbs
            .archive
            .iter()
            .filter_map(|entry| entry.ok())
            .filter_map(|(_, data)| serde_json::from_slice(&data).ok())
            .collect()
    }

    /// Drops rooms that nobody has touched for an hour.
    pub fn purge_rooms(&self) {
        let mut ids_to_delete = vec![];

        for session in self.sessions.iter() {
            let room_id = session.key();
            let Ok(session) = session.lock() else {
                log::error!("Found poisoned session: {}", room_id);
                ids_to_delete.push(room_id.clone());
                continue;
            };
            let elapsed = Instant::now().duration_since(session.last_ts);
            if elapsed > Duration::from_secs(3600) {
                if self.dbs.rooms.remove(session.id().as_bytes()).is_ok() {
                    ids_to_delete.push(room_id.clone());
                } else {
                    log::error!("Could not remove room: {}", room_id);
                }
            }
        }

        for room_id in ids_to_delete.into_iter() {
            self.sessions.remove(&room_id);
        }
    }

    /// Generates a short room code of 4-6 characters.
    fn random_code() -> String {
        const CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
        let mut rng = rand::thread_rng();
        let len = rng.gen_range(4..=6);
        (0..len)
            .map(|_| CHARS[rng.gen_range(0..CHARS.len())] as char)
            .collect()
    }
}

impl Session {
    fn new(id: String, dbs: Dbs, admin_id: &str, admin_name: &str) -> Self {
        let now = now_millis();
        let admin = crate::game::Player::new(admin_id.to_string(), admin_name.to_string(), now);
        let mut session = Self::hydrate(dbs, Room::new(id, admin, now));
        session.persist_room().ok();
        session
    }

    fn hydrate(dbs: Dbs, room: Room) -> Self {
        let mut player_states = HashMap::new();
        for id in room.players.keys() {
            player_states.insert(id.clone(), watch::channel(Value::Null).0);
        }
        Self {
            room,
            public_state: watch::channel(Value::Null).0,
            player_states,
            dbs,
            last_ts: Instant::now(),
        }
    }

    /// Gets the room code.
    pub fn id(&self) -> &str {
        &self.room.id
    }

    /// Adds a player to the room, or reconnects them if already seated,
    /// and returns a stream of their filtered state updates.
    pub fn join_player(
        &mut self,
        player_id: &str,
        name: &str,
    ) -> Result<watch::Receiver<Value>, GameError> {
        let player = crate::game::Player::new(player_id.to_string(), name.to_string(), now_millis());
        self.room.add_player(player)?;
        let sender = self
            .player_states
            .entry(player_id.to_string())
            .or_insert_with(|| watch::channel(Value::Null).0);
        let rx = sender.subscribe();
        self.notify();
        self.persist_room().ok();
        Ok(rx)
    }

    /// Called by a spectator client; returns a stream of public updates.
    pub fn join_spectator(&mut self) -> watch::Receiver<Value> {
        let rx = self.public_state.subscribe();
        self.notify();
        rx
    }

    /// Removes a player from the room.
    pub fn leave(&mut self, player_id: &str) -> Result<(), GameError> {
        self.room.remove_player(player_id)?;
        self.player_states.remove(player_id);
        self.notify();
        self.persist_room().ok();
        Ok(())
    }

    /// Removes another player; admin only.
    pub fn remove_player(&mut self, actor_id: &str, player_id: &str) -> Result<(), GameError> {
        if self.room.metadata.admin_id != actor_id {
            return Err(GameError::NotAdmin);
        }
        self.leave(player_id)
    }

    pub fn set_ready(&mut self, player_id: &str, ready: bool) -> Result<(), GameError> {
        self.mutate(|room| room.set_ready(player_id, ready))
    }

    pub fn rename_player(&mut self, player_id: &str, name: &str) -> Result<(), GameError> {
        self.mutate(|room| room.rename_player(player_id, name.to_string()))
    }

    pub fn transfer_admin(&mut self, actor_id: &str, player_id: &str) -> Result<(), GameError> {
        self.mutate(|room| room.transfer_admin(actor_id, player_id))
    }

    /// Starts the game, dealing secret roles. Each game draws from a
    /// freshly seeded generator; reusing a seed across games is a defect.
    pub fn start_game(&mut self, actor_id: &str) -> Result<(), GameError> {
        let seed = rand::thread_rng().next_u64();
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
        self.mutate(|room| room.start_game(actor_id, &mut rng, now_millis()))
    }

    /// Performs the president's investigation. The session lock makes the
    /// precondition re-check and the record write a single atomic step, so
    /// a double-click or stale retry loses cleanly with "already used".
    pub fn investigate(
        &mut self,
        actor_id: &str,
        target_id: &str,
    ) -> Result<crate::game::InvestigationRecord, GameError> {
        let record = self.room.investigate(actor_id, target_id, now_millis())?;
        self.notify();
        self.persist_room().ok();
        Ok(record)
    }

    /// Resets the room to the lobby, archiving the finished game first.
    pub fn reset_game(&mut self, actor_id: &str, reason: ResetReason) -> Result<(), GameError> {
        if !self.room.can_reset(actor_id) {
            return Err(GameError::ResetNotAllowed);
        }
        self.archive().ok();
        self.mutate(|room| room.reset(actor_id, reason))
    }

    /// Keeps the room session alive.
    pub fn heartbeat(&mut self) {
        self.last_ts = Instant::now();
    }

    /// Applies a mutation to the room, then notifies and persists.
    fn mutate<F>(&mut self, mutation: F) -> Result<(), GameError>
    where
        F: FnOnce(&mut Room) -> Result<(), GameError>,
    {
        mutation(&mut self.room)?;
        self.notify();
        self.persist_room().ok();
        Ok(())
    }

    /// Notifies all connected clients of the new state. Each player gets
    /// the document filtered for their own eyes only.
    fn notify(&mut self) {
        for (player_id, state) in self.player_states.iter() {
            state.send_replace(self.room.get_player_json(player_id));
        }
        self.public_state.send_replace(self.room.get_public_json());
        self.last_ts = Instant::now();
    }

    /// Persists the room to disk, so it can be recovered on restart.
    fn persist_room(&mut self) -> Result<(), Box<dyn Error>> {
        self.dbs.rooms.insert(
            self.room.id.as_bytes(),
            serde_json::to_string(&self.room)?.as_bytes(),
        )?;
        Ok(())
    }

    /// Archives a started game before it is cleared by a reset.
    fn archive(&mut self) -> Result<(), Box<dyn Error>> {
        let Some(started) = self.room.metadata.started_at else {
            return Ok(());
        };
        let key = self.dbs.db.generate_id()?.to_be_bytes();
        let started = UNIX_EPOCH + Duration::from_millis(started);
        let data = json!({
            "room_id": self.room.id,
            "players": self.room.ordered_players().iter().map(|p| p.name.clone()).collect::<Vec<_>>(),
            "started": iso8601(started),
            "finished": iso8601(SystemTime::now()),
            "liberal_policies": self.room.metadata.enacted_liberal_policies,
            "fascist_policies": self.room.metadata.enacted_fascist_policies,
        })
        .to_string();
        self.dbs.archive.insert(key, data.as_bytes())?;
        Ok(())
    }
}
