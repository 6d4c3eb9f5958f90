#![cfg(test)]

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::{GameStatus, ResetReason, Room};
use crate::error::GameError;
use crate::game::{Player, Role};

fn make_room(num_players: usize) -> Room {
    let admin = Player::new("p0".into(), "Player0".into(), 1000);
    let mut room = Room::new("ABCD".into(), admin, 1000);
    for i in 1..num_players {
        let player = Player::new(format!("p{}", i), format!("Player{}", i), 1000 + i as u64);
        room.add_player(player).unwrap();
    }
    room
}

fn started_room(num_players: usize) -> Room {
    let mut room = make_room(num_players);
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    room.start_game("p0", &mut rng, 2000).unwrap();
    room
}

#[test]
fn status_transition_table() {
    use GameStatus::*;
    assert!(Lobby.can_transition_to(RoleReveal));
    assert!(!Lobby.can_transition_to(Voting));
    assert!(RoleReveal.can_transition_to(Voting));
    assert!(Voting.can_transition_to(Voting));
    assert!(Voting.can_transition_to(Legislative));
    assert!(!Voting.can_transition_to(GameOver));
    assert!(Legislative.can_transition_to(ExecutiveAction));
    assert!(Legislative.can_transition_to(Voting));
    assert!(ExecutiveAction.can_transition_to(GameOver));
    assert!(GameOver.can_transition_to(Lobby));
    assert!(!GameOver.can_transition_to(Voting));
}

#[test]
fn only_admin_can_start() {
    let mut room = make_room(5);
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let err = room.start_game("p1", &mut rng, 2000).unwrap_err();
    assert_eq!(err, GameError::NotAdmin);
    assert_eq!(err.to_string(), "Only admin can start the game");
}

#[test]
fn start_rejects_bad_player_counts() {
    let mut room = make_room(4);
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let err = room.start_game("p0", &mut rng, 2000).unwrap_err();
    assert_eq!(err.to_string(), "Need at least 5 players to start");

    let mut room = make_room(11);
    let err = room.start_game("p0", &mut rng, 2000).unwrap_err();
    assert_eq!(err.to_string(), "Maximum 10 players allowed");
}

#[test]
fn start_deals_roles_and_seats_first_president() {
    let room = started_room(7);

    assert_eq!(room.metadata.status, GameStatus::RoleReveal);
    assert_eq!(room.metadata.started_at, Some(2000));
    // First president is the longest-seated player
    assert_eq!(room.metadata.starting_player_id.as_deref(), Some("p0"));
    assert_eq!(room.metadata.current_president_id.as_deref(), Some("p0"));

    assert_eq!(room.roles.len(), 7);
    let hitlers = room.roles.values().filter(|r| **r == Role::Hitler).count();
    assert_eq!(hitlers, 1);
}

#[test]
fn cannot_start_twice() {
    let mut room = started_room(5);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let err = room.start_game("p0", &mut rng, 3000).unwrap_err();
    assert_eq!(err, GameError::InvalidAction);
}

#[test]
fn cannot_join_started_game() {
    let mut room = started_room(5);
    let late = Player::new("p9".into(), "Latecomer".into(), 9000);
    let err = room.add_player(late).unwrap_err();
    assert_eq!(err, GameError::CannotJoinStartedGame);

    // A seated player reconnecting is fine
    let rejoin = Player::new("p1".into(), "Player1".into(), 9001);
    room.add_player(rejoin).unwrap();
    assert_eq!(room.num_players(), 5);
}

#[test]
fn only_president_may_investigate() {
    let mut room = started_room(5);
    let err = room.investigate("p1", "p2", 3000).unwrap_err();
    assert_eq!(err, GameError::NotPresident);
    assert_eq!(err.to_string(), "Only President can investigate players");
}

#[test]
fn investigation_flow_and_exhaustion() {
    let mut room = started_room(5);

    let record = room.investigate("p0", "p3", 3000).unwrap();
    assert_eq!(record.result, room.roles["p3"].party());
    assert_eq!(record.investigated_by, "p0");
    assert_eq!(room.investigations.len(), 1);
    assert!(room.investigations.contains_key("p3"));

    // Second use fails for any target, state is untouched
    let err = room.investigate("p0", "p4", 3001).unwrap_err();
    assert_eq!(err, GameError::InvestigationAlreadyUsed);
    assert_eq!(room.investigations.len(), 1);
}

#[test]
fn president_rotation_wraps_in_join_order() {
    let room = make_room(5);
    assert_eq!(room.next_president("p0").unwrap(), "p1");
    assert_eq!(room.next_president("p3").unwrap(), "p4");
    assert_eq!(room.next_president("p4").unwrap(), "p0");
    assert_eq!(
        room.next_president("ghost").unwrap_err(),
        GameError::PlayerNotFound
    );
}

#[test]
fn reset_clears_game_state_but_keeps_players() {
    let mut room = started_room(6);
    room.investigate("p0", "p1", 3000).unwrap();
    room.set_ready("p2", true).unwrap();

    room.reset("p0", ResetReason::AdminRequest).unwrap();

    assert_eq!(room.metadata.status, GameStatus::Lobby);
    assert_eq!(room.metadata.started_at, None);
    assert_eq!(room.metadata.current_president_id, None);
    assert!(room.roles.is_empty());
    assert!(room.investigations.is_empty());
    assert_eq!(room.num_players(), 6);
    assert!(!room.players["p2"].is_ready);

    // A fresh game can start and investigate again
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    room.start_game("p0", &mut rng, 4000).unwrap();
    room.investigate("p0", "p1", 5000).unwrap();
}

#[test]
fn reset_requires_admin_unless_game_over() {
    let mut room = started_room(5);
    let err = room.reset("p1", ResetReason::Consensus).unwrap_err();
    assert_eq!(err, GameError::ResetNotAllowed);

    room.metadata.status = GameStatus::GameOver;
    room.reset("p1", ResetReason::GameOver).unwrap();
    assert_eq!(room.metadata.status, GameStatus::Lobby);
}

#[test]
fn admin_leaving_hands_room_to_next_player() {
    let mut room = make_room(3);
    room.remove_player("p0").unwrap();
    assert_eq!(room.metadata.admin_id, "p1");
}

#[test]
fn transfer_admin_checks_actor_and_target() {
    let mut room = make_room(3);
    assert_eq!(
        room.transfer_admin("p1", "p2").unwrap_err(),
        GameError::NotAdmin
    );
    assert_eq!(
        room.transfer_admin("p0", "ghost").unwrap_err(),
        GameError::PlayerNotFound
    );
    room.transfer_admin("p0", "p2").unwrap();
    assert_eq!(room.metadata.admin_id, "p2");
}

#[test]
fn player_state_json_filters_roles_per_viewer() {
    let room = started_room(5);
    let liberal = room
        .roles
        .iter()
        .find(|(_, r)| **r == Role::Liberal)
        .map(|(id, _)| id.clone())
        .unwrap();

    let state = room.get_player_json(&liberal);
    let visible = state["visibleRoles"].as_object().unwrap();
    assert_eq!(visible.len(), 1);
    assert!(visible.contains_key(&liberal));

    // The roster carries a role only where the viewer may see one
    for player in state["players"].as_array().unwrap() {
        let id = player["id"].as_str().unwrap();
        assert_eq!(player["role"].is_null(), id != liberal);
    }

    // Spectators see no secrets at all
    let public = room.get_public_json();
    assert!(public.get("visibleRoles").is_none());
    for player in public["players"].as_array().unwrap() {
        assert!(player.get("role").is_none());
    }
}

#[test]
fn room_round_trips_through_json() {
    let mut room = started_room(5);
    room.investigate("p0", "p2", 3000).unwrap();

    let json = serde_json::to_string(&room).unwrap();
    let back: Room = serde_json::from_str(&json).unwrap();
    assert_eq!(back.num_players(), 5);
    assert_eq!(back.roles.len(), 5);
    assert_eq!(back.investigations.len(), 1);
    assert_eq!(back.metadata.status, GameStatus::RoleReveal);
}
