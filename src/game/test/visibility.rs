//! Tests for the asymmetric-knowledge rules.

use super::test_utils::*;
use crate::game::{visible_information, Party, Role};

#[test]
fn everyone_sees_their_own_role_and_party() {
    let (players, roles) = assignment_for(8, 3);
    let all = roster(&players, &roles);

    for player in &players {
        let role = roles[&player.id];
        let visible = visible_information(&player.id, role, &all, players.len());
        assert_eq!(visible.roles.get(&player.id), Some(&role));
        assert_eq!(visible.parties.get(&player.id), Some(&role.party()));
    }
}

#[test]
fn hitler_sees_the_fascist_in_a_5_player_game() {
    let (players, roles) = assignment_for(5, 11);
    let all = roster(&players, &roles);
    let hitler = player_with_role(&roles, Role::Hitler);
    let fascist = player_with_role(&roles, Role::Fascist);

    let visible = visible_information(&hitler, Role::Hitler, &all, 5);
    assert_eq!(visible.roles.len(), 2);
    assert_eq!(visible.roles.get(&fascist), Some(&Role::Fascist));
    assert_eq!(visible.parties.get(&fascist), Some(&Party::Fascist));
}

#[test]
fn hitler_is_blind_in_a_7_player_game() {
    let (players, roles) = assignment_for(7, 11);
    let all = roster(&players, &roles);
    let hitler = player_with_role(&roles, Role::Hitler);

    let visible = visible_information(&hitler, Role::Hitler, &all, 7);
    assert_eq!(visible.roles.len(), 1);
    assert_eq!(visible.roles.get(&hitler), Some(&Role::Hitler));
}

#[test]
fn fascists_see_their_whole_team() {
    for count in 5..=10 {
        let (players, roles) = assignment_for(count, 23);
        let all = roster(&players, &roles);
        let fascist = player_with_role(&roles, Role::Fascist);

        let team: Vec<&String> = roles
            .iter()
            .filter(|(_, r)| matches!(r, Role::Fascist | Role::Hitler))
            .map(|(id, _)| id)
            .collect();

        let visible = visible_information(&fascist, Role::Fascist, &all, count);
        assert_eq!(visible.roles.len(), team.len(), "{} players", count);
        for id in team {
            assert_eq!(visible.roles.get(id), Some(&roles[id]), "{} players", count);
            assert_eq!(
                visible.parties.get(id),
                Some(&Party::Fascist),
                "{} players",
                count
            );
        }
    }
}

#[test]
fn liberals_see_only_themselves() {
    for count in 5..=10 {
        let (players, roles) = assignment_for(count, 31);
        let all = roster(&players, &roles);
        let liberal = player_with_role(&roles, Role::Liberal);

        let visible = visible_information(&liberal, Role::Liberal, &all, count);
        assert_eq!(visible.roles.len(), 1, "{} players", count);
        assert_eq!(visible.parties.len(), 1, "{} players", count);
        assert_eq!(visible.roles.get(&liberal), Some(&Role::Liberal));
    }
}

#[test]
fn unassigned_roles_are_never_revealed() {
    // Roster straight from the lobby: nobody has a role yet
    let players = make_players(6);
    let all = roster(&players, &Default::default());

    let visible = visible_information(&players[0].id, Role::Fascist, &all, 6);
    assert_eq!(visible.roles.len(), 1);
}
