use serde::{Deserialize, Serialize};

/// A player's secret role.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Liberal,
    Fascist,
    Hitler,
}

/// The two political parties of the game.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Party {
    Liberal,
    Fascist,
}

impl Role {
    /// Gets the party membership for this role. Hitler counts as a fascist.
    pub fn party(self) -> Party {
        match self {
            Role::Liberal => Party::Liberal,
            Role::Fascist => Party::Fascist,
            Role::Hitler => Party::Fascist,
        }
    }
}

impl ToString for Role {
    fn to_string(&self) -> String {
        match self {
            Role::Liberal => "LIBERAL",
            Role::Fascist => "FASCIST",
            Role::Hitler => "HITLER",
        }
        .to_string()
    }
}

impl ToString for Party {
    fn to_string(&self) -> String {
        match self {
            Party::Liberal => "LIBERAL",
            Party::Fascist => "FASCIST",
        }
        .to_string()
    }
}

/// How many of each role a game deals for a given player count.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug)]
pub struct RoleDistribution {
    pub liberals: usize,
    pub fascists: usize,
    pub hitler: usize,
}

/// The canonical role table, indexed by player count.
///
/// These are fixed game-design values, not an arithmetic progression;
/// they must stay a literal table.
const ROLE_DISTRIBUTION: [(usize, RoleDistribution); 6] = [
    (5, RoleDistribution { liberals: 3, fascists: 1, hitler: 1 }),
    (6, RoleDistribution { liberals: 4, fascists: 1, hitler: 1 }),
    (7, RoleDistribution { liberals: 4, fascists: 2, hitler: 1 }),
    (8, RoleDistribution { liberals: 5, fascists: 2, hitler: 1 }),
    (9, RoleDistribution { liberals: 5, fascists: 3, hitler: 1 }),
    (10, RoleDistribution { liberals: 6, fascists: 3, hitler: 1 }),
];

/// Looks up the role distribution for the given player count.
/// Only defined for games of 5 to 10 players.
pub fn distribution_for(player_count: usize) -> Option<RoleDistribution> {
    ROLE_DISTRIBUTION
        .iter()
        .find(|(count, _)| *count == player_count)
        .map(|(_, dist)| *dist)
}

/// Who is allowed to know whom, given the size of the table.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug)]
pub struct KnowledgeRules {
    /// Hitler only learns the fascists' identities in small games.
    pub hitler_knows_fascists: bool,
    pub fascists_know_hitler: bool,
    pub fascists_know_each_other: bool,
}

/// Gets the asymmetric-knowledge rules for the given player count.
pub fn knowledge_rules(player_count: usize) -> KnowledgeRules {
    KnowledgeRules {
        hitler_knows_fascists: player_count < 7,
        fascists_know_hitler: true,
        fascists_know_each_other: true,
    }
}
