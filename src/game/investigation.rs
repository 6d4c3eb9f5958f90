use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::assign::RoleAssignment;
use super::player::Player;
use super::role::Party;
use crate::error::GameError;

/// The outcome of the one-shot investigation action, stored in the room
/// document keyed by the investigated player's id.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct InvestigationRecord {
    pub investigation_id: String,
    pub result: Party,
    pub investigated_by: String,
    /// Unix millis at which the investigation was performed.
    pub investigated_at: u64,
    pub target_id: String,
}

/// Validates and performs an investigation, revealing the target's party.
///
/// Checks run in a fixed ladder, each with its own error: the power is
/// single-use per game, the target must exist, must not be the actor, must
/// not already hold a record, and must have an assigned role. Which player
/// holds the investigative privilege is the room layer's concern.
///
/// This is a pure computation over the room's current maps; callers must
/// re-run it under the room lock immediately before writing the record, so
/// two racing attempts cannot both pass the single-use check.
pub fn investigate(
    actor_id: &str,
    target_id: &str,
    players: &BTreeMap<String, Player>,
    roles: &RoleAssignment,
    investigations: &HashMap<String, InvestigationRecord>,
    now: u64,
) -> Result<InvestigationRecord, GameError> {
    if !investigations.is_empty() {
        return Err(GameError::InvestigationAlreadyUsed);
    }
    if !players.contains_key(target_id) {
        return Err(GameError::TargetNotFound);
    }
    if target_id == actor_id {
        return Err(GameError::SelfInvestigation);
    }
    // Redundant with the single-use check above, but kept as its own error
    // so a per-target rule change cannot silently weaken it.
    if investigations.contains_key(target_id) {
        return Err(GameError::AlreadyInvestigated);
    }
    let Some(role) = roles.get(target_id) else {
        return Err(GameError::RoleNotAssigned);
    };

    Ok(InvestigationRecord {
        investigation_id: format!("{}_{}", actor_id, now),
        result: role.party(),
        investigated_by: actor_id.to_string(),
        investigated_at: now,
        target_id: target_id.to_string(),
    })
}
